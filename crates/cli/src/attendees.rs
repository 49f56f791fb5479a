//! `leadwire attendees` — Zoom participants, high-engagement leads only.

use anyhow::{Context, Result};
use tracing::info;

use leadwire_api_client::ZoomClient;
use leadwire_core::{EngagementTag, RawSession, pipeline};
use leadwire_parsers::zoom;
use leadwire_runtime_config::ZoomSettings;

use crate::context::DeliveryContext;

pub async fn run() -> Result<()> {
    let mut ctx = DeliveryContext::from_env()?;
    let settings = ZoomSettings::from_env().context("invalid Zoom configuration")?;

    let mut client = ZoomClient::new(
        &settings.account_id,
        &settings.client_id,
        &settings.client_secret,
        ctx.tunables.page_size,
        ctx.retry_policy(),
    )?;

    info!("processing attendees for webinar {}", settings.webinar_id);
    let participants = client
        .participants(&settings.webinar_id)
        .await
        .context("failed to fetch participants")?;

    let sessions: Vec<RawSession> = participants.iter().map(zoom::participant_to_session).collect();
    ctx.stats.fetched = sessions.len() as u64;

    let out = pipeline::run(&sessions, &ctx.internal_policy(), ctx.phone_policy());
    ctx.stats.aggregated = out.leads.len() as u64;
    ctx.stats.skipped_no_key = out.skipped_no_key;
    ctx.stats.dropped_internal = out.dropped_internal;

    for lead in &out.leads {
        if lead.tag != EngagementTag::HighEngagement {
            ctx.stats.filtered_out += 1;
            continue;
        }
        info!(
            "qualified {} (hot_lead {}, time_live {}s)",
            lead.correlation_key(),
            lead.hot_lead,
            lead.time_live_secs
        );
        ctx.deliver(
            lead,
            false,
            Some(&settings.webinar_id),
            settings.occurrence_id.as_deref(),
        )
        .await;
    }

    info!("attendees run complete: {}", ctx.stats.summary());
    Ok(())
}
