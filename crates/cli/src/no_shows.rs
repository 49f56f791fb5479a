//! `leadwire no-shows` — Zoom absentees, forwarded as no-show leads.

use anyhow::{Context, Result};
use tracing::info;

use leadwire_api_client::ZoomClient;
use leadwire_core::{RawSession, pipeline};
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

    info!("processing no-shows for webinar {}", settings.webinar_id);
    let absentees = client
        .absentees(&settings.webinar_id, settings.occurrence_id.as_deref())
        .await
        .context("failed to fetch absentees")?;

    let sessions: Vec<RawSession> = absentees.iter().map(zoom::absentee_to_session).collect();
    ctx.stats.fetched = sessions.len() as u64;

    let out = pipeline::run(&sessions, &ctx.internal_policy(), ctx.phone_policy());
    ctx.stats.aggregated = out.leads.len() as u64;
    ctx.stats.skipped_no_key = out.skipped_no_key;
    ctx.stats.dropped_internal = out.dropped_internal;

    for lead in &out.leads {
        ctx.deliver(
            lead,
            false,
            Some(&settings.webinar_id),
            settings.occurrence_id.as_deref(),
        )
        .await;
    }

    info!("no-shows run complete: {}", ctx.stats.summary());
    Ok(())
}
