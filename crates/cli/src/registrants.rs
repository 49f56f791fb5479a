//! `leadwire registrants` — WebinarJam/EverWebinar registrants, every lead
//! forwarded with its classified tag.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use leadwire_api_client::{JamPlatform, WebinarJamClient};
use leadwire_api_types::JamRegistrant;
use leadwire_core::{RawSession, pipeline};
use leadwire_parsers::webinarjam;
use leadwire_runtime_config::JamSettings;

use crate::context::DeliveryContext;

pub async fn run(platform: JamPlatform) -> Result<()> {
    let ctx = DeliveryContext::from_env()?;
    let settings = jam_settings(platform)?;

    let registrants = fetch_registrants(&ctx, platform, &settings).await?;
    deliver_registrants(
        ctx,
        &settings,
        &registrants,
        webinarjam::registrant_to_session,
    )
    .await
}

pub fn jam_settings(platform: JamPlatform) -> Result<JamSettings> {
    match platform {
        JamPlatform::WebinarJam => {
            JamSettings::webinarjam_from_env().context("invalid WebinarJam configuration")
        }
        JamPlatform::EverWebinar => {
            JamSettings::everwebinar_from_env().context("invalid EverWebinar configuration")
        }
    }
}

pub async fn fetch_registrants(
    ctx: &DeliveryContext,
    platform: JamPlatform,
    settings: &JamSettings,
) -> Result<Vec<JamRegistrant>> {
    let client = WebinarJamClient::new(platform, &settings.api_key, ctx.retry_policy())?;

    info!(
        "processing {} registrants for webinar {} (schedule {})",
        platform.as_str(),
        settings.webinar_id,
        settings.schedule_id
    );
    client
        .registrants(&settings.webinar_id, &settings.schedule_id)
        .await
        .context("failed to fetch registrants")
}

/// Classify and deliver a registrant batch. The per-registrant purchase
/// flag survives aggregation through an email-keyed lookup, since the
/// canonical session record does not carry it.
pub async fn deliver_registrants(
    mut ctx: DeliveryContext,
    settings: &JamSettings,
    registrants: &[JamRegistrant],
    to_session: fn(&JamRegistrant) -> RawSession,
) -> Result<()> {
    let purchased_by_email: HashMap<String, bool> = registrants
        .iter()
        .map(|r| (r.email.trim().to_ascii_lowercase(), webinarjam::purchased(r)))
        .collect();

    let sessions: Vec<RawSession> = registrants.iter().map(to_session).collect();
    ctx.stats.fetched = sessions.len() as u64;

    let out = pipeline::run(&sessions, &ctx.internal_policy(), ctx.phone_policy());
    ctx.stats.aggregated = out.leads.len() as u64;
    ctx.stats.skipped_no_key = out.skipped_no_key;
    ctx.stats.dropped_internal = out.dropped_internal;

    for lead in &out.leads {
        let purchased = purchased_by_email
            .get(&lead.email.trim().to_ascii_lowercase())
            .copied()
            .unwrap_or(false);
        ctx.deliver(
            lead,
            purchased,
            Some(&settings.webinar_id),
            Some(&settings.schedule_id),
        )
        .await;
    }

    info!("registrants run complete: {}", ctx.stats.summary());
    Ok(())
}
