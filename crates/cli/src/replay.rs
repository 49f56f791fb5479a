//! `leadwire replay` — EverWebinar replay watchers, classified from the
//! replay attendance fields.

use anyhow::Result;

use leadwire_api_client::JamPlatform;
use leadwire_parsers::webinarjam;

use crate::context::DeliveryContext;
use crate::registrants::{deliver_registrants, fetch_registrants, jam_settings};

pub async fn run() -> Result<()> {
    let ctx = DeliveryContext::from_env()?;
    let settings = jam_settings(JamPlatform::EverWebinar)?;

    let registrants = fetch_registrants(&ctx, JamPlatform::EverWebinar, &settings).await?;
    deliver_registrants(
        ctx,
        &settings,
        &registrants,
        webinarjam::replay_to_session,
    )
    .await
}
