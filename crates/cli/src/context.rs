//! Per-run execution context.
//!
//! Built once at command start from the environment and passed down
//! explicitly — no global state, no hidden initialization order. Holds the
//! dispatcher, the tunables and the running counters.

use std::time::Duration;

use anyhow::{Context, Result};

use leadwire_api_client::{RetryPolicy, WebhookDispatcher};
use leadwire_api_types::LeadPayload;
use leadwire_core::ClassifiedLead;
use leadwire_core::aggregate::InternalPolicy;
use leadwire_core::normalize::PhonePolicy;
use leadwire_core::stats::RunStats;
use leadwire_runtime_config::{DeliverySettings, Tunables};

pub struct DeliveryContext {
    pub tunables: Tunables,
    pub stats: RunStats,
    dispatcher: WebhookDispatcher,
}

impl DeliveryContext {
    /// Read settings and build the dispatcher. Fails before any I/O when a
    /// required variable is missing.
    pub fn from_env() -> Result<Self> {
        let settings = DeliverySettings::from_env().context("invalid configuration")?;
        let retry = RetryPolicy::new(settings.tunables.max_retries);
        let dispatcher = WebhookDispatcher::new(
            &settings.webhook_url,
            Duration::from_secs_f64(settings.tunables.rate_limit_delay_secs),
            retry,
        )
        .context("failed to build webhook dispatcher")?;

        Ok(Self {
            tunables: settings.tunables,
            stats: RunStats::default(),
            dispatcher,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.tunables.max_retries)
    }

    pub fn internal_policy(&self) -> InternalPolicy {
        InternalPolicy::allow_names(self.tunables.internal_allow_names.clone())
    }

    pub fn phone_policy(&self) -> PhonePolicy {
        if self.tunables.phone_digits_only {
            PhonePolicy::DigitsOnly
        } else {
            PhonePolicy::Passthrough
        }
    }

    /// Deliver one lead and record the outcome in the run counters.
    pub async fn deliver(
        &mut self,
        lead: &ClassifiedLead,
        purchased: bool,
        webinar_id: Option<&str>,
        schedule_id: Option<&str>,
    ) {
        let payload = LeadPayload::from_lead(lead, purchased, webinar_id, schedule_id);
        let outcome = self.dispatcher.deliver(&payload).await;
        self.stats.record_sent(outcome.success);
    }
}
