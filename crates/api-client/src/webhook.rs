//! The delivery dispatcher: one webhook POST per lead, paced and retried.
//!
//! Delivery is at-least-once and never propagates an error past this
//! boundary. Every failure mode — exhausted retries, permanent rejection,
//! dead connection — is folded into a logged `DeliveryOutcome` so one bad
//! record cannot abort a batch.

use std::time::Duration;

use tracing::{error, info};

use leadwire_api_types::LeadPayload;

use crate::retry::{self, RetryPolicy};

/// Result of one delivery. Not persisted; logged only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub http_status: Option<u16>,
    pub error_detail: Option<String>,
}

/// Posts leads to the CRM inbound webhook with a minimum inter-call delay.
pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
    pace: Duration,
    retry: RetryPolicy,
}

impl WebhookDispatcher {
    pub fn new(url: &str, pace: Duration, retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, url, pace, retry))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(
        client: reqwest::Client,
        url: &str,
        pace: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url: url.to_string(),
            pace,
            retry,
        }
    }

    /// Deliver one lead, then hold for the pacing delay.
    ///
    /// Transient failures (429, 5xx, connection errors) retry per the
    /// policy; any other 4xx is a permanent rejection and gives up
    /// immediately.
    pub async fn deliver(&self, payload: &LeadPayload) -> DeliveryOutcome {
        let outcome = self.attempt(payload).await;

        let who = correlation(payload);
        match &outcome {
            DeliveryOutcome { success: true, .. } => {
                info!(
                    "delivered {} (tag '{}', hot_lead {})",
                    who, payload.tag, payload.hot_lead
                );
            }
            DeliveryOutcome {
                http_status: Some(status),
                ..
            } => {
                error!("delivery failed for {} (HTTP {})", who, status);
            }
            DeliveryOutcome { error_detail, .. } => {
                error!(
                    "delivery failed for {} ({})",
                    who,
                    error_detail.as_deref().unwrap_or("unknown error")
                );
            }
        }

        tokio::time::sleep(self.pace).await;
        outcome
    }

    async fn attempt(&self, payload: &LeadPayload) -> DeliveryOutcome {
        let sent = retry::send_with_retry(&self.retry, || {
            self.client.post(&self.url).json(payload)
        })
        .await;

        match sent {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    DeliveryOutcome {
                        success: true,
                        http_status: Some(status.as_u16()),
                        error_detail: None,
                    }
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    DeliveryOutcome {
                        success: false,
                        http_status: Some(status.as_u16()),
                        error_detail: if body.is_empty() { None } else { Some(body) },
                    }
                }
            }
            Err(e) => DeliveryOutcome {
                success: false,
                http_status: None,
                error_detail: Some(e.to_string()),
            },
        }
    }
}

fn correlation(payload: &LeadPayload) -> &str {
    if payload.email.is_empty() {
        if payload.first_name.is_empty() {
            "<no identity>"
        } else {
            &payload.first_name
        }
    } else {
        &payload.email
    }
}
