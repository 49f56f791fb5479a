pub mod retry;
pub mod webhook;
pub mod webinarjam;
pub mod zoom;

#[cfg(test)]
pub(crate) mod testutil;

pub use retry::RetryPolicy;
pub use webhook::{DeliveryOutcome, WebhookDispatcher};
pub use webinarjam::{JamPlatform, WebinarJamClient};
pub use zoom::ZoomClient;

/// Errors surfaced by the platform clients.
///
/// The webhook dispatcher deliberately does not use this: delivery failures
/// are folded into `DeliveryOutcome` instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required OAuth scopes: {0}")]
    MissingScopes(String),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The collaborator's own status envelope reported failure despite
    /// HTTP 200.
    #[error("collaborator API error: {0}")]
    Api(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
