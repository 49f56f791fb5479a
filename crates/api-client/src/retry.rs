//! Bounded retry with exponential backoff, shared by every outbound call.

use std::time::Duration;

use tracing::warn;

/// When the rate limiter gives no `Retry-After` hint, wait this long.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Retry policy for transient collaborator failures (HTTP 5xx, 429,
/// connection errors). Other 4xx responses never retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 3 means up to 4 requests total.
    pub max_retries: u32,
    /// Backoff unit. Attempt `n` waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Backoff before retrying after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.pow(attempt.min(6))
    }
}

/// Sleep duration demanded by a 429 response's `Retry-After` header.
pub fn retry_after(resp: &reqwest::Response) -> Duration {
    let secs = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_secs(secs)
}

/// Send a request, retrying transient failures up to the policy's cap.
///
/// 429 sleeps per the `Retry-After` hint; 5xx and connection errors back
/// off exponentially. Returns the final response even when it is still an
/// error status (the caller decides what a non-2xx means), and `Err` only
/// when the connection itself failed on every attempt.
pub async fn send_with_retry<F>(
    policy: &RetryPolicy,
    mut request: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: FnMut() -> reqwest::RequestBuilder,
{
    let max_attempts = policy.max_retries + 1;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match request().send().await {
            Ok(resp)
                if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                    && attempt < max_attempts =>
            {
                let wait = retry_after(&resp);
                warn!(
                    "rate limited (HTTP 429), attempt {attempt}/{max_attempts}, retrying in {}s",
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
            }
            Ok(resp) if resp.status().is_server_error() && attempt < max_attempts => {
                let wait = policy.backoff(attempt);
                warn!(
                    "request failed (HTTP {}), attempt {attempt}/{max_attempts}, retrying in {}s",
                    resp.status(),
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
            }
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < max_attempts => {
                let wait = policy.backoff(attempt);
                warn!(
                    "request failed ({e}), attempt {attempt}/{max_attempts}, retrying in {}s",
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
}
