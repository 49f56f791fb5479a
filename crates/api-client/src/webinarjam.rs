//! WebinarJam / EverWebinar registrants client.
//!
//! The two products share one API shape under different URL paths. Requests
//! are form POSTs carrying the api key; pagination is page-number based and
//! the response wraps everything in a `status` envelope that must be
//! checked even on HTTP 200.

use std::time::Duration;

use tracing::{info, warn};

use leadwire_api_types::{JamRegistrant, JamRegistrantsResponse};

use crate::ApiError;
use crate::retry::{RetryPolicy, send_with_retry};

const DEFAULT_BASE_URL: &str = "https://api.webinarjam.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JamPlatform {
    WebinarJam,
    EverWebinar,
}

impl JamPlatform {
    fn registrants_path(self) -> &'static str {
        match self {
            Self::WebinarJam => "/webinarjam/registrants",
            Self::EverWebinar => "/everwebinar/registrants",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebinarJam => "webinarjam",
            Self::EverWebinar => "everwebinar",
        }
    }
}

/// Client for the WebinarJam-family registrants API.
pub struct WebinarJamClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    platform: JamPlatform,
    retry: RetryPolicy,
    /// Pause between page fetches, respecting the API's rate limits.
    page_delay: Duration,
}

impl WebinarJamClient {
    pub fn new(platform: JamPlatform, api_key: &str, retry: RetryPolicy) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            platform,
            retry,
            page_delay: Duration::from_secs(1),
        })
    }

    /// Point the client at a non-default endpoint (tests, mock servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Every registrant for a webinar schedule, across all pages.
    ///
    /// Pagination ends when a page comes back empty or the API reports
    /// `current_page` 0. A page failure after the first page keeps what was
    /// already collected.
    pub async fn registrants(
        &self,
        webinar_id: &str,
        schedule_id: &str,
    ) -> Result<Vec<JamRegistrant>, ApiError> {
        let url = format!("{}{}", self.base_url, self.platform.registrants_path());
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let envelope = match self.fetch_page(&url, webinar_id, schedule_id, page).await {
                Ok(envelope) => envelope,
                Err(e) if !all.is_empty() => {
                    warn!(
                        "registrant pagination aborted after {} records, keeping what was collected: {e}",
                        all.len()
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            if envelope.status != "success" {
                let detail = envelope
                    .error
                    .unwrap_or_else(|| format!("status '{}'", envelope.status));
                if all.is_empty() {
                    return Err(ApiError::Api(detail));
                }
                warn!("registrant pagination aborted by API ({detail}), keeping {} records", all.len());
                break;
            }

            let data = envelope.registrants.data;
            let last_page = data.is_empty() || envelope.registrants.current_page == 0;
            all.extend(data);
            if last_page {
                break;
            }

            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        info!(
            "fetched {} {} registrants",
            all.len(),
            self.platform.as_str()
        );
        Ok(all)
    }

    async fn fetch_page(
        &self,
        url: &str,
        webinar_id: &str,
        schedule_id: &str,
        page: u32,
    ) -> Result<JamRegistrantsResponse, ApiError> {
        let page_text = page.to_string();
        let form = [
            ("api_key", self.api_key.as_str()),
            ("webinar_id", webinar_id),
            ("schedule", schedule_id),
            ("date_range", "0"),
            ("page", page_text.as_str()),
        ];

        let resp = send_with_retry(&self.retry, || self.client.post(url).form(&form)).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use std::sync::atomic::Ordering;

    fn client_for(server: &testutil::MockServer, platform: JamPlatform) -> WebinarJamClient {
        WebinarJamClient::new(
            platform,
            "key-1",
            RetryPolicy {
                max_retries: 0,
                base_delay: Duration::ZERO,
            },
        )
        .unwrap()
        .with_base_url(&format!("http://{}", server.addr))
        .with_page_delay(Duration::ZERO)
    }

    fn page_json(current_page: u32, emails: &[&str]) -> String {
        let rows: Vec<String> = emails
            .iter()
            .map(|e| format!(r#"{{"first_name":"Test","last_name":"Person","email":"{e}","attended_live":"Yes","time_live":"01:00:00"}}"#))
            .collect();
        testutil::ok_json(&format!(
            r#"{{"status":"success","registrants":{{"current_page":{current_page},"data":[{}]}}}}"#,
            rows.join(",")
        ))
    }

    #[tokio::test]
    async fn pagination_stops_on_empty_page() {
        let server = testutil::spawn(vec![
            page_json(1, &["a@example.com", "b@example.com"]),
            page_json(2, &["c@example.com"]),
            page_json(3, &[]),
        ])
        .await;

        let client = client_for(&server, JamPlatform::WebinarJam);
        let registrants = client.registrants("11", "22").await.unwrap();
        assert_eq!(registrants.len(), 3);
        assert_eq!(server.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn pagination_stops_on_zero_current_page() {
        let server = testutil::spawn(vec![page_json(0, &["a@example.com"])]).await;

        let client = client_for(&server, JamPlatform::WebinarJam);
        let registrants = client.registrants("11", "22").await.unwrap();
        // The invalid page's rows are still kept; there is just no page 2.
        assert_eq!(registrants.len(), 1);
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn status_envelope_failure_is_an_api_error() {
        let server = testutil::spawn(vec![testutil::ok_json(
            r#"{"status":"error","error":"Invalid api key"}"#,
        )])
        .await;

        let client = client_for(&server, JamPlatform::EverWebinar);
        let err = client.registrants("11", "22").await.unwrap_err();
        match err {
            ApiError::Api(detail) => assert!(detail.contains("Invalid api key")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mid_pagination_failure_keeps_collected_records() {
        let server = testutil::spawn(vec![
            page_json(1, &["a@example.com"]),
            testutil::status_response(500, "Internal Server Error", ""),
        ])
        .await;

        let client = client_for(&server, JamPlatform::WebinarJam);
        let registrants = client.registrants("11", "22").await.unwrap();
        assert_eq!(registrants.len(), 1);
    }
}
