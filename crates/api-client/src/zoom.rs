//! Zoom API client: OAuth2 account-credentials token handling and the
//! paginated participant/absentee listings.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use leadwire_api_types::{
    ZoomAbsentee, ZoomAbsenteesPage, ZoomParticipant, ZoomParticipantsPage, ZoomTokenResponse,
};

use crate::ApiError;
use crate::retry::{RetryPolicy, send_with_retry};

/// Scopes the granted token must carry before any listing call is made.
pub const REQUIRED_SCOPES: &[&str] = &[
    "webinar:read:webinar:admin",
    "webinar:read:list_past_participants:admin",
];

/// Tokens are treated as expired this long before the server says so, so a
/// token never dies mid-pagination.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

const DEFAULT_API_BASE: &str = "https://api.zoom.us/v2";
const DEFAULT_TOKEN_URL: &str = "https://zoom.us/oauth/token";

struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Typed client for the Zoom REST API.
pub struct ZoomClient {
    client: reqwest::Client,
    api_base: String,
    token_url: String,
    account_id: String,
    client_id: String,
    client_secret: String,
    page_size: u32,
    retry: RetryPolicy,
    token: Option<AccessToken>,
}

impl ZoomClient {
    pub fn new(
        account_id: &str,
        client_id: &str,
        client_secret: &str,
        page_size: u32,
        retry: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            account_id: account_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            page_size,
            retry,
            token: None,
        })
    }

    /// Point the client at non-default endpoints (tests, mock servers).
    pub fn with_endpoints(mut self, api_base: &str, token_url: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.token_url = token_url.to_string();
        self
    }

    /// All participant session rows for a past webinar, across every page.
    ///
    /// A page failure after the first page keeps what was already
    /// collected; only a failure on the opening page is an error.
    pub async fn participants(&mut self, webinar_id: &str) -> Result<Vec<ZoomParticipant>, ApiError> {
        let url = format!("{}/past_webinars/{}/participants", self.api_base, webinar_id);
        let mut all = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("page_size".to_string(), self.page_size.to_string()),
                ("include_fields".to_string(), "registrant_id".to_string()),
            ];
            if let Some(token) = &next_token {
                query.push(("next_page_token".to_string(), token.clone()));
            }

            let page: ZoomParticipantsPage = match self.get_json(&url, &query).await {
                Ok(page) => page,
                Err(e) if !all.is_empty() => {
                    warn!(
                        "participant pagination aborted after {} rows, keeping what was collected: {e}",
                        all.len()
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            next_token = page.next_page_token.filter(|t| !t.is_empty());
            all.extend(page.participants);
            if next_token.is_none() {
                break;
            }
        }

        info!("fetched {} participant session rows", all.len());
        Ok(all)
    }

    /// All absentee (registered, never joined) records for a webinar.
    pub async fn absentees(
        &mut self,
        webinar_id: &str,
        occurrence_id: Option<&str>,
    ) -> Result<Vec<ZoomAbsentee>, ApiError> {
        let url = format!("{}/webinars/{}/absentees", self.api_base, webinar_id);
        let mut all = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut query: Vec<(String, String)> =
                vec![("page_size".to_string(), self.page_size.to_string())];
            if let Some(occurrence) = occurrence_id {
                query.push(("occurrence_id".to_string(), occurrence.to_string()));
            }
            if let Some(token) = &next_token {
                query.push(("next_page_token".to_string(), token.clone()));
            }

            let page: ZoomAbsenteesPage = match self.get_json(&url, &query).await {
                Ok(page) => page,
                Err(e) if !all.is_empty() => {
                    warn!(
                        "absentee pagination aborted after {} records, keeping what was collected: {e}",
                        all.len()
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            next_token = page.next_page_token.filter(|t| !t.is_empty());
            all.extend(page.registrants);
            if next_token.is_none() {
                break;
            }
        }

        info!("fetched {} absentee records", all.len());
        Ok(all)
    }

    async fn get_json<T: DeserializeOwned>(
        &mut self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let token = self.ensure_token().await?;
        let resp = send_with_retry(&self.retry, || {
            self.client.get(url).bearer_auth(&token).query(query)
        })
        .await?;

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

    /// Return a valid access token, fetching or refreshing as needed.
    async fn ensure_token(&mut self) -> Result<String, ApiError> {
        if let Some(token) = &self.token {
            if !token.expired() {
                return Ok(token.value.clone());
            }
            info!("Zoom access token near expiry, refreshing");
        }

        let resp = send_with_retry(&self.retry, || {
            self.client
                .post(&self.token_url)
                .basic_auth(&self.client_id, Some(&self.client_secret))
                .form(&[
                    ("grant_type", "account_credentials"),
                    ("account_id", self.account_id.as_str()),
                ])
        })
        .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: self.token_url.clone(),
                body,
            });
        }

        let token: ZoomTokenResponse = resp.json().await?;
        validate_scopes(&token.scope)?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        self.token = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        });
        info!("obtained Zoom access token");
        Ok(token.access_token)
    }
}

/// Verify every required scope was granted.
pub fn validate_scopes(granted: &str) -> Result<(), ApiError> {
    let granted: HashSet<&str> = granted.split_whitespace().collect();
    let missing: Vec<&str> = REQUIRED_SCOPES
        .iter()
        .copied()
        .filter(|scope| !granted.contains(scope))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingScopes(missing.join(", ")))
    }
}
