//! Environment-driven runtime configuration.
//!
//! Every command reads its settings here, once, before any I/O. A missing
//! required variable is fatal at startup; tunables fall back to defaults.
//! All readers take a lookup function so tests never mutate the process
//! environment.

use std::str::FromStr;

use thiserror::Error;

pub const ENV_WEBHOOK_URL: &str = "GHL_WEBHOOK_URL";
pub const ENV_PAGE_SIZE: &str = "PAGE_SIZE";
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";
pub const ENV_RATE_LIMIT_DELAY: &str = "RATE_LIMIT_DELAY_SECS";
pub const ENV_INTERNAL_ALLOW_NAMES: &str = "INTERNAL_ALLOW_NAMES";
pub const ENV_PHONE_DIGITS_ONLY: &str = "PHONE_DIGITS_ONLY";

pub const ENV_ZOOM_ACCOUNT_ID: &str = "ZOOM_ACCOUNT_ID";
pub const ENV_ZOOM_CLIENT_ID: &str = "ZOOM_CLIENT_ID";
pub const ENV_ZOOM_CLIENT_SECRET: &str = "ZOOM_CLIENT_SECRET";
pub const ENV_ZOOM_WEBINAR_ID: &str = "ZOOM_WEBINAR_ID";
pub const ENV_ZOOM_OCCURRENCE_ID: &str = "ZOOM_OCCURRENCE_ID";

pub const ENV_WEBINARJAM_API_KEY: &str = "WEBINARJAM_API_KEY";
pub const ENV_WEBINARJAM_WEBINAR_ID: &str = "WEBINARJAM_WEBINAR_ID";
pub const ENV_WEBINARJAM_SCHEDULE_ID: &str = "WEBINARJAM_SCHEDULE_ID";

pub const ENV_EVERWEBINAR_API_KEY: &str = "EVERWEBINAR_API_KEY";
pub const ENV_EVERWEBINAR_WEBINAR_ID: &str = "EVERWEBINAR_ID";
pub const ENV_EVERWEBINAR_SCHEDULE_ID: &str = "EVERWEBINAR_SCHEDULE_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Optional knobs shared by every run, with the observed defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Tunables {
    /// Records per page requested from paginated listings.
    pub page_size: u32,
    /// Retry cap for transient collaborator failures.
    pub max_retries: u32,
    /// Minimum seconds between webhook deliveries.
    pub rate_limit_delay_secs: f64,
    /// Internal users kept despite the internal filter, by display name.
    pub internal_allow_names: Vec<String>,
    /// Strip phone numbers to bare digits before delivery.
    pub phone_digits_only: bool,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            page_size: 30,
            max_retries: 3,
            rate_limit_delay_secs: 2.0,
            internal_allow_names: Vec::new(),
            phone_digits_only: false,
        }
    }
}

/// Settings every delivering command needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverySettings {
    pub webhook_url: String,
    pub tunables: Tunables,
}

impl DeliverySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_url: required(lookup, ENV_WEBHOOK_URL)?,
            tunables: Tunables::from_lookup(lookup)?,
        })
    }
}

impl Tunables {
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let rate_limit_delay_secs: f64 = parsed_or(
            lookup,
            ENV_RATE_LIMIT_DELAY,
            defaults.rate_limit_delay_secs,
        )?;
        // Feeds Duration::from_secs_f64, which rejects these.
        if !rate_limit_delay_secs.is_finite() || rate_limit_delay_secs < 0.0 {
            return Err(ConfigError::Invalid {
                name: ENV_RATE_LIMIT_DELAY,
                value: rate_limit_delay_secs.to_string(),
            });
        }

        Ok(Self {
            page_size: parsed_or(lookup, ENV_PAGE_SIZE, defaults.page_size)?,
            max_retries: parsed_or(lookup, ENV_MAX_RETRIES, defaults.max_retries)?,
            rate_limit_delay_secs,
            internal_allow_names: name_list(lookup, ENV_INTERNAL_ALLOW_NAMES),
            phone_digits_only: flag(lookup, ENV_PHONE_DIGITS_ONLY)?,
        })
    }
}

/// Credentials and target for the Zoom commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomSettings {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub webinar_id: String,
    pub occurrence_id: Option<String>,
}

impl ZoomSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            account_id: required(lookup, ENV_ZOOM_ACCOUNT_ID)?,
            client_id: required(lookup, ENV_ZOOM_CLIENT_ID)?,
            client_secret: required(lookup, ENV_ZOOM_CLIENT_SECRET)?,
            webinar_id: required(lookup, ENV_ZOOM_WEBINAR_ID)?,
            occurrence_id: optional(lookup, ENV_ZOOM_OCCURRENCE_ID),
        })
    }
}

/// Credentials and target for the WebinarJam-family commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JamSettings {
    pub api_key: String,
    pub webinar_id: String,
    pub schedule_id: String,
}

impl JamSettings {
    pub fn webinarjam_from_env() -> Result<Self, ConfigError> {
        Self::webinarjam_from_lookup(&env_lookup)
    }

    pub fn everwebinar_from_env() -> Result<Self, ConfigError> {
        Self::everwebinar_from_lookup(&env_lookup)
    }

    pub fn webinarjam_from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(lookup, ENV_WEBINARJAM_API_KEY)?,
            webinar_id: required(lookup, ENV_WEBINARJAM_WEBINAR_ID)?,
            schedule_id: required(lookup, ENV_WEBINARJAM_SCHEDULE_ID)?,
        })
    }

    pub fn everwebinar_from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(lookup, ENV_EVERWEBINAR_API_KEY)?,
            webinar_id: required(lookup, ENV_EVERWEBINAR_WEBINAR_ID)?,
            schedule_id: required(lookup, ENV_EVERWEBINAR_SCHEDULE_ID)?,
        })
    }
}

// ── Lookup helpers ──────────────────────────────────────────────────────

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn required(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn optional(lookup: &dyn Fn(&str) -> Option<String>, name: &'static str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_or<T: FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match optional(lookup, name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn name_list(lookup: &dyn Fn(&str) -> Option<String>, name: &'static str) -> Vec<String> {
    optional(lookup, name)
        .map(|raw| {
            raw.split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn flag(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    match optional(lookup, name) {
        None => Ok(false),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}
