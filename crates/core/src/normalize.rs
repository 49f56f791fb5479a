//! Shaping an aggregated attendee into the canonical lead record.

use tracing::warn;

use crate::lead::{AggregatedAttendee, Classification, ClassifiedLead};

/// How phone numbers are treated on the way out.
///
/// Most delivery targets accept whatever the platform stored; one path
/// requires bare digits. Default is pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhonePolicy {
    #[default]
    Passthrough,
    DigitsOnly,
}

/// Split a display name on whitespace: first token is the first name, the
/// remaining tokens joined by a single space are the last name.
pub fn split_display_name(name: &str) -> (String, String) {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or("").to_string();
    let rest: Vec<&str> = tokens.collect();
    (first, rest.join(" "))
}

/// Apply the phone policy. Empty or whitespace-only input becomes `None`
/// so the field is omitted from the payload entirely.
pub fn normalize_phone(raw: Option<&str>, policy: PhonePolicy) -> Option<String> {
    let raw = raw.map(str::trim).filter(|p| !p.is_empty())?;
    let cleaned = match policy {
        PhonePolicy::Passthrough => raw.to_string(),
        PhonePolicy::DigitsOnly => raw.chars().filter(char::is_ascii_digit).collect(),
    };
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Build the delivery-ready lead from an attendee and its classification.
///
/// A missing email is tolerated: the record is forwarded anyway and the
/// gap is logged against the grouping key.
pub fn normalize(
    attendee: &AggregatedAttendee,
    classification: Classification,
    phone_policy: PhonePolicy,
) -> ClassifiedLead {
    if attendee.email.is_empty() {
        warn!("lead '{}' has no email, forwarding anyway", attendee.key);
    }

    ClassifiedLead {
        key: attendee.key.clone(),
        first_name: attendee.first_name.clone(),
        last_name: attendee.last_name.clone(),
        email: attendee.email.clone(),
        phone: normalize_phone(attendee.phone.as_deref(), phone_policy),
        tag: classification.tag,
        hot_lead: classification.hot_lead,
        time_live_secs: attendee.total_duration_secs,
    }
}
