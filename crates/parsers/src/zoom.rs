//! Zoom record shapes → canonical sessions.

use leadwire_api_types::{ZoomAbsentee, ZoomParticipant};
use leadwire_core::{Attendance, RawSession};

/// Map one participant session row. Presence in the participants listing
/// means the person attended; the registrant id is the grouping key, with
/// the aggregator falling back to the email when Zoom omitted it.
pub fn participant_to_session(p: &ZoomParticipant) -> RawSession {
    RawSession {
        person_key: non_empty(&p.registrant_id),
        display_name: p.name.clone(),
        email: p.user_email.clone(),
        duration_secs: p.duration,
        attendance: Attendance::Yes,
        is_internal: p.internal_user,
        phone: None,
    }
}

/// Map one absentee record. Absentees are full registrant objects and may
/// carry a phone number; their engaged time is zero by definition.
pub fn absentee_to_session(a: &ZoomAbsentee) -> RawSession {
    let display_name = format!("{} {}", a.first_name.trim(), a.last_name.trim())
        .trim()
        .to_string();
    RawSession {
        person_key: non_empty(&a.id),
        display_name,
        email: a.email.clone(),
        duration_secs: 0,
        attendance: Attendance::No,
        is_internal: false,
        phone: a.phone.clone().filter(|p| !p.trim().is_empty()),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
