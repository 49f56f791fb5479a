//! WebinarJam / EverWebinar registrant rows → canonical sessions.
//!
//! Registrant feeds carry no stable person id, so `person_key` stays empty
//! and the aggregator groups by email. Live runs read the
//! `attended_live` / `time_live` pair; replay runs read
//! `attended_replay` / `time_replay` — same canonical fields either way.

use leadwire_api_types::JamRegistrant;
use leadwire_core::duration::parse_duration;
use leadwire_core::{Attendance, RawSession};

/// Map a registrant using the live-room attendance fields.
pub fn registrant_to_session(r: &JamRegistrant) -> RawSession {
    to_session(r, r.attended_live.as_deref(), r.time_live.as_deref())
}

/// Map a registrant using the replay attendance fields.
pub fn replay_to_session(r: &JamRegistrant) -> RawSession {
    to_session(r, r.attended_replay.as_deref(), r.time_replay.as_deref())
}

/// Whether the registrant purchased during the live session.
pub fn purchased(r: &JamRegistrant) -> bool {
    r.purchased_live
        .as_deref()
        .is_some_and(|p| p.trim().eq_ignore_ascii_case("yes"))
}

fn to_session(r: &JamRegistrant, attended: Option<&str>, time: Option<&str>) -> RawSession {
    let display_name = format!("{} {}", r.first_name.trim(), r.last_name.trim())
        .trim()
        .to_string();
    RawSession {
        person_key: None,
        display_name,
        email: r.email.clone(),
        duration_secs: parse_duration(time.unwrap_or(""), 0),
        attendance: attended.map(Attendance::from_yes_no).unwrap_or_default(),
        is_internal: false,
        phone: r.phone_number.clone().filter(|p| !p.trim().is_empty()),
    }
}
