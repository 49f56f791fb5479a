//! Deduplication and merging of raw session records into one record per
//! person.
//!
//! A person re-joining the room produces several source rows sharing a
//! registrant id; this module folds them into a single attendee with the
//! durations summed. Internal staff are dropped unless the allow-list says
//! otherwise, and rows with no usable grouping key are skipped and counted.

use std::collections::HashMap;

use tracing::warn;

use crate::lead::{AggregatedAttendee, RawSession};
use crate::normalize::split_display_name;

/// Which internal-user sessions survive the filter.
///
/// Sources flag their own staff with `is_internal`; those rows are excluded
/// from lead processing except for display names on the allow-list (the
/// host who must stay in the data, typically).
#[derive(Debug, Clone, Default)]
pub struct InternalPolicy {
    allowed_names: Vec<String>,
}

impl InternalPolicy {
    /// Drop every internal session.
    pub fn drop_all() -> Self {
        Self::default()
    }

    /// Keep internal sessions whose display name matches one of `names`
    /// exactly (after trimming).
    pub fn allow_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_names: names
                .into_iter()
                .map(|n| n.into().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    fn keeps(&self, session: &RawSession) -> bool {
        if !session.is_internal {
            return true;
        }
        let name = session.display_name.trim();
        self.allowed_names.iter().any(|allowed| allowed == name)
    }
}

/// Output of one aggregation pass: the merged attendees in first-appearance
/// order, plus counts of what was filtered on the way.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub attendees: Vec<AggregatedAttendee>,
    pub skipped_no_key: u64,
    pub dropped_internal: u64,
}

/// Merge raw sessions into one `AggregatedAttendee` per person.
///
/// Grouping key is `person_key`, falling back to `email` when the key is
/// blank. Sessions with neither are skipped. The first session seen for a
/// group fixes the name and email; durations accumulate across the whole
/// group. Identical duplicate rows still sum — callers needing idempotent
/// dedup must pre-filter on a session-level unique id.
pub fn aggregate(sessions: &[RawSession], policy: &InternalPolicy) -> Aggregation {
    let mut out = Aggregation::default();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for session in sessions {
        if !policy.keeps(session) {
            out.dropped_internal += 1;
            continue;
        }

        let key = match grouping_key(session) {
            Some(key) => key,
            None => {
                warn!(
                    "skipping session with no registrant id or email (name: '{}')",
                    session.display_name
                );
                out.skipped_no_key += 1;
                continue;
            }
        };

        match index_by_key.get(&key) {
            Some(&idx) => {
                let attendee = &mut out.attendees[idx];
                attendee.total_duration_secs += session.duration_secs;
                attendee.attended |= session.attendance.attended();
                if attendee.phone.is_none() {
                    attendee.phone = non_empty(session.phone.as_deref());
                }
            }
            None => {
                let (first_name, last_name) = split_display_name(&session.display_name);
                index_by_key.insert(key.clone(), out.attendees.len());
                out.attendees.push(AggregatedAttendee {
                    key,
                    first_name,
                    last_name,
                    email: session.email.trim().to_string(),
                    phone: non_empty(session.phone.as_deref()),
                    total_duration_secs: session.duration_secs,
                    attended: session.attendance.attended(),
                });
            }
        }
    }

    out
}

fn grouping_key(session: &RawSession) -> Option<String> {
    if let Some(key) = non_empty(session.person_key.as_deref()) {
        return Some(key);
    }
    let email = session.email.trim();
    if email.is_empty() {
        None
    } else {
        Some(email.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
