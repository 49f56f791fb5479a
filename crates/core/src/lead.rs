use serde::{Deserialize, Serialize};

/// Attendance flag as reported by the source system.
///
/// Source APIs report this as free text (`"yes"` / `"no"` / anything else),
/// so the canonical model keeps it tri-state and collapses it to a boolean
/// during aggregation: only an explicit `Yes` counts as attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attendance {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Attendance {
    /// Parse a case-insensitive yes/no string. Anything else is `Unknown`.
    pub fn from_yes_no(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ => Self::Unknown,
        }
    }

    pub fn attended(self) -> bool {
        self == Self::Yes
    }
}

/// One attendance record as reported by the source system.
///
/// A person may produce several of these (re-joins, failover reconnects).
/// `person_key` is the platform's stable registrant id; when it is absent
/// the aggregator falls back to `email` as the grouping key.
#[derive(Debug, Clone, Default)]
pub struct RawSession {
    pub person_key: Option<String>,
    pub display_name: String,
    pub email: String,
    pub duration_secs: u64,
    pub attendance: Attendance,
    pub is_internal: bool,
    pub phone: Option<String>,
}

/// The deduplicated per-person record: one per distinct grouping key,
/// durations summed over every constituent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedAttendee {
    /// The grouping key actually used (registrant id, or email fallback).
    pub key: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub total_duration_secs: u64,
    pub attended: bool,
}

/// Engagement tier. Serialized values are the wire strings the CRM
/// webhook matches on, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementTag {
    #[serde(rename = "no-show")]
    NoShow,
    #[serde(rename = "low engagement")]
    LowEngagement,
    #[serde(rename = "high engagement")]
    HighEngagement,
}

impl EngagementTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoShow => "no-show",
            Self::LowEngagement => "low engagement",
            Self::HighEngagement => "high engagement",
        }
    }
}

impl std::fmt::Display for EngagementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one aggregated attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tag: EngagementTag,
    pub hot_lead: bool,
}

/// The canonical lead, shaped for delivery. Created once per attendee,
/// immutable thereafter, consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLead {
    pub key: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tag: EngagementTag,
    pub hot_lead: bool,
    pub time_live_secs: u64,
}

impl ClassifiedLead {
    /// Correlation key for log lines: email when present, else the
    /// grouping key. Nothing is skipped or fails without one of these.
    pub fn correlation_key(&self) -> &str {
        if self.email.is_empty() {
            &self.key
        } else {
            &self.email
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_parses_case_insensitively() {
        assert_eq!(Attendance::from_yes_no("Yes"), Attendance::Yes);
        assert_eq!(Attendance::from_yes_no(" NO "), Attendance::No);
        assert_eq!(Attendance::from_yes_no("maybe"), Attendance::Unknown);
        assert_eq!(Attendance::from_yes_no(""), Attendance::Unknown);
    }

    #[test]
    fn only_explicit_yes_counts_as_attended() {
        assert!(Attendance::Yes.attended());
        assert!(!Attendance::No.attended());
        assert!(!Attendance::Unknown.attended());
    }

    #[test]
    fn tag_wire_strings_are_stable() {
        assert_eq!(
            serde_json::to_string(&EngagementTag::NoShow).unwrap(),
            "\"no-show\""
        );
        assert_eq!(
            serde_json::to_string(&EngagementTag::LowEngagement).unwrap(),
            "\"low engagement\""
        );
        assert_eq!(
            serde_json::to_string(&EngagementTag::HighEngagement).unwrap(),
            "\"high engagement\""
        );
    }

    #[test]
    fn correlation_key_prefers_email() {
        let mut lead = ClassifiedLead {
            key: "R1".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "a@b.se".to_string(),
            phone: None,
            tag: EngagementTag::NoShow,
            hot_lead: false,
            time_live_secs: 0,
        };
        assert_eq!(lead.correlation_key(), "a@b.se");
        lead.email.clear();
        assert_eq!(lead.correlation_key(), "R1");
    }
}
