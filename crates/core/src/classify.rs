//! Engagement classification.
//!
//! The thresholds are fixed business constants, not tunables: 90 minutes in
//! the live room qualifies as high engagement, two hours flags the lead for
//! priority follow-up. Both boundaries are inclusive.

use crate::lead::{AggregatedAttendee, Classification, EngagementTag};

/// 1 h 30 min. At or above this an attendee is `high engagement`.
pub const HIGH_ENGAGEMENT_SECS: u64 = 5400;

/// 2 h. At or above this a high-engagement attendee is also a hot lead.
pub const HOT_LEAD_SECS: u64 = 7200;

/// Map an aggregated attendee to its engagement tag and hot-lead flag.
pub fn classify(attendee: &AggregatedAttendee) -> Classification {
    if !attendee.attended {
        return Classification {
            tag: EngagementTag::NoShow,
            hot_lead: false,
        };
    }

    let secs = attendee.total_duration_secs;
    if secs >= HIGH_ENGAGEMENT_SECS {
        Classification {
            tag: EngagementTag::HighEngagement,
            hot_lead: secs >= HOT_LEAD_SECS,
        }
    } else {
        Classification {
            tag: EngagementTag::LowEngagement,
            hot_lead: false,
        }
    }
}
