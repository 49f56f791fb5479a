//! The full classification pipeline: raw sessions in, delivery-ready
//! leads out.
//!
//! Each stage owns its input and produces a fresh list for the next one:
//! aggregate (dedup + merge) → classify (tag + hot-lead) → normalize
//! (shape for delivery). Dispatch is the caller's job.

use crate::aggregate::{self, InternalPolicy};
use crate::classify::classify;
use crate::lead::{ClassifiedLead, RawSession};
use crate::normalize::{self, PhonePolicy};

/// Leads plus the filter counters accumulated on the way.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub leads: Vec<ClassifiedLead>,
    pub skipped_no_key: u64,
    pub dropped_internal: u64,
}

/// Run aggregation, classification and normalization over a batch.
pub fn run(
    sessions: &[RawSession],
    internal_policy: &InternalPolicy,
    phone_policy: PhonePolicy,
) -> PipelineOutput {
    let aggregation = aggregate::aggregate(sessions, internal_policy);

    let leads = aggregation
        .attendees
        .iter()
        .map(|attendee| normalize::normalize(attendee, classify(attendee), phone_policy))
        .collect();

    PipelineOutput {
        leads,
        skipped_no_key: aggregation.skipped_no_key,
        dropped_internal: aggregation.dropped_internal,
    }
}
