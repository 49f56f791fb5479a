//! Per-run counters.
//!
//! One instance lives in the command's execution context and is mutated
//! sequentially as records move through the run; nothing here is shared
//! across threads.

/// Counters for one processing run, logged at completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Raw records fetched from the source (session rows, not people).
    pub fetched: u64,
    /// Distinct people after aggregation.
    pub aggregated: u64,
    /// Sessions dropped for lacking any grouping key.
    pub skipped_no_key: u64,
    /// Internal-user sessions dropped by the filter.
    pub dropped_internal: u64,
    /// Leads the tag filter kept back from delivery.
    pub filtered_out: u64,
    /// Webhook deliveries that succeeded.
    pub sent: u64,
    /// Webhook deliveries that failed after retries.
    pub failed: u64,
}

impl RunStats {
    pub fn record_sent(&mut self, success: bool) {
        if success {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }

    /// One-line summary for the end-of-run log.
    pub fn summary(&self) -> String {
        format!(
            "fetched {} sessions, {} unique people ({} keyless skipped, {} internal dropped), {} filtered out, {} sent, {} failed",
            self.fetched,
            self.aggregated,
            self.skipped_no_key,
            self.dropped_internal,
            self.filtered_out,
            self.sent,
            self.failed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sent_splits_success_and_failure() {
        let mut stats = RunStats::default();
        stats.record_sent(true);
        stats.record_sent(true);
        stats.record_sent(false);
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn summary_mentions_every_counter() {
        let stats = RunStats {
            fetched: 10,
            aggregated: 7,
            skipped_no_key: 1,
            dropped_internal: 2,
            filtered_out: 3,
            sent: 4,
            failed: 0,
        };
        let line = stats.summary();
        assert!(line.contains("10 sessions"));
        assert!(line.contains("7 unique people"));
        assert!(line.contains("4 sent"));
    }
}
