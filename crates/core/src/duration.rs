//! Engaged-time strings: `"H:MM:SS"` / `"MM:SS"` ↔ total seconds.
//!
//! Source systems report watch time as colon-separated strings and are not
//! consistent about it. Parsing never fails: malformed input degrades to the
//! caller's default with a warn, because a bad duration on one record must
//! not abort a batch.

use tracing::warn;

/// Parse `"H:MM:SS"` or `"MM:SS"` into total seconds.
///
/// Any other part count, non-numeric content, or empty input yields
/// `default_secs`.
pub fn parse_duration(text: &str, default_secs: u64) -> u64 {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.contains(':') {
        return default_secs;
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let numbers: Option<Vec<u64>> = parts.iter().map(|p| p.trim().parse().ok()).collect();

    match numbers.as_deref() {
        Some(&[h, m, s]) => h * 3600 + m * 60 + s,
        Some(&[m, s]) => m * 60 + s,
        _ => {
            warn!(
                "duration string '{trimmed}' not in H:MM:SS or MM:SS form, defaulting to {default_secs}s"
            );
            default_secs
        }
    }
}

/// Format total seconds as `HH:MM:SS`.
///
/// Hours are total hours, not wrapped at 24, so long replay durations
/// survive a round-trip through the wire format.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_part_form() {
        assert_eq!(parse_duration("2:46:38", 0), 9998);
        assert_eq!(parse_duration("00:00:00", 7), 0);
        assert_eq!(parse_duration("01:30:00", 0), 5400);
    }

    #[test]
    fn parses_two_part_form() {
        assert_eq!(parse_duration("59:59", 0), 3599);
        assert_eq!(parse_duration("5:00", 0), 300);
    }

    #[test]
    fn malformed_input_yields_default() {
        assert_eq!(parse_duration("", 0), 0);
        assert_eq!(parse_duration("abc", 0), 0);
        assert_eq!(parse_duration("1:2:3:4", 0), 0);
        assert_eq!(parse_duration("1:xx:3", 0), 0);
        assert_eq!(parse_duration("no colons here", 42), 42);
        assert_eq!(parse_duration("::", 5), 5);
    }

    #[test]
    fn caller_default_is_honored() {
        assert_eq!(parse_duration("garbage", 123), 123);
    }

    #[test]
    fn format_pads_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3599), "00:59:59");
        assert_eq!(format_duration(5400), "01:30:00");
        assert_eq!(format_duration(9998), "02:46:38");
    }

    #[test]
    fn format_does_not_wrap_at_24_hours() {
        assert_eq!(format_duration(97_500), "27:05:00");
    }

    #[test]
    fn round_trips_across_the_full_range() {
        for h in [0u64, 1, 23, 24, 50, 99] {
            for (m, s) in [(0u64, 0u64), (59, 59), (30, 1), (1, 30)] {
                let secs = h * 3600 + m * 60 + s;
                assert_eq!(parse_duration(&format_duration(secs), 0), secs);
            }
        }
    }
}
