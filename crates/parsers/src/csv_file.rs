//! CSV exports → canonical sessions, plus the 1/0-normalizing rewriter.
//!
//! Exports from the webinar platforms vary in header casing and in which
//! optional columns exist, so columns are located by case-insensitive
//! header match. Rows without a name AND email are still produced — the
//! aggregator is the one place that decides what is droppable.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use leadwire_core::duration::parse_duration;
use leadwire_core::{Attendance, RawSession};

const EMAIL_HEADERS: &[&str] = &["email"];
const NAME_HEADERS: &[&str] = &["name", "full name"];
const PHONE_HEADERS: &[&str] = &["phone", "phone number", "phone_number"];
const ATTENDED_HEADERS: &[&str] = &["attended live", "attended_live", "attended"];
const TIME_HEADERS: &[&str] = &["time live", "time_live", "duration"];

/// Read a CSV export into canonical sessions.
///
/// Requires `Email` and `Name` headers (any casing); attendance, phone and
/// engaged-time columns are optional. A missing attendance column means
/// attendance is unknown for every row.
pub fn read_sessions(path: &Path) -> Result<Vec<RawSession>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open CSV {}", path.display()))?;

    let headers = reader.headers().context("CSV has no header row")?.clone();
    let email_col = find_column(&headers, EMAIL_HEADERS)
        .context("CSV is missing a required 'Email' column")?;
    let name_col =
        find_column(&headers, NAME_HEADERS).context("CSV is missing a required 'Name' column")?;
    let phone_col = find_column(&headers, PHONE_HEADERS);
    let attended_col = find_column(&headers, ATTENDED_HEADERS);
    let time_col = find_column(&headers, TIME_HEADERS);

    let mut sessions = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping unreadable CSV row {}: {e}", row_idx + 2);
                continue;
            }
        };

        sessions.push(RawSession {
            person_key: None,
            display_name: cell(&record, Some(name_col)).to_string(),
            email: cell(&record, Some(email_col)).to_string(),
            duration_secs: parse_duration(cell(&record, time_col), 0),
            attendance: match cell(&record, attended_col) {
                "" => Attendance::Unknown,
                raw => Attendance::from_yes_no(raw),
            },
            is_internal: false,
            phone: match cell(&record, phone_col) {
                "" => None,
                p => Some(p.to_string()),
            },
        });
    }

    Ok(sessions)
}

/// Rewrite a CSV with every yes/no cell normalized to `1`/`0`; headers and
/// all other cells pass through untouched.
pub fn normalize_yes_no(input: &Path, output: &Path) -> Result<u64> {
    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("failed to open CSV {}", input.display()))?;
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("failed to create CSV {}", output.display()))?;

    let headers = reader.headers().context("CSV has no header row")?.clone();
    writer.write_record(&headers)?;

    let mut rows = 0u64;
    for record in reader.records() {
        let record = record.context("unreadable CSV row")?;
        let normalized: Vec<String> = record
            .iter()
            .map(|cell| match cell.trim().to_ascii_lowercase().as_str() {
                "yes" => "1".to_string(),
                "no" => "0".to_string(),
                _ => cell.to_string(),
            })
            .collect();
        writer.write_record(&normalized)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

fn cell<'r>(record: &'r csv::StringRecord, col: Option<usize>) -> &'r str {
    col.and_then(|c| record.get(c)).unwrap_or("").trim()
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn reads_sessions_with_all_columns() {
        let file = write_csv(
            "Name,Email,Phone,Attended Live,Time Live\n\
             Carl Helgesson,carl@example.com,+46 70 111,yes,02:46:38\n\
             Mariana,m@example.com,,No,00:00:00\n",
        );
        let sessions = read_sessions(file.path()).unwrap();
        assert_eq!(sessions.len(), 2);

        assert_eq!(sessions[0].display_name, "Carl Helgesson");
        assert_eq!(sessions[0].email, "carl@example.com");
        assert_eq!(sessions[0].phone.as_deref(), Some("+46 70 111"));
        assert_eq!(sessions[0].attendance, Attendance::Yes);
        assert_eq!(sessions[0].duration_secs, 9998);

        assert_eq!(sessions[1].attendance, Attendance::No);
        assert!(sessions[1].phone.is_none());
    }

    #[test]
    fn header_matching_ignores_case() {
        let file = write_csv("NAME,EMAIL,ATTENDED\nPia Test,pia@example.com,YES\n");
        let sessions = read_sessions(file.path()).unwrap();
        assert_eq!(sessions[0].attendance, Attendance::Yes);
        assert_eq!(sessions[0].email, "pia@example.com");
    }

    #[test]
    fn missing_optional_columns_default_cleanly() {
        let file = write_csv("Name,Email\nBo Ek,bo@example.com\n");
        let sessions = read_sessions(file.path()).unwrap();
        assert_eq!(sessions[0].attendance, Attendance::Unknown);
        assert_eq!(sessions[0].duration_secs, 0);
        assert!(sessions[0].phone.is_none());
    }

    #[test]
    fn missing_email_column_is_an_error() {
        let file = write_csv("Name,Attended\nNo Mail,yes\n");
        assert!(read_sessions(file.path()).is_err());
    }

    #[test]
    fn normalize_rewrites_yes_no_cells_only() {
        let input = write_csv(
            "Name,Attended Live,Purchased,Notes\n\
             Carl Helgesson,Yes,no,keep yes-ish text\n\
             Mariana,NO,YES,unchanged\n",
        );
        let output = tempfile::NamedTempFile::new().expect("temp file");
        let rows = normalize_yes_no(input.path(), output.path()).unwrap();
        assert_eq!(rows, 2);

        let text = std::fs::read_to_string(output.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "Name,Attended Live,Purchased,Notes");
        assert_eq!(lines.next().unwrap(), "Carl Helgesson,1,0,keep yes-ish text");
        assert_eq!(lines.next().unwrap(), "Mariana,0,1,unchanged");
    }
}
