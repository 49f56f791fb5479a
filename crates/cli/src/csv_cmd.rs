//! `leadwire import-csv` / `leadwire normalize-csv` — file-based runs.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use leadwire_core::pipeline;
use leadwire_parsers::csv_file;

use crate::context::DeliveryContext;

/// Read an attendance export and forward every lead.
pub async fn run_import(file: &Path) -> Result<()> {
    let mut ctx = DeliveryContext::from_env()?;

    info!("importing attendance CSV {}", file.display());
    let sessions = csv_file::read_sessions(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    ctx.stats.fetched = sessions.len() as u64;

    let out = pipeline::run(&sessions, &ctx.internal_policy(), ctx.phone_policy());
    ctx.stats.aggregated = out.leads.len() as u64;
    ctx.stats.skipped_no_key = out.skipped_no_key;
    ctx.stats.dropped_internal = out.dropped_internal;

    for lead in &out.leads {
        ctx.deliver(lead, false, None, None).await;
    }

    info!("import run complete: {}", ctx.stats.summary());
    Ok(())
}

/// Rewrite a CSV with yes/no columns normalized to 1/0. Needs no webhook
/// configuration; this command performs no delivery.
pub fn run_normalize(input: &Path, output: &Path) -> Result<()> {
    let rows = csv_file::normalize_yes_no(input, output)
        .with_context(|| format!("failed to normalize {}", input.display()))?;
    info!(
        "normalized {} rows from {} into {}",
        rows,
        input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn normalize_command_writes_the_output_file() {
        let mut input = tempfile::NamedTempFile::new().expect("temp file");
        input
            .write_all(b"Name,Attended Live\nCarl Helgesson,Yes\n")
            .expect("write csv");
        let output = tempfile::NamedTempFile::new().expect("temp file");

        run_normalize(input.path(), output.path()).expect("normalize");
        let text = std::fs::read_to_string(output.path()).expect("read output");
        assert!(text.contains("Carl Helgesson,1"));
    }

    #[test]
    fn normalize_command_fails_on_missing_input() {
        let output = tempfile::NamedTempFile::new().expect("temp file");
        let missing = std::path::Path::new("/nonexistent/attendance.csv");
        assert!(run_normalize(missing, output.path()).is_err());
    }
}
