//! Report directory housekeeping and the external report generator hook.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::NaiveDate;

use crate::settings::ReportSettings;

/// Remove `dir` if it exists and create it again, empty.
fn recreate(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Start a run with empty results and output directories.
pub fn reset_dirs(settings: &ReportSettings) -> io::Result<()> {
    recreate(&settings.results_dir)?;
    recreate(&settings.output_dir)?;
    tracing::info!(
        results = %settings.results_dir.display(),
        output = %settings.output_dir.display(),
        "report directories reset"
    );
    Ok(())
}

/// Directory a report generated on `date` is written to.
pub fn report_dir(settings: &ReportSettings, date: NaiveDate) -> PathBuf {
    settings
        .output_dir
        .join(format!("allure_report_{}", date.format("%Y-%m-%d")))
}

/// Run the configured generator over the results directory.
///
/// Returns the report directory, or `None` when no generator is configured.
/// A generator exiting with a failure status is an error.
pub fn generate(settings: &ReportSettings, date: NaiveDate) -> io::Result<Option<PathBuf>> {
    let Some(generator) = settings.generator.as_deref() else {
        return Ok(None);
    };
    let out = report_dir(settings, date);
    fs::create_dir_all(&out)?;
    tracing::info!(dir = %out.display(), "generating report");

    let status = Command::new(generator)
        .arg("generate")
        .arg(&settings.results_dir)
        .arg("--clean")
        .arg("-o")
        .arg(&out)
        .status()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("`{generator} generate` exited with {status}"),
        ));
    }

    if settings.open {
        let status = Command::new(generator).arg("open").arg(&out).status()?;
        if !status.success() {
            tracing::warn!(%status, "report viewer exited with an error");
        }
    }
    Ok(Some(out))
}
