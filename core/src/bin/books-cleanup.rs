//! Delete every book from the configured Books API.
//!
//! Useful after an aborted run left records behind. Exits non-zero if any
//! book could not be removed.

use std::process::ExitCode;

use books_core::{books, telemetry, ApiClient, Settings};

fn main() -> ExitCode {
    telemetry::init(&telemetry::default_directives(env!("CARGO_CRATE_NAME")));

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(%error, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };
    let client = match ApiClient::from_settings(&settings) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!(%error, "invalid client configuration");
            return ExitCode::FAILURE;
        }
    };

    match books::remove_all_books(&client) {
        Ok(report) if report.is_clean() => {
            println!("deleted {} book(s)", report.deleted.len());
            ExitCode::SUCCESS
        }
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("{}: {}", failure.id, failure.error);
            }
            eprintln!(
                "deleted {} book(s), {} failed",
                report.deleted.len(),
                report.failures.len()
            );
            ExitCode::FAILURE
        }
        Err(error) => {
            tracing::error!(%error, "could not list books");
            ExitCode::FAILURE
        }
    }
}
