//! Run-scoped test context.
//!
//! # Design
//! A `Session` owns the client every scenario uses and is passed to them
//! explicitly. Teardown removes every book of every known type and then runs
//! the report hook. It happens either through `Session::teardown` or, if the
//! session is dropped first (for instance while a failing test unwinds),
//! from `Drop`, so cleanup does not depend on test outcomes.

use thiserror::Error;

use crate::books::{self, CleanupReport};
use crate::client::{ApiClient, Transport, UreqTransport};
use crate::error::ApiError;
use crate::reports;
use crate::settings::{ReportSettings, Settings};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("report directory error: {0}")]
    Reports(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct Session<T: Transport = UreqTransport> {
    client: ApiClient<T>,
    reports: ReportSettings,
    finished: bool,
}

impl Session<UreqTransport> {
    pub fn start(settings: &Settings) -> Result<Self, SessionError> {
        let client = ApiClient::from_settings(settings)?;
        Self::with_client(client, settings.reports.clone())
    }

    /// `start` with settings loaded from the config file and environment.
    pub fn from_env() -> Result<Self, SessionError> {
        let settings = Settings::load()?;
        Self::start(&settings)
    }
}

impl<T: Transport> Session<T> {
    pub fn with_client(client: ApiClient<T>, reports: ReportSettings) -> Result<Self, SessionError> {
        if reports.reset {
            reports::reset_dirs(&reports)?;
        }
        tracing::info!(base_url = client.base_url(), "session started");
        Ok(Self {
            client,
            reports,
            finished: false,
        })
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Remove every book and run the report hook.
    ///
    /// Per-book delete failures are collected in the report; only a failure
    /// to list the books is returned as an error.
    pub fn teardown(mut self) -> Result<CleanupReport, ApiError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<CleanupReport, ApiError> {
        self.finished = true;

        let outcome = books::remove_all_books(&self.client);
        match &outcome {
            Ok(report) if !report.is_clean() => {
                tracing::warn!(orphaned = report.failures.len(), "session teardown left books behind");
            }
            Ok(_) => tracing::info!("session teardown complete"),
            Err(error) => tracing::error!(%error, "session teardown could not list books"),
        }

        let today = chrono::Local::now().date_naive();
        match reports::generate(&self.reports, today) {
            Ok(Some(dir)) => tracing::info!(dir = %dir.display(), "report generated"),
            Ok(None) => {}
            Err(error) => tracing::error!(%error, "report generation failed"),
        }

        outcome
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Empty server that counts how often the type listing is requested.
    #[derive(Clone, Default)]
    struct CountingTransport {
        listings: Rc<Cell<usize>>,
    }

    impl Transport for CountingTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            if request.method == HttpMethod::Get {
                self.listings.set(self.listings.get() + 1);
            }
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "[]".to_string(),
            })
        }
    }

    fn session(transport: CountingTransport) -> Session<CountingTransport> {
        let client = ApiClient::with_transport("http://localhost:3000/v1/books", transport).unwrap();
        Session::with_client(client, ReportSettings::disabled()).unwrap()
    }

    #[test]
    fn explicit_teardown_runs_cleanup_once() {
        let transport = CountingTransport::default();
        let listings = transport.listings.clone();

        let report = session(transport).teardown().unwrap();
        assert!(report.is_clean());
        assert_eq!(listings.get(), crate::types::BOOK_TYPES.len());
    }

    #[test]
    fn dropping_a_session_runs_cleanup() {
        let transport = CountingTransport::default();
        let listings = transport.listings.clone();

        drop(session(transport));
        assert_eq!(listings.get(), crate::types::BOOK_TYPES.len());
    }

    #[test]
    fn start_resets_report_dirs_when_asked() {
        let root = std::env::temp_dir().join(format!("books-session-{}", uuid::Uuid::new_v4()));
        let reports = ReportSettings {
            results_dir: root.join("allure-results"),
            output_dir: root.join("reports"),
            reset: true,
            generator: None,
            open: false,
        };
        let client =
            ApiClient::with_transport("http://localhost:3000/v1/books", CountingTransport::default())
                .unwrap();
        let session = Session::with_client(client, reports.clone()).unwrap();
        assert!(reports.results_dir.is_dir());
        assert!(reports.output_dir.is_dir());
        session.teardown().unwrap();
    }
}
