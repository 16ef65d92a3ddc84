use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const CONFIG_FILE: &str = "books-api";
const ENV_PREFIX: &str = "BOOKS_API";

/// Where the suite points and how long it waits.
///
/// Sources, lowest priority first: built-in defaults, an optional
/// `books-api.toml` in the working directory, then `BOOKS_API_*` environment
/// variables (nested keys use `__`, e.g. `BOOKS_API_REPORTS__GENERATOR`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_base_url")]
    pub base_url: String,
    #[serde(default = "Settings::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub reports: ReportSettings,
}

impl Settings {
    /// Load configuration from `.env`, the optional config file and the
    /// environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        // A missing `.env` is fine.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_config(builder.build()?)
    }

    pub fn from_config(cfg: config::Config) -> Result<Self, config::ConfigError> {
        cfg.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn default_base_url() -> String {
        "http://127.0.0.1:3000/v1/books".to_string()
    }

    fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            reports: ReportSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Raw results written by the test run.
    #[serde(default = "ReportSettings::default_results_dir")]
    pub results_dir: PathBuf,
    /// Parent directory of generated reports.
    #[serde(default = "ReportSettings::default_output_dir")]
    pub output_dir: PathBuf,
    /// Wipe and recreate both directories when a session starts.
    #[serde(default = "ReportSettings::default_reset")]
    pub reset: bool,
    /// External report generator, e.g. `allure`. Unset disables generation.
    #[serde(default)]
    pub generator: Option<String>,
    /// Open the generated report once it is written.
    #[serde(default)]
    pub open: bool,
}

impl ReportSettings {
    /// No directory handling and no generator.
    pub fn disabled() -> Self {
        Self {
            reset: false,
            generator: None,
            open: false,
            ..Self::default()
        }
    }

    fn default_results_dir() -> PathBuf {
        PathBuf::from("allure-results")
    }

    fn default_output_dir() -> PathBuf {
        PathBuf::from("reports")
    }

    fn default_reset() -> bool {
        true
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            results_dir: Self::default_results_dir(),
            output_dir: Self::default_output_dir(),
            reset: Self::default_reset(),
            generator: None,
            open: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Settings {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap();
        Settings::from_config(cfg).unwrap()
    }

    #[test]
    fn defaults_point_at_local_server() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://127.0.0.1:3000/v1/books");
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.reports.results_dir, PathBuf::from("allure-results"));
        assert!(settings.reports.reset);
        assert!(settings.reports.generator.is_none());
    }

    #[test]
    fn empty_source_falls_back_to_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.base_url, Settings::default().base_url);
        assert_eq!(settings.timeout_secs, 10);
        assert_eq!(settings.reports.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            r#"
            base_url = "https://books.example.com/v1/books"
            timeout_secs = 3

            [reports]
            generator = "allure"
            reset = false
            "#,
        );
        assert_eq!(settings.base_url, "https://books.example.com/v1/books");
        assert_eq!(settings.timeout(), Duration::from_secs(3));
        assert_eq!(settings.reports.generator.as_deref(), Some("allure"));
        assert!(!settings.reports.reset);
        assert_eq!(settings.reports.results_dir, PathBuf::from("allure-results"));
    }

    #[test]
    fn disabled_reports_do_nothing() {
        let reports = ReportSettings::disabled();
        assert!(!reports.reset);
        assert!(reports.generator.is_none());
        assert!(!reports.open);
    }
}
