use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LIBRARY_FILTER: &str = "books_core=info";

/// `RUST_LOG` if set, otherwise `default_directives`.
fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Directives covering this library plus the calling binary's own target.
pub fn default_directives(binary_target: &str) -> String {
    format!("{LIBRARY_FILTER},{binary_target}=info")
}

/// Install a stderr subscriber honouring `RUST_LOG`, falling back to
/// `default_directives`. Later calls are no-ops.
pub fn init(default_directives: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(default_directives))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Subscriber whose output is captured by the test harness.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(LIBRARY_FILTER))
        .with_test_writer()
        .try_init();
}
