// Tracing subscriber setup.
//
// RUST_LOG takes precedence over the level passed on the command line.
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber, writing to stderr so table output on
/// stdout stays clean.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Debug-level subscriber routed through the test harness; safe to call
/// from several tests.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
