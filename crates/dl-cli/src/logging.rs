use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "DL_LOG";

/// Logs go to stderr so stdout stays machine-readable. `fallback` applies
/// when `DL_LOG` is unset or invalid.
pub(crate) fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
