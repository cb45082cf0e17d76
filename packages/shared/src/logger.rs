//! Logging setup utilities for the omok-sync packages.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default filter enables the given level for the game core crate and
/// for the binary itself. It can be overridden with the `RUST_LOG`
/// environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "omok")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use omok_shared::logger::setup_logger;
///
/// setup_logger("omok", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "omok_core={level},omok_client={level},{binary}={level}",
        level = default_log_level,
        binary = binary_name.replace('-', "_"),
    )
}
