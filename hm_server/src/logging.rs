//! Structured logging for the server.
//!
//! `tracing-subscriber` is installed once at startup. Records emitted through
//! the `log` facade by the `hangman` library end up in the same subscriber.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Startup steps slower than this are logged at warn
const SLOW_STARTUP_STEP: Duration = Duration::from_secs(1);

/// Store calls slower than this are logged at warn
const SLOW_STORE_CALL: Duration = Duration::from_millis(100);

/// Install the global subscriber.
///
/// ```no_run
/// hm_server::logging::init();
/// tracing::info!("listening");
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Time a startup step such as schema bootstrap.
///
/// ```
/// use hm_server::logging::log_performance;
/// use std::time::Instant;
///
/// let started = Instant::now();
/// log_performance("ensure_schema", started.elapsed(), Some("hangman_players"));
/// ```
pub fn log_performance(step: &str, duration: Duration, detail: Option<&str>) {
    if duration > SLOW_STARTUP_STEP {
        tracing::warn!(step, duration_ms = millis(duration), detail, "slow startup step");
    } else {
        tracing::debug!(step, duration_ms = millis(duration), detail, "startup step done");
    }
}

/// Record one stats store call made by a handler.
///
/// Failures are logged at error with the backend message, which never
/// reaches the HTTP client.
pub fn log_store_operation(
    operation: &str,
    player_name: &str,
    duration: Duration,
    error: Option<&str>,
) {
    let duration_ms = millis(duration);
    if let Some(error) = error {
        tracing::error!(operation, player_name, duration_ms, error, "stats store call failed");
    } else if duration > SLOW_STORE_CALL {
        tracing::warn!(operation, player_name, duration_ms, "slow stats store call");
    } else {
        tracing::debug!(operation, player_name, duration_ms, "stats store call");
    }
}

/// One line per finished HTTP request; `path` is the route template.
pub fn log_api_request(method: &str, path: &str, status: u16, duration: Duration) {
    let duration_ms = millis(duration);
    if status >= 500 {
        tracing::warn!(method, path, status, duration_ms, "request failed");
    } else {
        tracing::info!(method, path, status, duration_ms, "request served");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(42)), 42);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_helpers_run_without_subscriber() {
        log_performance("ensure_schema", Duration::from_secs(2), None);
        log_store_operation("increment_stat", "Ada", Duration::from_millis(150), None);
        log_store_operation("get_player", "Ada", Duration::from_millis(3), Some("pool timed out"));
        log_api_request("PUT", "/api/players/stats", 503, Duration::from_millis(12));
    }
}
