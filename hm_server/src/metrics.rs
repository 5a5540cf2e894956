//! Prometheus metrics for the hangman server.
//!
//! Recorded through the `metrics` facade. Nothing is exported until
//! [`init_metrics`] installs a Prometheus listener; before that every
//! recorder below is a no-op, which is what tests rely on.
//!
//! ```rust,no_run
//! use hm_server::metrics;
//!
//! metrics::init_metrics("127.0.0.1:9090".parse().unwrap()).unwrap();
//! metrics::rounds_started_total();
//! ```

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use hangman::Outcome;
use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, time::Instant};

use crate::logging;

/// Start the `/metrics` listener on `addr` and register metric help texts.
///
/// # Errors
///
/// Fails when a recorder is already installed or the listener cannot be
/// built.
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("cannot start metrics listener on {addr}: {e}"))?;

    describe_counter!("http_requests_total", "HTTP requests by route and status");
    describe_histogram!(
        "http_request_duration_ms",
        Unit::Milliseconds,
        "HTTP request latency by route"
    );
    describe_counter!("rounds_started_total", "Server-side rounds started");
    describe_counter!("rounds_completed_total", "Server-side rounds finished, by outcome");
    describe_gauge!("active_game_sessions", "Live game sessions");
    describe_counter!(
        "create_player_requests_total",
        "Successful create_player calls, existing records included"
    );
    describe_counter!("stats_updates_total", "Win/loss increments, by outcome");
    describe_counter!("stats_store_errors_total", "Failed stats store calls, by operation");
    Ok(())
}

/// Middleware recording request count and duration for every route.
///
/// The matched route template is used as the path label so game ids do
/// not blow up label cardinality.
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status().as_u16();
    http_requests_total(&method, &path, status);
    http_request_duration_ms(&method, &path, elapsed.as_secs_f64() * 1000.0);
    logging::log_api_request(&method, &path, status, elapsed);

    response
}

// === HTTP ===

pub fn http_requests_total(method: &str, path: &str, status: u16) {
    let (method, path, status) = (method.to_string(), path.to_string(), status.to_string());
    metrics::counter!("http_requests_total", "method" => method, "path" => path, "status" => status)
        .increment(1);
}

pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    let (method, path) = (method.to_string(), path.to_string());
    metrics::histogram!("http_request_duration_ms", "method" => method, "path" => path)
        .record(duration_ms);
}

// === Rounds ===

pub fn rounds_started_total() {
    metrics::counter!("rounds_started_total").increment(1);
}

/// Labelled `won` or `lost`.
pub fn rounds_completed_total(outcome: Outcome) {
    metrics::counter!("rounds_completed_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn active_game_sessions(count: usize) {
    metrics::gauge!("active_game_sessions").set(count as f64);
}

// === Stats store ===

/// Counts every successful create, not only new rows: under
/// `CreatePolicy::Preserve` an existing record is returned unchanged.
pub fn create_player_requests_total() {
    metrics::counter!("create_player_requests_total").increment(1);
}

/// Labelled `win` or `loss`.
pub fn stats_updates_total(won: bool) {
    metrics::counter!("stats_updates_total",
        "outcome" => if won { "win" } else { "loss" }
    )
    .increment(1);
}

pub fn stats_store_errors_total(operation: &'static str) {
    metrics::counter!("stats_store_errors_total",
        "operation" => operation
    )
    .increment(1);
}
