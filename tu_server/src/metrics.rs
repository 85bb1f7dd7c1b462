//! Prometheus metrics for the game server.
//!
//! Counters are recorded unconditionally and are no-ops until an exporter is
//! installed with [`init_metrics`]. The exporter serves the Prometheus text
//! format on its own listener.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tu_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::joins_total(true);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request. `route` is a route template, never a raw path.
pub fn http_requests_total(method: &str, route: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Increment join attempts counter.
pub fn joins_total(accepted: bool) {
    metrics::counter!("joins_total",
        "accepted" => accepted.to_string()
    )
    .increment(1);
}

/// Set current seated players count.
pub fn players_seated(count: usize) {
    metrics::gauge!("players_seated").set(count as f64);
}

/// Increment bets counter.
pub fn bets_total(accepted: bool) {
    metrics::counter!("bets_total",
        "accepted" => accepted.to_string()
    )
    .increment(1);
}

/// Increment thumbs submissions counter.
pub fn thumbs_submissions_total(accepted: bool) {
    metrics::counter!("thumbs_submissions_total",
        "accepted" => accepted.to_string()
    )
    .increment(1);
}

/// Increment closed rounds counter.
pub fn rounds_total(hit: bool) {
    metrics::counter!("rounds_total",
        "hit" => hit.to_string()
    )
    .increment(1);
}

/// Increment finished games counter.
pub fn games_won_total() {
    metrics::counter!("games_won_total").increment(1);
}
