//! Metrics definitions for the session gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `session_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `outcome`: `authorized`, `renewed`, or a `GatewayError::kind()` value
//! - `operation`: `get`, `set`, `delete`
//! - `status`: `success`, `error`

use metrics::{counter, histogram};
use std::time::Duration;

/// Record the final decision for one protected request.
///
/// Metric: `session_gateway_decisions_total`
/// Labels: `outcome`
pub fn record_decision(outcome: &'static str) {
    counter!("session_gateway_decisions_total", "outcome" => outcome).increment(1);
}

/// Record a sliding renewal that overwrote the authoritative cache entry.
///
/// Metric: `session_gateway_renewals_total`
pub fn record_renewal() {
    counter!("session_gateway_renewals_total").increment(1);
}

/// Record a session cache round trip.
///
/// Metric: `session_cache_operations_total`, `session_cache_operation_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_cache_operation(operation: &'static str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };

    counter!(
        "session_cache_operations_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);

    histogram!(
        "session_cache_operation_duration_seconds",
        "operation" => operation
    )
    .record(duration.as_secs_f64());
}
