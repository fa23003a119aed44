//! Metrics collection.
//!
//! # Metrics
//! - `posthog_driver_requests_total` (counter): attempts by endpoint, outcome
//! - `posthog_driver_retries_total` (counter): retries by endpoint
//! - `posthog_driver_circuit_transitions_total` (counter): breaker
//!   transitions by endpoint, state
//!
//! Recorded through the `metrics` facade; the embedding process decides
//! whether and how to export them. With no recorder installed these calls
//! are no-ops.

use metrics::counter;

/// Record one transport attempt and its outcome ("success" or "failure").
pub fn record_attempt(endpoint: &str, outcome: &'static str) {
    counter!(
        "posthog_driver_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
}

/// Record a scheduled retry.
pub fn record_retry(endpoint: &str) {
    counter!("posthog_driver_retries_total", "endpoint" => endpoint.to_string()).increment(1);
}

/// Record a circuit breaker state transition.
pub fn record_circuit_transition(endpoint: &str, state: &'static str) {
    counter!(
        "posthog_driver_circuit_transitions_total",
        "endpoint" => endpoint.to_string(),
        "state" => state,
    )
    .increment(1);
}
