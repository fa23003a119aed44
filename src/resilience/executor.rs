//! Request execution with retries, backoff and circuit breaking.
//!
//! # Responsibilities
//! - Gate every attempt through the endpoint's circuit breaker
//! - Classify failures and retry only the transient ones
//! - Suspend between attempts per the backoff policy, without blocking
//! - Surface terminal errors; never swallow a failure silently

use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::ResilienceConfig;
use crate::lifecycle::Cancellation;
use crate::observability::metrics;
use crate::resilience::backoff::BackoffPolicy;
use crate::resilience::circuit_breaker::{BreakerRegistry, CircuitState};
use crate::resilience::classify::{classify, Disposition};
use crate::resilience::error::{AttemptFailure, ExecuteError};
use crate::transport::{RequestSpec, Transport, TransportResponse};

/// Orchestrates one logical call against the transport.
///
/// Shared by all of a client's endpoints; per-endpoint failure history
/// lives in the breaker registry.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    backoff: BackoffPolicy,
    max_attempts: u32,
    breakers: BreakerRegistry,
    cancel: Cancellation,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, config: &ResilienceConfig, cancel: Cancellation) -> Self {
        Self {
            transport,
            backoff: BackoffPolicy::from_config(config),
            // Validation rejects 0, but clamp anyway so the loop below
            // always makes at least one attempt.
            max_attempts: config.max_attempts.max(1),
            breakers: BreakerRegistry::new(config.clone()),
            cancel,
        }
    }

    /// Execute a request against a named endpoint, retrying transient
    /// failures up to the configured budget.
    ///
    /// A denial by the circuit breaker is a distinct fast-fail path: no
    /// transport call is made and no retry is attempted.
    pub async fn execute(
        &self,
        endpoint: &str,
        spec: RequestSpec,
    ) -> Result<TransportResponse, ExecuteError> {
        let call_id = Uuid::new_v4();
        let breaker = self.breakers.breaker(endpoint);
        let mut cancel_rx = self.cancel.subscribe();

        let mut attempt: u32 = 0;
        loop {
            if self.cancel.is_cancelled() {
                return Err(ExecuteError::Cancelled);
            }

            if !breaker.can_execute() {
                tracing::warn!(
                    endpoint = %endpoint,
                    call_id = %call_id,
                    "circuit open, failing fast"
                );
                return Err(ExecuteError::CircuitOpen {
                    endpoint: endpoint.to_string(),
                });
            }

            tracing::trace!(
                endpoint = %endpoint,
                call_id = %call_id,
                attempt,
                "sending request"
            );

            let started = Instant::now();
            let outcome = self.transport.send(&spec).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            let failure = match outcome {
                Ok(response) if response.is_success() => {
                    breaker.record_success();
                    metrics::record_attempt(endpoint, "success");
                    tracing::debug!(
                        endpoint = %endpoint,
                        call_id = %call_id,
                        attempt,
                        status = response.status,
                        latency_ms,
                        "request succeeded"
                    );
                    return Ok(response);
                }
                Ok(response) => AttemptFailure::from_status(response.status, &response.body),
                Err(transport_error) => AttemptFailure::Transport(transport_error),
            };

            // Every failure counts against the breaker, including the
            // non-retryable ones: a 4xx is still an unhealthy interaction.
            breaker.record_failure();
            metrics::record_attempt(endpoint, "failure");

            let disposition = classify(failure.error_kind(), failure.status());

            if disposition == Disposition::NonRetryable {
                tracing::error!(
                    endpoint = %endpoint,
                    call_id = %call_id,
                    attempt,
                    status = ?failure.status(),
                    latency_ms,
                    error = %failure,
                    "non-retryable failure"
                );
                return Err(ExecuteError::NonRetryable {
                    status: failure.status(),
                    cause: failure,
                });
            }

            if attempt + 1 >= self.max_attempts {
                tracing::error!(
                    endpoint = %endpoint,
                    call_id = %call_id,
                    attempts = self.max_attempts,
                    error = %failure,
                    "retries exhausted"
                );
                return Err(ExecuteError::RetryExhausted {
                    attempts: self.max_attempts,
                    last: failure,
                });
            }

            let wait = self.backoff.delay(attempt);
            tracing::warn!(
                endpoint = %endpoint,
                call_id = %call_id,
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %failure,
                "retrying after transient failure"
            );
            metrics::record_retry(endpoint);

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = cancel_rx.recv() => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        call_id = %call_id,
                        attempt,
                        "cancelled during backoff"
                    );
                    return Err(ExecuteError::Cancelled);
                }
            }

            attempt += 1;
        }
    }

    /// Breaker state for an endpoint, if any calls have been made to it.
    pub fn breaker_state(&self, endpoint: &str) -> Option<CircuitState> {
        self.breakers.state_of(endpoint)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish()
    }
}
