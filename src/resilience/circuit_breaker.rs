//! Circuit breaker for endpoint protection.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: endpoint assumed down, requests fail fast
//! - Half-Open: testing if the endpoint recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= threshold
//! Open → Half-Open: recovery timeout elapsed since last failure
//! Half-Open → Closed: trial request succeeds
//! Half-Open → Open: trial request fails (recovery window restarts)
//! ```
//!
//! # Design Decisions
//! - Per-endpoint breaker owned by the client (not global)
//! - Lazy check-on-read: `can_execute` performs the Open → Half-Open
//!   transition itself, no background timer
//! - Exactly one trial call admitted in Half-Open; concurrent callers are
//!   serialized through the state lock
//! - `tokio::time::Instant` anchors recovery timing so paused-clock tests
//!   can drive the window

use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

use crate::config::ResilienceConfig;
use crate::observability::metrics;

/// Breaker state, cycling for the lifetime of the owning client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation — calls pass through.
    Closed,
    /// Failing fast — calls are rejected immediately.
    Open,
    /// Testing recovery — one trial call is in flight.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
}

/// Per-endpoint failure gate.
///
/// All transition decisions happen under one lock; readers that want to act
/// on the state go through `can_execute`, never through a bare `state()`
/// read.
#[derive(Debug)]
pub struct CircuitBreaker {
    endpoint: String,
    failure_threshold: u32,
    recovery_timeout: std::time::Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(endpoint: impl Into<String>, config: &ResilienceConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            failure_threshold: config.failure_threshold,
            recovery_timeout: config.recovery_timeout(),
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure_at: None,
            }),
        }
    }

    /// Whether a call may proceed right now.
    ///
    /// This is the single authority for the Open → Half-Open transition:
    /// once the recovery timeout has elapsed, the first caller through here
    /// becomes the trial and every later caller is denied until the trial
    /// resolves via `record_success` or `record_failure`.
    pub fn can_execute(&self) -> bool {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => false,
            CircuitState::Open => {
                let elapsed_past_timeout = inner
                    .last_failure_at
                    .map(|at| at.elapsed() > self.recovery_timeout)
                    .unwrap_or(true);

                if elapsed_past_timeout {
                    inner.state = CircuitState::HalfOpen;
                    tracing::info!(
                        endpoint = %self.endpoint,
                        "circuit breaker half-open, admitting trial request"
                    );
                    metrics::record_circuit_transition(&self.endpoint, "half_open");
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
                tracing::info!(
                    endpoint = %self.endpoint,
                    "circuit breaker closed after successful trial"
                );
                metrics::record_circuit_transition(&self.endpoint, "closed");
            }
            CircuitState::Open => {
                // A call admitted before the breaker opened finished late.
                tracing::warn!(
                    endpoint = %self.endpoint,
                    "success recorded while circuit open, ignoring"
                );
            }
        }
    }

    /// Record a failed call.
    ///
    /// The failure timestamp is stamped on every recorded failure,
    /// whatever the state; it is the sole clock anchor for recovery.
    pub fn record_failure(&self) {
        let mut inner = self.lock();

        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure_at = Some(Instant::now());

        match inner.state {
            CircuitState::Closed => {
                if inner.failure_count >= self.failure_threshold {
                    inner.state = CircuitState::Open;
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        failures = inner.failure_count,
                        "circuit breaker opened"
                    );
                    metrics::record_circuit_transition(&self.endpoint, "open");
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                tracing::warn!(
                    endpoint = %self.endpoint,
                    "trial request failed, circuit breaker re-opened"
                );
                metrics::record_circuit_transition(&self.endpoint, "open");
            }
            CircuitState::Open => {
                // Late failure from a call admitted earlier; the fresh
                // timestamp extends the recovery window.
            }
        }
    }

    /// Current state (for monitoring; transition decisions go through
    /// `can_execute`).
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Consecutive failures since the last reset.
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("circuit breaker mutex poisoned")
    }
}

/// Map of endpoint name → breaker, owned by the client.
///
/// Breakers are created on first use and live for the registry's lifetime;
/// nothing here is process-global, so tests and multiple clients stay
/// isolated.
#[derive(Debug)]
pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    config: ResilienceConfig,
}

impl BreakerRegistry {
    pub fn new(config: ResilienceConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            config,
        }
    }

    /// Fetch the breaker for an endpoint, creating it on first use.
    pub fn breaker(&self, endpoint: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(endpoint.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(endpoint, &self.config)))
            .value()
            .clone()
    }

    /// State of an endpoint's breaker, if one exists yet.
    pub fn state_of(&self, endpoint: &str) -> Option<CircuitState> {
        self.breakers.get(endpoint).map(|b| b.state())
    }
}
