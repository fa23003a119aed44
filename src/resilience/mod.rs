//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the API:
//!     → circuit_breaker.rs (gate: deny fast while the endpoint is unhealthy)
//!     → transport (bounded by its own timeout)
//!     → classify.rs (is this failure worth retrying?)
//!     → backoff.rs (how long to wait before the next attempt)
//!     → executor.rs (ties the loop together, surfaces terminal errors)
//! ```
//!
//! # Design Decisions
//! - Classification is ordered: network-level failures retry regardless of
//!   status, 5xx/429 retry, other 4xx fail fast
//! - Every failure counts against the breaker, retryable or not
//! - Backoff suspension is an await, never a blocking sleep
//! - Terminal failures are always surfaced; nothing is swallowed

pub mod backoff;
pub mod circuit_breaker;
pub mod classify;
pub mod error;
pub mod executor;

pub use backoff::BackoffPolicy;
pub use circuit_breaker::{BreakerRegistry, CircuitBreaker, CircuitState};
pub use classify::{classify, Disposition};
pub use error::{AttemptFailure, ExecuteError};
pub use executor::RequestExecutor;
