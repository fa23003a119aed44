//! Driver-level error definitions.

use thiserror::Error;

use crate::config::ConfigError;
use crate::resilience::ExecuteError;

/// Errors surfaced by `PostHogClient` methods.
///
/// Resilience outcomes (`ExecuteError`) pass through unchanged except where
/// a status code has a sharper driver meaning (401/403 → authentication,
/// 404 → not found).
#[derive(Debug, Error)]
pub enum DriverError {
    /// Invalid or missing credentials.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Requested resource or object type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before any request was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("transport setup failed: {0}")]
    TransportSetup(String),

    /// Terminal outcome from the request-execution core.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
