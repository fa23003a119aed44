//! Error types for the request-execution core.

use thiserror::Error;

use crate::transport::{TransportError, TransportErrorKind};

/// The failure observed on a single attempt, kept as the cause of a
/// terminal error.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// No response arrived at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a failure status.
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl AttemptFailure {
    /// Build the HTTP-status variant, truncating the body for error output.
    pub fn from_status(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 256;
        let mut snippet: String = body.chars().take(MAX_BODY).collect();
        if body.chars().count() > MAX_BODY {
            snippet.push_str("...");
        }
        AttemptFailure::Status {
            status,
            body: snippet,
        }
    }

    /// Status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptFailure::Status { status, .. } => Some(*status),
            AttemptFailure::Transport(_) => None,
        }
    }

    /// Transport error kind, when no response was received.
    pub fn error_kind(&self) -> Option<TransportErrorKind> {
        match self {
            AttemptFailure::Transport(e) => Some(e.kind),
            AttemptFailure::Status { .. } => None,
        }
    }
}

/// Terminal outcomes of `RequestExecutor::execute`.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The endpoint's breaker is open; no transport call was made.
    #[error("circuit breaker open for endpoint '{endpoint}'")]
    CircuitOpen { endpoint: String },

    /// Every attempt in the budget failed with a retryable error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: AttemptFailure,
    },

    /// The failure was classified as permanent; retrying cannot help.
    #[error("non-retryable failure{}: {cause}", status_suffix(.status))]
    NonRetryable {
        status: Option<u16>,
        #[source]
        cause: AttemptFailure,
    },

    /// An external cancellation aborted the call during backoff.
    #[error("request cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}
