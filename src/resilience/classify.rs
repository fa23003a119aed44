//! Retry-eligibility classification.
//!
//! # Rules (in order)
//! 1. Transport-level connect/timeout failures are retryable regardless of
//!    any status code — no response ever arrived
//! 2. 5xx responses are retryable (server-side, likely transient)
//! 3. 429 is retryable (rate limited)
//! 4. Other 4xx are not: repeating a malformed or unauthorized request
//!    cannot succeed
//! 5. Anything unrecognizable is not retryable, as the conservative default

use crate::transport::TransportErrorKind;

/// Whether a failed attempt is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Retryable,
    NonRetryable,
}

/// Map a transport outcome to a retry disposition.
pub fn classify(error_kind: Option<TransportErrorKind>, status: Option<u16>) -> Disposition {
    if matches!(
        error_kind,
        Some(TransportErrorKind::Connect | TransportErrorKind::Timeout)
    ) {
        return Disposition::Retryable;
    }

    match status {
        Some(code) if (500..600).contains(&code) => Disposition::Retryable,
        Some(429) => Disposition::Retryable,
        Some(code) if (400..500).contains(&code) => Disposition::NonRetryable,
        _ => Disposition::NonRetryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failures_always_retryable() {
        assert_eq!(
            classify(Some(TransportErrorKind::Connect), None),
            Disposition::Retryable
        );
        assert_eq!(
            classify(Some(TransportErrorKind::Timeout), None),
            Disposition::Retryable
        );
        // Even a 4xx alongside a connect failure retries; the status is stale.
        assert_eq!(
            classify(Some(TransportErrorKind::Connect), Some(400)),
            Disposition::Retryable
        );
    }

    #[test]
    fn test_server_errors_retryable() {
        for code in [500, 502, 503, 599] {
            assert_eq!(classify(None, Some(code)), Disposition::Retryable, "{code}");
        }
    }

    #[test]
    fn test_rate_limit_retryable() {
        assert_eq!(classify(None, Some(429)), Disposition::Retryable);
    }

    #[test]
    fn test_client_errors_not_retryable() {
        for code in [400, 401, 403, 404, 422, 499] {
            assert_eq!(
                classify(None, Some(code)),
                Disposition::NonRetryable,
                "{code}"
            );
        }
    }

    #[test]
    fn test_conservative_default() {
        assert_eq!(classify(None, None), Disposition::NonRetryable);
        assert_eq!(
            classify(Some(TransportErrorKind::Request), None),
            Disposition::NonRetryable
        );
        assert_eq!(classify(None, Some(302)), Disposition::NonRetryable);
    }
}
