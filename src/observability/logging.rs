//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries/tests that want it
//! - Mask credentials before they appear in logs or Debug output
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and RUST_LOG
//! - Initialization is optional: embedding applications usually install
//!   their own subscriber, so init failures are not fatal

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a fmt subscriber with an env-filter.
///
/// `default_level` is used when `RUST_LOG` is unset. Safe to call more than
/// once; subsequent calls are no-ops because a global subscriber is already
/// installed.
pub fn init(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("posthog_driver={default_level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Mask a credential for log output, revealing a short prefix and suffix.
///
/// Anything too short to mask meaningfully collapses to `***` so that the
/// output never narrows the search space for a short secret.
pub fn mask_secret(secret: &str) -> String {
    const REVEAL: usize = 4;

    if secret.len() <= REVEAL * 2 {
        return "***".to_string();
    }

    // Byte slicing is safe here: keys are ASCII. Fall back to full masking
    // if someone hands us multi-byte content.
    if !secret.is_ascii() {
        return "***".to_string();
    }

    format!(
        "{}...{}",
        &secret[..REVEAL],
        &secret[secret.len() - REVEAL..]
    )
}
