//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the driver.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::observability::logging::mask_secret;

/// Root configuration for the PostHog driver.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Base API URL (e.g., "https://us.posthog.com").
    pub api_url: String,

    /// Personal API key for analytics/query endpoints (required).
    pub api_key: String,

    /// PostHog project ID (required).
    pub project_id: String,

    /// Project API key for event capture and flag evaluation (optional).
    pub project_api_key: Option<String>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry/backoff/circuit-breaker settings.
    pub resilience: ResilienceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            api_url: "https://us.posthog.com".to_string(),
            api_key: String::new(),
            project_id: String::new(),
            project_api_key: None,
            timeouts: TimeoutConfig::default(),
            resilience: ResilienceConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Host used for event ingestion, derived from the API host.
    ///
    /// PostHog serves capture traffic from `i.posthog.com` rather than the
    /// app host; self-hosted URLs pass through unchanged.
    pub fn capture_url(&self) -> String {
        self.api_url.replace("posthog.com", "i.posthog.com")
    }
}

// Keys never appear in Debug output; the derived impl would leak them
// through any context-printing error path.
impl std::fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &mask_secret(&self.api_key))
            .field("project_id", &self.project_id)
            .field(
                "project_api_key",
                &self.project_api_key.as_deref().map(mask_secret),
            )
            .field("timeouts", &self.timeouts)
            .field("resilience", &self.resilience)
            .finish()
    }
}

/// Timeout configuration for transport operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Retry, backoff and circuit-breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Maximum number of attempts per logical call (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_wait_ms: u64,

    /// Maximum delay for the deterministic backoff component in milliseconds.
    pub max_wait_ms: u64,

    /// Multiplier applied per attempt to the base delay.
    pub growth_factor: f64,

    /// Upper bound of the jitter added to each delay, as a fraction of the
    /// capped delay. 0.10 means up to 10% extra.
    pub jitter_fraction: f64,

    /// Consecutive failures before a breaker opens.
    pub failure_threshold: u32,

    /// Seconds a breaker stays open before admitting a trial request.
    pub recovery_timeout_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_wait_ms: 1_000,
            max_wait_ms: 32_000,
            growth_factor: 2.0,
            jitter_fraction: 0.10,
            failure_threshold: 5,
            recovery_timeout_secs: 60,
        }
    }
}

impl ResilienceConfig {
    pub fn base_wait(&self) -> Duration {
        Duration::from_millis(self.base_wait_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.recovery_timeout_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
