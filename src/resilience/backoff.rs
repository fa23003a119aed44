//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::ResilienceConfig;

/// Delay schedule for retry attempts.
///
/// The deterministic component doubles per attempt (by default) and is
/// capped at `max_wait`; jitter then adds up to `jitter_fraction` of the
/// capped value on top. The cap bounds the deterministic component only, so
/// the final delay may exceed it by the jitter margin.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    base: Duration,
    max_wait: Duration,
    growth_factor: f64,
    jitter_fraction: f64,
}

impl BackoffPolicy {
    pub fn new(base: Duration, max_wait: Duration, growth_factor: f64, jitter_fraction: f64) -> Self {
        Self {
            base,
            max_wait,
            growth_factor,
            jitter_fraction,
        }
    }

    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::new(
            config.base_wait(),
            config.max_wait(),
            config.growth_factor,
            config.jitter_fraction,
        )
    }

    /// Deterministic delay component for an attempt: `min(base * growth^attempt, max_wait)`.
    ///
    /// Attempt indices start at 0 for the wait after the first try. Negative
    /// attempts are unrepresentable by construction.
    pub fn capped_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as f64;
        let exponential = self.growth_factor.powf(f64::from(attempt));
        let capped_ms = (base_ms * exponential).min(self.max_wait.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }

    /// Full delay for an attempt: capped component plus uniform jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self.capped_delay(attempt);

        let jitter_max = capped.as_millis() as f64 * self.jitter_fraction;
        let jitter_ms = if jitter_max > 0.0 {
            // thread-local RNG: concurrent callers draw independently, so
            // simultaneous retries do not synchronize into a herd
            rand::thread_rng().gen_range(0.0..jitter_max)
        } else {
            0.0
        };

        capped + Duration::from_millis(jitter_ms as u64)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&ResilienceConfig::default())
    }
}
