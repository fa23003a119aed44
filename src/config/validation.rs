//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required credentials are present
//! - Validate value ranges (attempts ≥ 1, thresholds > 0, sane jitter)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: DriverConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into a client

use thiserror::Error;
use url::Url;

use crate::config::schema::DriverConfig;

/// A single field-level configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("api_key: personal API key is required (set api_key or POSTHOG_PERSONAL_API_KEY)")]
    MissingApiKey,

    #[error("project_id: project ID is required (set project_id or POSTHOG_PROJECT_ID)")]
    MissingProjectId,

    #[error("api_url: '{0}' is not a valid URL")]
    InvalidApiUrl(String),

    #[error("resilience.max_attempts: must be at least 1")]
    ZeroMaxAttempts,

    #[error("resilience.failure_threshold: must be greater than 0")]
    ZeroFailureThreshold,

    #[error("resilience.growth_factor: must be at least 1.0 (got {0})")]
    GrowthTooSmall(f64),

    #[error("resilience.jitter_fraction: must be in [0.0, 1.0) (got {0})")]
    JitterOutOfRange(f64),

    #[error("resilience.base_wait_ms: must be greater than 0")]
    ZeroBaseWait,

    #[error("timeouts.request_secs: must be greater than 0")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &DriverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }
    if config.project_id.trim().is_empty() {
        errors.push(ValidationError::MissingProjectId);
    }
    if Url::parse(&config.api_url).is_err() {
        errors.push(ValidationError::InvalidApiUrl(config.api_url.clone()));
    }

    let r = &config.resilience;
    if r.max_attempts == 0 {
        errors.push(ValidationError::ZeroMaxAttempts);
    }
    if r.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if r.growth_factor < 1.0 {
        errors.push(ValidationError::GrowthTooSmall(r.growth_factor));
    }
    if !(0.0..1.0).contains(&r.jitter_fraction) {
        errors.push(ValidationError::JitterOutOfRange(r.jitter_fraction));
    }
    if r.base_wait_ms == 0 {
        errors.push(ValidationError::ZeroBaseWait);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DriverConfig {
        DriverConfig {
            api_key: "phx_0123456789abcdef".into(),
            project_id: "4242".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.api_key.clear();
        config.project_id.clear();
        config.resilience.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::MissingApiKey));
        assert!(errors.contains(&ValidationError::MissingProjectId));
        assert!(errors.contains(&ValidationError::ZeroMaxAttempts));
    }

    #[test]
    fn test_jitter_bounds() {
        let mut config = valid_config();
        config.resilience.jitter_fraction = 1.0;
        assert!(validate_config(&config).is_err());

        config.resilience.jitter_fraction = 0.0;
        assert!(validate_config(&config).is_ok());

        config.resilience.jitter_fraction = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut config = valid_config();
        config.api_url = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidApiUrl(_)));
    }
}
