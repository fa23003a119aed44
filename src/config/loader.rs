//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::DriverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DriverConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: DriverConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from the standard PostHog environment variables.
///
/// Reads `POSTHOG_API_URL`, `POSTHOG_PERSONAL_API_KEY`,
/// `POSTHOG_PROJECT_ID` and `POSTHOG_PROJECT_API_KEY`; resilience and
/// timeout settings keep their defaults.
pub fn load_from_env() -> Result<DriverConfig, ConfigError> {
    let mut config = DriverConfig::default();

    if let Ok(url) = env::var("POSTHOG_API_URL") {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    if let Ok(key) = env::var("POSTHOG_PERSONAL_API_KEY") {
        config.api_key = key;
    }
    if let Ok(id) = env::var("POSTHOG_PROJECT_ID") {
        config.project_id = id;
    }
    if let Ok(key) = env::var("POSTHOG_PROJECT_API_KEY") {
        config.project_api_key = Some(key);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
