//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or environment
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DriverConfig (validated, immutable)
//!     → owned by the client for its lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new client
//! - All resilience fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::DriverConfig;
pub use schema::ResilienceConfig;
pub use schema::TimeoutConfig;
