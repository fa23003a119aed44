//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, credential masking)
//!     → metrics.rs (counters for requests, retries, breaker transitions)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; fields over formatted strings
//! - Metrics are cheap (atomic increments through the metrics facade)
//! - No exporter here: the driver is a library, the host owns exposition
//! - Secrets are masked before they reach any log or Debug output

pub mod logging;
pub mod metrics;

pub use logging::mask_secret;
