//! PostHog API surface.
//!
//! # Data Flow
//! ```text
//! Driver method (query, capture, persons, ...)
//!     → build RequestSpec (path, JSON payload)
//!     → RequestExecutor::execute under the endpoint's breaker
//!     → parse JSON body, extract result rows
//! ```
//!
//! # Design Decisions
//! - Driver contract first: list_objects / get_fields / query
//! - Entity schemas are a static catalog; schema discovery stays out of scope
//! - Responses stay at the JSON level (serde_json::Value), as the original
//!   driver returned dictionaries

pub mod client;
pub mod schema;
pub mod types;

pub use client::PostHogClient;
pub use schema::{object_schema, FieldSpec, OBJECT_TYPES};
pub use types::{AnnotationScope, CapturedEvent, EventFilter, ExportFilter, InsightType};
