//! PostHog driver for Rust.
//!
//! A client library for the PostHog analytics platform implementing the
//! standard driver contract (`list_objects` / `get_fields` / `query`) plus
//! analytics tracking, data export and lookup endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                POSTHOG DRIVER                │
//!                      │                                              │
//!   Driver call        │  ┌─────────┐   ┌────────────────────────┐    │
//!   ──────────────────▶│  │   api   │──▶│       resilience       │    │
//!                      │  │ client  │   │ breaker → send → retry │    │
//!                      │  └─────────┘   └───────────┬────────────┘    │
//!                      │                            │                 │
//!                      │                            ▼                 │
//!   Result / error     │  ┌─────────┐   ┌────────────────────────┐    │
//!   ◀──────────────────│  │  error  │◀──│       transport        │────┼──▶ PostHog API
//!                      │  │ mapping │   │    (HTTP / reqwest)    │    │
//!                      │  └─────────┘   └────────────────────────┘    │
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns         │  │
//!                      │  │  ┌────────┐ ┌───────────────┐ ┌──────┐  │  │
//!                      │  │  │ config │ │ observability │ │cancel│  │  │
//!                      │  │  └────────┘ └───────────────┘ └──────┘  │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! Every outbound call runs through the resilience core: a per-endpoint
//! circuit breaker gates execution, transient failures retry with jittered
//! exponential backoff, permanent failures surface immediately.

// Core subsystems
pub mod api;
pub mod config;
pub mod transport;

// Request resilience
pub mod resilience;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use api::client::PostHogClient;
pub use api::types::{AnnotationScope, CapturedEvent, EventFilter, ExportFilter, InsightType};
pub use config::{DriverConfig, ResilienceConfig};
pub use error::{DriverError, DriverResult};
pub use resilience::{CircuitState, ExecuteError};
