//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Client construction:
//!     Load config → Validate → Build transport + executor
//!
//! Client close (cancel.rs):
//!     close() → Cancellation::trigger → in-flight backoff waits abort
//! ```
//!
//! # Design Decisions
//! - Cancellation is broadcast: one trigger reaches every in-flight call
//! - A trigger that races a subscription is still observed (atomic flag)
//! - Dropping the client does not cancel; close() is explicit

pub mod cancel;

pub use cancel::Cancellation;
