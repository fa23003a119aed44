//! Transport layer.
//!
//! # Data Flow
//! ```text
//! RequestSpec (method, path, body)
//!     → Transport::send (HTTP over reqwest in production)
//!     → TransportResponse (any status) | TransportError (network failure)
//! ```
//!
//! # Design Decisions
//! - HTTP failure statuses are responses, not errors; only network-level
//!   failures (connect, timeout) surface as TransportError
//! - The resilience core inspects status and error kind, never the payload
//! - Trait object behind async-trait so tests can script outcomes

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use thiserror::Error;

/// One outbound API request, content-agnostic to the resilience core.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the API base URL (e.g., "/api/projects/1/query/").
    pub path: String,

    /// Optional JSON body.
    pub body: Option<serde_json::Value>,

    /// Query string parameters.
    pub query: Vec<(String, String)>,

    /// Send to the capture host instead of the main API host.
    pub capture_host: bool,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            query: Vec::new(),
            capture_host: false,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            query: Vec::new(),
            capture_host: false,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn on_capture_host(mut self) -> Self {
        self.capture_host = true;
        self
    }
}

/// HTTP methods the driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A response that made it back from the server, regardless of status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is a success for driver purposes (< 400).
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Kind of network-level failure, used for retry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established.
    Connect,

    /// The request timed out before a response arrived.
    Timeout,

    /// Any other transport failure (protocol, body decode, ...).
    Request,
}

/// Errors that occur before a response is received.
#[derive(Debug, Error)]
#[error("transport error ({kind:?}): {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Abstraction over the HTTP layer so the executor can be driven by mocks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError>;
}
