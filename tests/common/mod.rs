//! Shared utilities for integration testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use posthog_driver::config::DriverConfig;
use posthog_driver::transport::{
    RequestSpec, Transport, TransportError, TransportErrorKind, TransportResponse,
};

/// One scripted transport outcome.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Respond with this status and body.
    Status(u16, &'static str),
    /// Fail as if the connection never established.
    ConnectError,
    /// Fail as if the request timed out.
    TimeoutError,
}

/// Transport double that plays scripted outcomes in order and records
/// every request it sees. Once the script runs dry it keeps returning the
/// fallback response (200, "{}" unless overridden).
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    calls: AtomicU32,
    requests: Mutex<Vec<RequestSpec>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Scripted::Status(200, "{}"),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A transport that always answers the same way.
    pub fn always(outcome: Scripted) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: outcome,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of send calls observed.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request sent, in order.
    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(spec.clone());

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match outcome {
            Scripted::Status(status, body) => Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
            Scripted::ConnectError => Err(TransportError::new(
                TransportErrorKind::Connect,
                "connection refused",
            )),
            Scripted::TimeoutError => Err(TransportError::new(
                TransportErrorKind::Timeout,
                "request timed out",
            )),
        }
    }
}

/// Config with test credentials and fast-but-real resilience defaults.
#[allow(dead_code)]
pub fn test_config() -> DriverConfig {
    DriverConfig {
        api_url: "https://us.posthog.com".into(),
        api_key: "phx_test0123456789abcdef".into(),
        project_id: "12345".into(),
        project_api_key: Some("phc_test0123456789abcdef".into()),
        ..Default::default()
    }
}
