//! HTTP transport over reqwest.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::DriverConfig;
use crate::observability::logging::mask_secret;
use crate::transport::{
    Method, RequestSpec, Transport, TransportError, TransportErrorKind, TransportResponse,
};

/// Production transport: bearer-authenticated HTTP with per-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    capture_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from driver configuration.
    pub fn new(config: &DriverConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Request, e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            capture_url: config.capture_url().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url_for(&self, spec: &RequestSpec) -> String {
        let base = if spec.capture_host {
            &self.capture_url
        } else {
            &self.api_url
        };
        format!("{}{}", base, spec.path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(spec);

        let mut request = match spec.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };

        request = request.bearer_auth(&self.api_key);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(TransportErrorKind::Request, e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Request
    };
    // reqwest error messages can embed the full URL; keep them as-is (no
    // credentials live in URLs here, auth rides in a header).
    TransportError::new(kind, err.to_string())
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_url", &self.api_url)
            .field("capture_url", &self.capture_url)
            .field("api_key", &mask_secret(&self.api_key))
            .finish()
    }
}
