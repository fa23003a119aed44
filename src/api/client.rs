//! PostHog API client.
//!
//! # Responsibilities
//! - Implement the driver contract (list_objects / get_fields / query)
//! - Analytics, capture and lookup endpoints over the resilient executor
//! - Map terminal statuses to driver errors (401/403 → auth, 404 → not found)
//!
//! Every outbound method routes through `RequestExecutor::execute` with a
//! stable endpoint name, so each API family gets its own circuit breaker.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::schema::{object_schema, FieldSpec, OBJECT_TYPES};
use crate::api::types::{AnnotationScope, CapturedEvent, EventFilter, ExportFilter, InsightType};
use crate::config::validation::validate_config;
use crate::config::{ConfigError, DriverConfig};
use crate::error::{DriverError, DriverResult};
use crate::lifecycle::Cancellation;
use crate::resilience::{CircuitState, ExecuteError, RequestExecutor};
use crate::transport::{HttpTransport, RequestSpec, Transport, TransportResponse};

/// PostHog API client with retry, backoff and per-endpoint circuit
/// breaking on every call.
#[derive(Debug)]
pub struct PostHogClient {
    config: DriverConfig,
    executor: RequestExecutor,
    cancel: Cancellation,
}

impl PostHogClient {
    /// Create a client over the production HTTP transport.
    pub fn new(config: DriverConfig) -> DriverResult<Self> {
        let transport = HttpTransport::new(&config)
            .map_err(|e| DriverError::TransportSetup(e.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client from the standard PostHog environment variables.
    pub fn from_env() -> DriverResult<Self> {
        Self::new(crate::config::loader::load_from_env()?)
    }

    /// Create a client over a caller-supplied transport.
    ///
    /// This is the seam tests use to script transport outcomes; also
    /// useful for embedding behind an application-level transport.
    pub fn with_transport(
        config: DriverConfig,
        transport: Arc<dyn Transport>,
    ) -> DriverResult<Self> {
        validate_config(&config)
            .map_err(|errors| DriverError::Config(ConfigError::Validation(errors)))?;

        let cancel = Cancellation::new();
        let executor = RequestExecutor::new(transport, &config.resilience, cancel.clone());

        Ok(Self {
            config,
            executor,
            cancel,
        })
    }

    // ==================== DRIVER CONTRACT ====================

    /// Available entity types.
    pub fn list_objects(&self) -> &'static [&'static str] {
        OBJECT_TYPES
    }

    /// Field schema for an entity type.
    pub fn get_fields(
        &self,
        object_name: &str,
    ) -> DriverResult<&'static [(&'static str, FieldSpec)]> {
        object_schema(object_name).ok_or_else(|| {
            DriverError::NotFound(format!(
                "Unknown object type '{}'. Available types: {}",
                object_name,
                OBJECT_TYPES.join(", ")
            ))
        })
    }

    /// Execute a HogQL query and return the result rows.
    pub async fn query(&self, hogql_query: &str) -> DriverResult<Vec<Value>> {
        if hogql_query.trim().is_empty() {
            return Err(DriverError::Validation("Query cannot be empty".into()));
        }

        let spec = RequestSpec::post(
            format!("/api/projects/{}/query/", self.config.project_id),
            json!({
                "query": {
                    "kind": "HogQLQuery",
                    "query": hogql_query,
                }
            }),
        );

        let body = self.request("query", spec).await?;
        Ok(results_array(body))
    }

    // ==================== EVENT CAPTURE ====================

    /// Capture a single event (real-time tracking).
    pub async fn capture_event(&self, event: CapturedEvent) -> DriverResult<Value> {
        let api_key = self.project_api_key()?;

        let mut payload = serde_json::to_value(&event)
            .map_err(|e| DriverError::Validation(e.to_string()))?;
        payload["api_key"] = Value::String(api_key.to_string());
        if event.properties.is_none() {
            payload["properties"] = json!({});
        }

        let spec = RequestSpec::post("/i/v0/e/", payload).on_capture_host();
        self.request("capture", spec).await
    }

    /// Capture multiple events in one request (batch ingestion, max 20MB).
    pub async fn capture_batch(&self, events: &[CapturedEvent]) -> DriverResult<Value> {
        let api_key = self.project_api_key()?;

        if events.is_empty() {
            return Err(DriverError::Validation("Events list cannot be empty".into()));
        }

        let spec = RequestSpec::post(
            "/batch/",
            json!({
                "api_key": api_key,
                "batch": events,
            }),
        )
        .on_capture_host();

        self.request("capture", spec).await
    }

    // ==================== ANALYTICS & INSIGHTS ====================

    /// List insights, optionally filtered by type.
    pub async fn get_insights(
        &self,
        insight_type: Option<InsightType>,
        limit: u32,
        offset: u32,
    ) -> DriverResult<Vec<Value>> {
        let mut spec = RequestSpec::get(format!(
            "/api/projects/{}/insights/",
            self.config.project_id
        ))
        .with_query("limit", limit.to_string())
        .with_query("offset", offset.to_string());

        if let Some(insight_type) = insight_type {
            spec = spec.with_query("insight", insight_type.as_str());
        }

        let body = self.request("insights", spec).await?;
        Ok(results_array(body))
    }

    /// Create a new insight (trend, funnel, retention, ...).
    pub async fn create_insight(
        &self,
        name: &str,
        insight_type: InsightType,
        filters: Value,
    ) -> DriverResult<Value> {
        let mut filters = match filters {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            _ => {
                return Err(DriverError::Validation(
                    "Insight filters must be a JSON object".into(),
                ))
            }
        };
        filters.insert("insight".into(), insight_type.as_str().into());

        let spec = RequestSpec::post(
            format!("/api/projects/{}/insights/", self.config.project_id),
            json!({
                "name": name,
                "filters": filters,
            }),
        );

        self.request("insights", spec).await
    }

    // ==================== EVENTS & DATA EXPORT ====================

    /// Query events with filters (compiled to HogQL; the events REST
    /// endpoint is deprecated upstream).
    pub async fn get_events(&self, filter: EventFilter) -> DriverResult<Vec<Value>> {
        self.query(&filter.to_hogql()).await
    }

    /// Export events for ETL-style pulls. Large exports should prefer
    /// PostHog's native batch exports; this goes through the query API.
    pub async fn export_events(&self, filter: ExportFilter) -> DriverResult<Vec<Value>> {
        self.query(&filter.to_hogql()).await
    }

    // ==================== PERSONS & COHORTS ====================

    /// Query person profiles.
    pub async fn get_persons(
        &self,
        search: Option<&str>,
        cohort_id: Option<u64>,
        limit: u32,
    ) -> DriverResult<Vec<Value>> {
        let mut spec = RequestSpec::get(format!(
            "/api/projects/{}/persons/",
            self.config.project_id
        ))
        .with_query("limit", limit.to_string());

        if let Some(search) = search {
            spec = spec.with_query("search", search);
        }
        if let Some(cohort_id) = cohort_id {
            spec = spec.with_query("cohort", cohort_id.to_string());
        }

        let body = self.request("persons", spec).await?;
        Ok(results_array(body))
    }

    /// List cohorts (user segments).
    pub async fn get_cohorts(&self, search: Option<&str>) -> DriverResult<Vec<Value>> {
        let mut spec = RequestSpec::get(format!(
            "/api/projects/{}/cohorts/",
            self.config.project_id
        ));
        if let Some(search) = search {
            spec = spec.with_query("search", search);
        }

        let body = self.request("cohorts", spec).await?;
        Ok(results_array(body))
    }

    /// Create a new cohort.
    pub async fn create_cohort(
        &self,
        name: &str,
        description: &str,
        filters: Option<Value>,
    ) -> DriverResult<Value> {
        let spec = RequestSpec::post(
            format!("/api/projects/{}/cohorts/", self.config.project_id),
            json!({
                "name": name,
                "description": description,
                "filters": filters.unwrap_or_else(|| json!({})),
            }),
        );

        self.request("cohorts", spec).await
    }

    // ==================== FEATURE FLAGS & EXPERIMENTS ====================

    /// List all feature flags.
    pub async fn get_feature_flags(&self) -> DriverResult<Vec<Value>> {
        let spec = RequestSpec::get(format!(
            "/api/projects/{}/feature_flags/",
            self.config.project_id
        ));
        let body = self.request("feature_flags", spec).await?;
        Ok(results_array(body))
    }

    /// Evaluate a feature flag for a specific user.
    pub async fn evaluate_flag(
        &self,
        key: &str,
        distinct_id: &str,
        person_properties: Option<Value>,
    ) -> DriverResult<Value> {
        let api_key = self.project_api_key()?;

        let mut payload = json!({
            "api_key": api_key,
            "distinct_id": distinct_id,
            "key": key,
        });
        if let Some(properties) = person_properties {
            payload["person_properties"] = properties;
        }

        let spec = RequestSpec::post("/flags/", payload).on_capture_host();
        self.request("flags", spec).await
    }

    /// List all experiments (A/B tests).
    pub async fn get_experiments(&self) -> DriverResult<Vec<Value>> {
        let spec = RequestSpec::get(format!(
            "/api/projects/{}/experiments/",
            self.config.project_id
        ));
        let body = self.request("experiments", spec).await?;
        Ok(results_array(body))
    }

    // ==================== ANNOTATIONS ====================

    /// List annotations (timeline markers for releases/changes).
    pub async fn get_annotations(
        &self,
        after: Option<&str>,
        before: Option<&str>,
    ) -> DriverResult<Vec<Value>> {
        let mut spec = RequestSpec::get(format!(
            "/api/projects/{}/annotations/",
            self.config.project_id
        ));
        if let Some(after) = after {
            spec = spec.with_query("after", after);
        }
        if let Some(before) = before {
            spec = spec.with_query("before", before);
        }

        let body = self.request("annotations", spec).await?;
        Ok(results_array(body))
    }

    /// Create an annotation marking an event on the project timeline.
    pub async fn create_annotation(
        &self,
        content: &str,
        date_marker: Option<&str>,
        scope: AnnotationScope,
    ) -> DriverResult<Value> {
        let mut payload = json!({
            "content": content,
            "scope": scope.as_str(),
        });
        if let Some(date_marker) = date_marker {
            payload["date_marker"] = Value::String(date_marker.to_string());
        }

        let spec = RequestSpec::post(
            format!("/api/projects/{}/annotations/", self.config.project_id),
            payload,
        );

        self.request("annotations", spec).await
    }

    // ==================== HELPERS ====================

    /// Information about the configured project.
    pub async fn get_project_info(&self) -> DriverResult<Value> {
        let spec = RequestSpec::get(format!("/api/projects/{}/", self.config.project_id));
        self.request("project", spec).await
    }

    /// Whether the API connection works.
    pub async fn health_check(&self) -> bool {
        self.get_project_info().await.is_ok()
    }

    /// Breaker state for an endpoint, if any calls have been made to it.
    pub fn breaker_state(&self, endpoint: &str) -> Option<CircuitState> {
        self.executor.breaker_state(endpoint)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Abort in-flight calls waiting in backoff. After close, new calls
    /// fail with a cancellation error.
    pub fn close(&self) {
        self.cancel.trigger();
    }

    async fn request(&self, endpoint: &'static str, spec: RequestSpec) -> DriverResult<Value> {
        let response = self
            .executor
            .execute(endpoint, spec)
            .await
            .map_err(interpret_terminal)?;
        Ok(parse_body(&response))
    }

    fn project_api_key(&self) -> DriverResult<&str> {
        self.config.project_api_key.as_deref().ok_or_else(|| {
            DriverError::Authentication(
                "Project API key required for this operation. \
                 Set project_api_key or POSTHOG_PROJECT_API_KEY."
                    .into(),
            )
        })
    }
}

/// Give well-known terminal statuses their driver-level meaning.
fn interpret_terminal(err: ExecuteError) -> DriverError {
    match err {
        ExecuteError::NonRetryable {
            status: Some(401), ..
        } => DriverError::Authentication("Authentication failed. Check your personal API key.".into()),
        ExecuteError::NonRetryable {
            status: Some(403), ..
        } => DriverError::Authentication("Access forbidden. Check API key permissions.".into()),
        ExecuteError::NonRetryable {
            status: Some(404),
            cause,
        } => DriverError::NotFound(cause.to_string()),
        other => DriverError::Execute(other),
    }
}

/// Parse a response body as JSON; a non-JSON success body becomes a
/// `{success, status_code}` object.
fn parse_body(response: &TransportResponse) -> Value {
    serde_json::from_str(&response.body).unwrap_or_else(|_| {
        json!({
            "success": true,
            "status_code": response.status,
        })
    })
}

/// Pull the `results` array out of a list-style response.
fn results_array(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_array_extraction() {
        let body = json!({"results": [{"a": 1}, {"a": 2}], "next": null});
        assert_eq!(results_array(body).len(), 2);

        assert!(results_array(json!({"no_results": true})).is_empty());
        assert!(results_array(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_parse_body_fallback() {
        let response = TransportResponse {
            status: 204,
            body: String::new(),
        };
        let parsed = parse_body(&response);
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["status_code"], 204);
    }

    #[test]
    fn test_interpret_auth_statuses() {
        let err = interpret_terminal(ExecuteError::NonRetryable {
            status: Some(401),
            cause: crate::resilience::AttemptFailure::from_status(401, "unauthorized"),
        });
        assert!(matches!(err, DriverError::Authentication(_)));

        let err = interpret_terminal(ExecuteError::NonRetryable {
            status: Some(404),
            cause: crate::resilience::AttemptFailure::from_status(404, "missing"),
        });
        assert!(matches!(err, DriverError::NotFound(_)));

        let err = interpret_terminal(ExecuteError::Cancelled);
        assert!(matches!(err, DriverError::Execute(ExecuteError::Cancelled)));
    }
}
