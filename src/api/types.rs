//! Request payload types and HogQL builders.

use serde::{Deserialize, Serialize};

/// A single event for capture (real-time or batch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedEvent {
    /// Event name (e.g., "User Signup").
    pub event: String,

    /// Unique user identifier.
    pub distinct_id: String,

    /// Optional event properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,

    /// Optional ISO 8601 timestamp (defaults to now, server-side).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CapturedEvent {
    pub fn new(event: impl Into<String>, distinct_id: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            distinct_id: distinct_id.into(),
            properties: None,
            timestamp: None,
        }
    }

    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Insight flavors supported by PostHog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightType {
    Trends,
    Funnels,
    Retention,
    Paths,
}

impl InsightType {
    /// API representation (the API expects uppercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Trends => "TRENDS",
            InsightType::Funnels => "FUNNELS",
            InsightType::Retention => "RETENTION",
            InsightType::Paths => "PATHS",
        }
    }
}

/// Annotation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationScope {
    #[default]
    Project,
    Organization,
}

impl AnnotationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationScope::Project => "project",
            AnnotationScope::Organization => "organization",
        }
    }
}

/// Filters for `get_events`, compiled to HogQL.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Filter by event name.
    pub event_name: Option<String>,

    /// Events at or after this ISO date.
    pub after: Option<String>,

    /// Events at or before this ISO date.
    pub before: Option<String>,

    /// Filter by user ID.
    pub distinct_id: Option<String>,

    /// Maximum results.
    pub limit: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            event_name: None,
            after: None,
            before: None,
            distinct_id: None,
            limit: 100,
        }
    }
}

impl EventFilter {
    /// Compile the filter to a HogQL query over the events table.
    pub fn to_hogql(&self) -> String {
        let mut conditions = Vec::new();

        if let Some(event) = &self.event_name {
            conditions.push(format!("event = {}", quote_literal(event)));
        }
        if let Some(after) = &self.after {
            conditions.push(format!("timestamp >= {}", quote_literal(after)));
        }
        if let Some(before) = &self.before {
            conditions.push(format!("timestamp <= {}", quote_literal(before)));
        }
        if let Some(distinct_id) = &self.distinct_id {
            conditions.push(format!("distinct_id = {}", quote_literal(distinct_id)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", conditions.join(" AND "))
        };

        format!("SELECT * FROM events {}LIMIT {}", where_clause, self.limit)
    }
}

/// Date-bounded export filter for ETL-style pulls, compiled to HogQL.
#[derive(Debug, Clone)]
pub struct ExportFilter {
    /// ISO date, inclusive.
    pub start_date: String,

    /// ISO date, inclusive.
    pub end_date: String,

    /// Restrict to specific events (empty = all).
    pub event_names: Vec<String>,

    /// Property equality filters (`properties.key = value`).
    pub properties: Vec<(String, String)>,
}

impl ExportFilter {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            event_names: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn to_hogql(&self) -> String {
        let mut conditions = vec![
            format!("timestamp >= {}", quote_literal(&self.start_date)),
            format!("timestamp <= {}", quote_literal(&self.end_date)),
        ];

        if !self.event_names.is_empty() {
            let names = self
                .event_names
                .iter()
                .map(|name| quote_literal(name))
                .collect::<Vec<_>>()
                .join(", ");
            conditions.push(format!("event IN ({names})"));
        }

        for (key, value) in &self.properties {
            conditions.push(format!("properties.{} = {}", key, quote_literal(value)));
        }

        format!(
            "SELECT * FROM events WHERE {}",
            conditions.join(" AND ")
        )
    }
}

/// Quote a string literal for HogQL, doubling embedded single quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
