//! Static entity catalog for the driver contract.
//!
//! PostHog entities mapped to driver "objects". The schemas are fixed
//! metadata, not discovered from the API.

/// Field definition within an object schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field type name ("string", "datetime", "number", "boolean",
    /// "object", "array").
    pub field_type: &'static str,

    /// Human-readable description.
    pub description: &'static str,
}

/// Entity types available through the driver.
pub const OBJECT_TYPES: &[&str] = &[
    "events",
    "insights",
    "persons",
    "cohorts",
    "feature_flags",
    "sessions",
    "annotations",
    "experiments",
];

/// Field schema for an entity type, or `None` for an unknown type.
pub fn object_schema(object_name: &str) -> Option<&'static [(&'static str, FieldSpec)]> {
    let schema: &'static [(&'static str, FieldSpec)] = match object_name {
        "events" => &[
            (
                "event",
                FieldSpec {
                    field_type: "string",
                    description: "Event name (e.g., \"User Signup\", \"Button Click\")",
                },
            ),
            (
                "timestamp",
                FieldSpec {
                    field_type: "datetime",
                    description: "When the event occurred (ISO 8601 format)",
                },
            ),
            (
                "distinct_id",
                FieldSpec {
                    field_type: "string",
                    description: "Unique user identifier",
                },
            ),
            (
                "properties",
                FieldSpec {
                    field_type: "object",
                    description: "Event properties (custom key-value pairs)",
                },
            ),
            (
                "person",
                FieldSpec {
                    field_type: "object",
                    description: "Associated person object with user properties",
                },
            ),
        ],
        "insights" => &[
            (
                "id",
                FieldSpec {
                    field_type: "string",
                    description: "Unique insight ID",
                },
            ),
            (
                "name",
                FieldSpec {
                    field_type: "string",
                    description: "Insight name",
                },
            ),
            (
                "filters",
                FieldSpec {
                    field_type: "object",
                    description: "Insight configuration (events, date ranges, filters)",
                },
            ),
            (
                "result",
                FieldSpec {
                    field_type: "array",
                    description: "Computed insight results (trends, funnel steps, etc.)",
                },
            ),
            (
                "insight",
                FieldSpec {
                    field_type: "string",
                    description: "Insight type: TRENDS, FUNNELS, RETENTION, PATHS",
                },
            ),
            (
                "created_at",
                FieldSpec {
                    field_type: "datetime",
                    description: "Creation timestamp",
                },
            ),
        ],
        "persons" => &[
            (
                "id",
                FieldSpec {
                    field_type: "string",
                    description: "Person UUID",
                },
            ),
            (
                "distinct_ids",
                FieldSpec {
                    field_type: "array",
                    description: "List of distinct IDs for this person",
                },
            ),
            (
                "properties",
                FieldSpec {
                    field_type: "object",
                    description: "Person properties (email, name, custom attributes)",
                },
            ),
            (
                "created_at",
                FieldSpec {
                    field_type: "datetime",
                    description: "First seen timestamp",
                },
            ),
        ],
        "cohorts" => &[
            (
                "id",
                FieldSpec {
                    field_type: "number",
                    description: "Cohort ID",
                },
            ),
            (
                "name",
                FieldSpec {
                    field_type: "string",
                    description: "Cohort name",
                },
            ),
            (
                "description",
                FieldSpec {
                    field_type: "string",
                    description: "Cohort description",
                },
            ),
            (
                "filters",
                FieldSpec {
                    field_type: "object",
                    description: "Cohort definition (behavioral/property filters)",
                },
            ),
            (
                "count",
                FieldSpec {
                    field_type: "number",
                    description: "Number of persons in cohort",
                },
            ),
        ],
        "feature_flags" => &[
            (
                "id",
                FieldSpec {
                    field_type: "number",
                    description: "Flag ID",
                },
            ),
            (
                "key",
                FieldSpec {
                    field_type: "string",
                    description: "Flag key (identifier)",
                },
            ),
            (
                "name",
                FieldSpec {
                    field_type: "string",
                    description: "Flag name",
                },
            ),
            (
                "active",
                FieldSpec {
                    field_type: "boolean",
                    description: "Whether flag is active",
                },
            ),
            (
                "rollout_percentage",
                FieldSpec {
                    field_type: "number",
                    description: "Percentage of users with flag enabled",
                },
            ),
            (
                "filters",
                FieldSpec {
                    field_type: "object",
                    description: "Targeting rules and conditions",
                },
            ),
        ],
        "sessions" => &[
            (
                "session_id",
                FieldSpec {
                    field_type: "string",
                    description: "Unique session ID",
                },
            ),
            (
                "distinct_id",
                FieldSpec {
                    field_type: "string",
                    description: "User identifier",
                },
            ),
            (
                "start_time",
                FieldSpec {
                    field_type: "datetime",
                    description: "Session start",
                },
            ),
            (
                "end_time",
                FieldSpec {
                    field_type: "datetime",
                    description: "Session end",
                },
            ),
            (
                "events_count",
                FieldSpec {
                    field_type: "number",
                    description: "Number of events in session",
                },
            ),
            (
                "recording_url",
                FieldSpec {
                    field_type: "string",
                    description: "URL to session replay (if available)",
                },
            ),
        ],
        "annotations" => &[
            (
                "id",
                FieldSpec {
                    field_type: "number",
                    description: "Annotation ID",
                },
            ),
            (
                "content",
                FieldSpec {
                    field_type: "string",
                    description: "Annotation text",
                },
            ),
            (
                "date_marker",
                FieldSpec {
                    field_type: "datetime",
                    description: "Date marked on timeline",
                },
            ),
            (
                "scope",
                FieldSpec {
                    field_type: "string",
                    description: "organization or project",
                },
            ),
        ],
        "experiments" => &[
            (
                "id",
                FieldSpec {
                    field_type: "number",
                    description: "Experiment ID",
                },
            ),
            (
                "name",
                FieldSpec {
                    field_type: "string",
                    description: "Experiment name",
                },
            ),
            (
                "feature_flag_key",
                FieldSpec {
                    field_type: "string",
                    description: "Associated feature flag",
                },
            ),
            (
                "variants",
                FieldSpec {
                    field_type: "array",
                    description: "Experiment variants (control, test)",
                },
            ),
            (
                "results",
                FieldSpec {
                    field_type: "object",
                    description: "Statistical analysis results",
                },
            ),
        ],
        _ => return None,
    };
    Some(schema)
}
