//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, and the
//! `SchemaError` taxonomy raised by reconciliation.

use derive_more::{Display, From};

/// A reconciliation failure.
///
/// Every variant carries the full set of offending names so the schema (or the
/// naming rules) can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SchemaError {
    /// Two or more describe entries share the same `name`.
    #[display("Duplicate fields in describe schema: {}", _0.join(", "))]
    DuplicateDescribeField(Vec<String>),

    /// Refining the sample field names produced colliding identifiers.
    #[display("Duplicate refined names in sample: {}", _0.join(", "))]
    DuplicateRefinedName(Vec<String>),

    /// Sample fields that have no describe entry.
    #[display("Sample fields missing from describe schema: {}", _0.join(", "))]
    UnmatchedSampleField(Vec<String>),

    /// Canonical fields colliding on their refined name.
    #[display("Duplicate canonical fields: {}", render_collisions(_0))]
    DuplicateCanonicalField(Vec<NameCollision>),

    /// Fields whose wire type has no target mapping.
    #[display("Unresolved field types: {}", render_unresolved(_0))]
    UnresolvedType(Vec<UnresolvedField>),

    /// Nothing in the sample survived reconciliation (only the envelope or
    /// compound fields), so no artifact can be rendered for the entity.
    #[display("Entity {_0} has no fields to generate")]
    EmptyModel(String),
}

/// A refined name claimed by more than one source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    /// The colliding refined identifier.
    pub refined_name: String,
    /// Every source name that refined to it, in sample order.
    pub source_names: Vec<String>,
}

/// A field whose wire type is not in the type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedField {
    /// Source (wire) name of the field.
    pub source_name: String,
    /// The wire type tag that failed to map.
    pub wire_type: String,
}

fn render_collisions(collisions: &[NameCollision]) -> String {
    collisions
        .iter()
        .map(|c| format!("{} <- [{}]", c.refined_name, c.source_names.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_unresolved(fields: &[UnresolvedField]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.source_name, f.wire_type))
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::error::Error for SchemaError {}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed JSON payload (describe or sample document).
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Malformed YAML payload (configuration or manifest).
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// The describe/sample pair cannot be reconciled.
    #[display("Schema Error: {_0}")]
    Schema(SchemaError),

    /// A caller passed arguments outside a function's contract.
    #[from(ignore)]
    #[display("Invalid Argument: {_0}")]
    InvalidArgument(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
