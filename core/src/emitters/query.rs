//! Query builder.
//!
//! The select list enumerates every canonical field by its source name. The
//! default query reads the whole object; the incremental variant appends a
//! `delta_field >= timestamp` filter. Queries are URL-shaped (`+` for spaces)
//! so they can be appended to a query endpoint.

use super::{rust_file_name, ArtifactEmitter, ArtifactKind, GENERATED_HEADER};
use crate::error::AppResult;
use crate::model::CanonicalFieldModel;
use chrono::{DateTime, SecondsFormat, Utc};

/// Comma-separated source names, in canonical order.
pub fn select_list(model: &CanonicalFieldModel) -> String {
    model
        .iter()
        .map(|f| f.source_name())
        .collect::<Vec<_>>()
        .join(",")
}

/// `SELECT+<fields>+FROM+<entity>`.
pub fn default_query(entity: &str, model: &CanonicalFieldModel) -> String {
    format!("SELECT+{}+FROM+{}", select_list(model), entity)
}

/// The `+WHERE+<field>>=` prefix of the incremental filter.
pub fn delta_where_clause(delta_field: &str) -> String {
    format!("+WHERE+{}>=", delta_field)
}

/// Timestamp literal used in incremental filters.
pub fn format_timestamp(since: DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The default query restricted to records changed at or after `since`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use entitygen_core::emitters::query::incremental_query;
/// use entitygen_core::model::RawFieldDescriptor;
/// use entitygen_core::reconciler::{reconcile, ReconcileOptions};
///
/// let describe = vec![RawFieldDescriptor::new("Id", "tns:ID", false)];
/// let model = reconcile(&describe, &["Id"], &ReconcileOptions::default()).unwrap();
/// let since = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
///
/// assert_eq!(
///     incremental_query("Account", &model, "LastModifiedDate", since),
///     "SELECT+Id+FROM+Account+WHERE+LastModifiedDate>=2024-01-02T03:04:05Z"
/// );
/// ```
pub fn incremental_query(
    entity: &str,
    model: &CanonicalFieldModel,
    delta_field: &str,
    since: DateTime<Utc>,
) -> String {
    format!(
        "{}{}{}",
        default_query(entity, model),
        delta_where_clause(delta_field),
        format_timestamp(since)
    )
}

/// Emits `<entity>_query_builder.rs`.
#[derive(Debug, Clone)]
pub struct QueryBuilderEmitter {
    delta_field: String,
}

impl QueryBuilderEmitter {
    /// Creates an emitter filtering incremental reads on `delta_field`.
    pub fn new(delta_field: &str) -> Self {
        Self {
            delta_field: delta_field.to_string(),
        }
    }
}

impl ArtifactEmitter for QueryBuilderEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::QueryBuilder
    }

    fn file_name(&self, entity: &str) -> String {
        rust_file_name(entity, "QueryBuilder")
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let name = format!("{}QueryBuilder", entity);
        let mut code = String::new();

        code.push_str(GENERATED_HEADER);
        code.push_str("\n\nuse chrono::{DateTime, SecondsFormat, Utc};\n\n");

        code.push_str(&format!("/// Builds read queries for `{}`.\n", entity));
        code.push_str("#[derive(Debug, Clone)]\n");
        code.push_str(&format!("pub struct {} {{\n", name));
        code.push_str("    base_query_url: String,\n");
        code.push_str("}\n\n");

        code.push_str(&format!("impl {} {{\n", name));
        code.push_str("    /// Remote object name.\n");
        code.push_str(&format!(
            "    pub const ENTITY_NAME: &'static str = \"{}\";\n",
            entity
        ));
        code.push_str(&format!(
            "    const DEFAULT_QUERY: &'static str = \"{}\";\n",
            default_query(entity, model)
        ));
        code.push_str(&format!(
            "    const DELTA_WHERE_CLAUSE: &'static str = \"{}\";\n\n",
            delta_where_clause(&self.delta_field)
        ));

        code.push_str("    /// Creates a builder rooted at the query endpoint.\n");
        code.push_str("    pub fn new(base_query_url: impl Into<String>) -> Self {\n");
        code.push_str("        Self {\n");
        code.push_str("            base_query_url: base_query_url.into(),\n");
        code.push_str("        }\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Reads every record.\n");
        code.push_str("    pub fn default_query(&self) -> String {\n");
        code.push_str("        format!(\"{}{}\", self.base_query_url, Self::DEFAULT_QUERY)\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Reads records changed at or after `last_update`.\n");
        code.push_str("    pub fn delta_query(&self, last_update: DateTime<Utc>) -> String {\n");
        code.push_str("        format!(\n");
        code.push_str("            \"{}{}{}\",\n");
        code.push_str("            self.default_query(),\n");
        code.push_str("            Self::DELTA_WHERE_CLAUSE,\n");
        code.push_str("            last_update.to_rfc3339_opts(SecondsFormat::Secs, true)\n");
        code.push_str("        )\n");
        code.push_str("    }\n");
        code.push_str("}\n");

        Ok(code)
    }
}
