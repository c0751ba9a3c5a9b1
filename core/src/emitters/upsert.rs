//! Bulk upsert service.
//!
//! The emitted service buffers converted records, binds one SQL value per
//! canonical field, and hands the buffer to a sink together with a `MERGE`
//! statement once `BATCH_SIZE` rows are pending.

use super::{
    chrono_import, field_ident, record_name, rust_file_name, uses_type, ArtifactEmitter,
    ArtifactKind, GENERATED_HEADER,
};
use crate::error::{AppError, AppResult};
use crate::model::CanonicalFieldModel;
use crate::naming::file_stem;
use crate::type_mapping::TargetType;

/// Emits `<entity>_upsert.rs`.
#[derive(Debug, Clone)]
pub struct BulkUpsertEmitter {
    key_field: String,
    table_schema: String,
    batch_size: usize,
}

impl BulkUpsertEmitter {
    /// Creates an emitter matching rows on the `key_field` source field.
    pub fn new(key_field: &str, table_schema: &str, batch_size: usize) -> Self {
        Self {
            key_field: key_field.to_string(),
            table_schema: table_schema.to_string(),
            batch_size,
        }
    }
}

/// Builds the single-row `MERGE` statement, one `@pN` parameter per field.
///
/// Fails when `key_field` is not a source name in the model.
pub fn merge_statement(
    table_schema: &str,
    entity: &str,
    model: &CanonicalFieldModel,
    key_field: &str,
) -> AppResult<String> {
    let key = model.by_source_name(key_field).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "upsert key '{}' is not a field of {}",
            key_field, entity
        ))
    })?;
    let key = key.refined_name();

    let columns: Vec<&str> = model.iter().map(|f| f.refined_name()).collect();
    let params: Vec<String> = (0..columns.len()).map(|i| format!("@p{}", i)).collect();
    let sourced: Vec<String> = columns.iter().map(|c| format!("source.{}", c)).collect();
    let updates: Vec<String> = columns
        .iter()
        .filter(|c| **c != key)
        .map(|c| format!("{0} = source.{0}", c))
        .collect();

    let mut sql = format!(
        "MERGE INTO [{}].[{}] AS target USING (VALUES ({})) AS source ({}) ON target.{} = source.{}",
        table_schema,
        entity,
        params.join(", "),
        columns.join(", "),
        key,
        key
    );
    if !updates.is_empty() {
        sql.push_str(&format!(" WHEN MATCHED THEN UPDATE SET {}", updates.join(", ")));
    }
    sql.push_str(&format!(
        " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({});",
        columns.join(", "),
        sourced.join(", ")
    ));
    Ok(sql)
}

impl ArtifactEmitter for BulkUpsertEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::BulkUpsert
    }

    fn file_name(&self, entity: &str) -> String {
        rust_file_name(entity, "Upsert")
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let statement = merge_statement(&self.table_schema, entity, model, &self.key_field)?;
        let record = record_name(entity);
        let service = format!("{}UpsertService", entity);
        let mut code = String::new();

        code.push_str(GENERATED_HEADER);
        code.push_str("\n\n");
        let has_datetime = uses_type(model, TargetType::DateTime);
        let extra: &[&'static str] = if has_datetime { &["SecondsFormat"] } else { &[] };
        if let Some(import) = chrono_import(model, extra) {
            code.push_str(&import);
            code.push('\n');
        }
        code.push_str(&format!(
            "use super::{}::{};\n\n",
            file_stem(&format!("{}Converter", entity)),
            record
        ));

        code.push_str("/// Rows buffered before a batch is sent.\n");
        code.push_str(&format!("pub const BATCH_SIZE: usize = {};\n\n", self.batch_size));

        code.push_str("/// Table columns, in binding order.\n");
        code.push_str(&format!("pub const COLUMNS: [&str; {}] = [\n", model.len()));
        for field in model {
            code.push_str(&format!("    \"{}\",\n", field.refined_name()));
        }
        code.push_str("];\n\n");

        code.push_str("/// Single-row upsert, executed once per buffered row.\n");
        code.push_str(&format!("pub const MERGE_STATEMENT: &str = \"{}\";\n\n", statement));

        // Value model
        code.push_str("/// A bound SQL parameter.\n");
        code.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        code.push_str("pub enum SqlValue {\n");
        code.push_str("    Null,\n");
        code.push_str("    Text(String),\n");
        code.push_str("    Bit(bool),\n");
        code.push_str("    Int(i32),\n");
        code.push_str("    BigInt(i64),\n");
        code.push_str("    Decimal(f64),\n");
        code.push_str("}\n\n");
        for (ty, variant) in [
            ("String", "Text"),
            ("bool", "Bit"),
            ("i32", "Int"),
            ("i64", "BigInt"),
            ("f64", "Decimal"),
        ] {
            code.push_str(&format!("impl From<{}> for SqlValue {{\n", ty));
            code.push_str(&format!("    fn from(value: {}) -> Self {{\n", ty));
            code.push_str(&format!("        SqlValue::{}(value)\n", variant));
            code.push_str("    }\n");
            code.push_str("}\n\n");
        }
        if has_datetime {
            code.push_str("impl From<DateTime<Utc>> for SqlValue {\n");
            code.push_str("    fn from(value: DateTime<Utc>) -> Self {\n");
            code.push_str("        SqlValue::Text(value.to_rfc3339_opts(SecondsFormat::Secs, true))\n");
            code.push_str("    }\n");
            code.push_str("}\n\n");
        }
        if uses_type(model, TargetType::Date) {
            code.push_str("impl From<NaiveDate> for SqlValue {\n");
            code.push_str("    fn from(value: NaiveDate) -> Self {\n");
            code.push_str("        SqlValue::Text(value.format(\"%Y-%m-%d\").to_string())\n");
            code.push_str("    }\n");
            code.push_str("}\n\n");
        }
        code.push_str("impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {\n");
        code.push_str("    fn from(value: Option<T>) -> Self {\n");
        code.push_str("        value.map_or(SqlValue::Null, Into::into)\n");
        code.push_str("    }\n");
        code.push_str("}\n\n");

        // Sink
        code.push_str("/// Executes upsert batches against a database.\n");
        code.push_str("pub trait UpsertSink {\n");
        code.push_str("    type Error;\n\n");
        code.push_str("    /// Runs `statement` once per row, atomically.\n");
        code.push_str(
            "    fn execute_batch(&mut self, statement: &str, rows: Vec<Vec<SqlValue>>) -> Result<(), Self::Error>;\n",
        );
        code.push_str("}\n\n");

        // Service
        code.push_str(&format!("/// Buffers `{}` rows and upserts them in batches.\n", record));
        code.push_str(&format!("pub struct {}<S> {{\n", service));
        code.push_str("    sink: S,\n");
        code.push_str("    pending: Vec<Vec<SqlValue>>,\n");
        code.push_str("}\n\n");

        code.push_str(&format!("impl<S: UpsertSink> {}<S> {{\n", service));
        code.push_str("    pub fn new(sink: S) -> Self {\n");
        code.push_str("        Self {\n");
        code.push_str("            sink,\n");
        code.push_str("            pending: Vec::with_capacity(BATCH_SIZE),\n");
        code.push_str("        }\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Whether rows are waiting to be sent.\n");
        code.push_str("    pub fn has_pending(&self) -> bool {\n");
        code.push_str("        !self.pending.is_empty()\n");
        code.push_str("    }\n\n");

        code.push_str(&format!(
            "    pub fn push(&mut self, record: {}) -> Result<(), S::Error> {{\n",
            record
        ));
        code.push_str("        self.pending.push(bind(record));\n");
        code.push_str("        if self.pending.len() >= BATCH_SIZE {\n");
        code.push_str("            self.flush()?;\n");
        code.push_str("        }\n");
        code.push_str("        Ok(())\n");
        code.push_str("    }\n\n");

        code.push_str("    pub fn flush(&mut self) -> Result<(), S::Error> {\n");
        code.push_str("        if self.pending.is_empty() {\n");
        code.push_str("            return Ok(());\n");
        code.push_str("        }\n");
        code.push_str("        let rows = std::mem::replace(&mut self.pending, Vec::with_capacity(BATCH_SIZE));\n");
        code.push_str("        self.sink.execute_batch(MERGE_STATEMENT, rows)\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Flushes what is left and returns the sink.\n");
        code.push_str("    pub fn finish(mut self) -> Result<S, S::Error> {\n");
        code.push_str("        self.flush()?;\n");
        code.push_str("        Ok(self.sink)\n");
        code.push_str("    }\n");
        code.push_str("}\n\n");

        // Binding
        code.push_str(&format!("fn bind(record: {}) -> Vec<SqlValue> {{\n", record));
        code.push_str("    vec![\n");
        for field in model {
            code.push_str(&format!("        record.{}.into(),\n", field_ident(field)));
        }
        code.push_str("    ]\n");
        code.push_str("}\n");

        Ok(code)
    }
}
