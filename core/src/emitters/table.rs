//! SQL table script.
//!
//! Columns are declared by refined name, padded to the longest refined name,
//! followed by the storage type. Every column is `NULL` at the storage layer
//! whatever the schema says.

use super::{ArtifactEmitter, ArtifactKind};
use crate::error::AppResult;
use crate::model::CanonicalFieldModel;
use crate::naming::file_stem;

/// Emits `<entity>.sql`.
#[derive(Debug, Clone)]
pub struct TableEmitter {
    schema: String,
}

impl TableEmitter {
    /// Creates an emitter placing the table in `schema`.
    pub fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
        }
    }
}

/// `(column, storage type)` lines, with columns padded to a common width.
pub fn column_definitions(model: &CanonicalFieldModel) -> Vec<String> {
    let width = model.column_width();
    model
        .iter()
        .map(|f| format!("{:<width$} {} NULL", f.refined_name(), f.storage_type(), width = width))
        .collect()
}

impl ArtifactEmitter for TableEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Table
    }

    fn file_name(&self, entity: &str) -> String {
        format!("{}.sql", file_stem(entity))
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let mut sql = String::new();
        sql.push_str("-- Generated by entitygen. Do not edit by hand.\n");
        sql.push_str(&format!("CREATE TABLE [{}].[{}] (\n", self.schema, entity));
        sql.push_str(
            &column_definitions(model)
                .iter()
                .map(|line| format!("    {}", line))
                .collect::<Vec<_>>()
                .join(",\n"),
        );
        sql.push_str("\n);\n");
        Ok(sql)
    }
}
