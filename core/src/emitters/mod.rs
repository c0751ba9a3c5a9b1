#![deny(missing_docs)]

//! # Artifact Emitters
//!
//! Each emitter renders one artifact from the canonical field model alone.
//! Emitters never see each other's output; cross-artifact consistency follows
//! from every one of them reading names and types from the same model.
//!
//! Emitted Rust artifacts assume they live side by side in one module, so
//! they refer to each other through `super::<file stem>`.

use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::model::{CanonicalFieldDescriptor, CanonicalFieldModel};
use crate::naming::{file_stem, rust_ident};
use crate::type_mapping::TargetType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub mod columnar;
pub mod converter;
pub mod entity;
pub mod query;
pub mod table;
pub mod upsert;

pub use columnar::ColumnarWriterEmitter;
pub use converter::ConverterEmitter;
pub use entity::EntityEmitter;
pub use query::QueryBuilderEmitter;
pub use table::TableEmitter;
pub use upsert::BulkUpsertEmitter;

/// First line of every emitted Rust artifact.
pub const GENERATED_HEADER: &str = "//! Generated by entitygen. Do not edit by hand.";

/// The artifacts a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Wire-shaped data-transfer struct.
    Entity,
    /// Select/incremental query builder.
    QueryBuilder,
    /// `CREATE TABLE` script.
    Table,
    /// Wire-to-record converter.
    Converter,
    /// Batched `MERGE` service.
    BulkUpsert,
    /// Parquet row-group writer.
    ColumnarWriter,
}

impl ArtifactKind {
    /// Every kind, in emission order.
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Entity,
        ArtifactKind::QueryBuilder,
        ArtifactKind::Table,
        ArtifactKind::Converter,
        ArtifactKind::BulkUpsert,
        ArtifactKind::ColumnarWriter,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Entity => "entity",
            ArtifactKind::QueryBuilder => "query-builder",
            ArtifactKind::Table => "table",
            ArtifactKind::Converter => "converter",
            ArtifactKind::BulkUpsert => "bulk-upsert",
            ArtifactKind::ColumnarWriter => "columnar-writer",
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown artifact kind '{}'", s)))
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Which emitter produced it.
    pub kind: ArtifactKind,
    /// File name relative to the output directory.
    pub file_name: String,
    /// Rendered source text.
    pub contents: String,
}

/// Renders one artifact from the canonical model.
pub trait ArtifactEmitter {
    /// The artifact this emitter produces.
    fn kind(&self) -> ArtifactKind;

    /// Output file name for `entity`.
    fn file_name(&self, entity: &str) -> String;

    /// Renders the artifact.
    ///
    /// Pure: the output depends only on `entity`, `model` and the emitter's
    /// own settings.
    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String>;
}

/// Builds the emitter for `kind` from the run configuration.
pub fn emitter_for(kind: ArtifactKind, config: &GeneratorConfig) -> Box<dyn ArtifactEmitter> {
    match kind {
        ArtifactKind::Entity => Box::new(EntityEmitter),
        ArtifactKind::QueryBuilder => Box::new(QueryBuilderEmitter::new(&config.delta_field)),
        ArtifactKind::Table => Box::new(TableEmitter::new(&config.table_schema)),
        ArtifactKind::Converter => Box::new(ConverterEmitter::new(config.include_resource_url)),
        ArtifactKind::BulkUpsert => Box::new(BulkUpsertEmitter::new(
            &config.key_field,
            &config.table_schema,
            config.upsert_batch_size,
        )),
        ArtifactKind::ColumnarWriter => {
            Box::new(ColumnarWriterEmitter::new(config.row_group_size))
        }
    }
}

/// Renders every configured artifact, or nothing if any emitter fails.
pub fn emit_all(
    entity: &str,
    model: &CanonicalFieldModel,
    config: &GeneratorConfig,
) -> AppResult<Vec<Artifact>> {
    let mut kinds: Vec<ArtifactKind> = Vec::new();
    for kind in &config.artifacts {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }

    kinds
        .into_iter()
        .map(|kind| {
            let emitter = emitter_for(kind, config);
            Ok(Artifact {
                kind,
                file_name: emitter.file_name(entity),
                contents: emitter.emit(entity, model)?,
            })
        })
        .collect()
}

// Helpers shared by the Rust emitters.

/// Identifier used for a field in every emitted Rust artifact.
pub(crate) fn field_ident(field: &CanonicalFieldDescriptor) -> String {
    rust_ident(field.refined_name())
}

/// Name of the target-shaped record produced by the converter.
pub(crate) fn record_name(entity: &str) -> String {
    format!("{}Record", entity)
}

/// Name of the entity's metadata envelope struct.
pub(crate) fn attributes_name(entity: &str) -> String {
    format!("{}Attributes", entity)
}

pub(crate) fn uses_type(model: &CanonicalFieldModel, target: TargetType) -> bool {
    model.iter().any(|f| f.target_type() == target)
}

/// `use chrono::{..};` naming the types the model's fields are declared with,
/// plus `extra`. `None` when no field needs chrono.
pub(crate) fn chrono_import(model: &CanonicalFieldModel, extra: &[&'static str]) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    if uses_type(model, TargetType::DateTime) {
        names.extend(["DateTime", "Utc"]);
    }
    if uses_type(model, TargetType::Date) {
        names.push("NaiveDate");
    }
    if names.is_empty() {
        return None;
    }
    names.extend_from_slice(extra);
    names.sort_unstable();
    names.dedup();
    Some(format!("use chrono::{{{}}};\n", names.join(", ")))
}

pub(crate) fn rust_file_name(entity: &str, suffix: &str) -> String {
    format!("{}.rs", file_stem(&format!("{}{}", entity, suffix)))
}
