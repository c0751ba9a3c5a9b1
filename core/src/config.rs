#![deny(missing_docs)]

//! # Generator Configuration
//!
//! Settings that shape emitted artifacts without being part of the field
//! model: batching thresholds, the incremental-query field, table schema, and
//! which artifacts to produce. Loaded from YAML; every key is optional.

use crate::emitters::ArtifactKind;
use crate::error::{AppError, AppResult};
use crate::naming::RefineMode;
use crate::reconciler::ReconcileOptions;
use serde::{Deserialize, Serialize};

/// Default rows per parquet row group.
pub const DEFAULT_ROW_GROUP_SIZE: usize = 1000;

/// Default rows per upsert batch.
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 500;

/// Generation settings shared by every entity in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Refine raw names into PascalCase identifiers.
    pub refine_names: bool,
    /// Rows buffered by the columnar writer before a row group is flushed.
    pub row_group_size: usize,
    /// Rows buffered by the upsert service before a batch is flushed.
    pub upsert_batch_size: usize,
    /// Source field compared against the timestamp in incremental queries.
    pub delta_field: String,
    /// Source field used as the upsert match key.
    pub key_field: String,
    /// SQL schema owning the generated table.
    pub table_schema: String,
    /// Copy the envelope's resource URL into converted records.
    pub include_resource_url: bool,
    /// Artifacts to emit.
    pub artifacts: Vec<ArtifactKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            refine_names: true,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            upsert_batch_size: DEFAULT_UPSERT_BATCH_SIZE,
            delta_field: "LastModifiedDate".to_string(),
            key_field: "Id".to_string(),
            table_schema: "dbo".to_string(),
            include_resource_url: true,
            artifacts: ArtifactKind::ALL.to_vec(),
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a YAML configuration document.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no emitter can honour.
    pub fn validate(&self) -> AppResult<()> {
        if self.row_group_size == 0 {
            return Err(AppError::InvalidArgument("row_group_size must be positive".into()));
        }
        if self.upsert_batch_size == 0 {
            return Err(AppError::InvalidArgument(
                "upsert_batch_size must be positive".into(),
            ));
        }
        if self.delta_field.trim().is_empty() {
            return Err(AppError::InvalidArgument("delta_field must not be empty".into()));
        }
        if self.artifacts.is_empty() {
            return Err(AppError::InvalidArgument("no artifacts selected".into()));
        }
        Ok(())
    }

    /// Reconciliation options implied by this configuration.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::new(RefineMode::from_flag(self.refine_names))
    }
}
