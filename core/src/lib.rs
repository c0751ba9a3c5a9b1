#![deny(missing_docs)]

//! # entitygen Core
//!
//! Reconciles a remote object's describe schema with a sample instance and
//! renders mutually consistent artifacts from the resulting canonical model.

/// Shared error types.
pub mod error;

/// Wire type to target/storage type mapping.
pub mod type_mapping;

/// Identifier refinement and emitted-name helpers.
pub mod naming;

/// Raw and canonical field descriptors.
pub mod model;

/// Describe/sample reconciliation.
pub mod reconciler;

/// Describe and sample document parsing.
pub mod source;

/// Generator settings.
pub mod config;

/// Artifact renderers.
pub mod emitters;

/// Per-entity and batch generation.
pub mod pipeline;

pub use config::GeneratorConfig;
pub use emitters::{emit_all, Artifact, ArtifactEmitter, ArtifactKind};
pub use error::{AppError, AppResult, NameCollision, SchemaError, UnresolvedField};
pub use model::{CanonicalFieldDescriptor, CanonicalFieldModel, RawFieldDescriptor};
pub use naming::{refine, RefineMode};
pub use pipeline::{
    generate_batch, generate_entity, generate_from_json, EntityInput, EntityOutput, EntityReport,
};
pub use reconciler::{reconcile, ReconcileOptions, METADATA_ENVELOPE_FIELD};
pub use source::{parse_describe, parse_sample, DescribeSchema};
pub use type_mapping::{
    apply_nullable_marker, map_to_storage_type, map_wire_type, StorageType, TargetType,
};
