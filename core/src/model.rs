#![deny(missing_docs)]

//! # Field Model
//!
//! Raw describe-side descriptors and the canonical, reconciled field model that
//! every emitter consumes.

use crate::error::{AppError, AppResult};
use crate::naming::{refine, RefineMode};
use crate::type_mapping::{
    apply_nullable_marker, is_compound_type, map_to_storage_type, map_wire_type, StorageType,
    TargetType,
};
use serde::Serialize;

/// A field as declared by the describe schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldDescriptor {
    /// Name as declared by the schema source.
    pub name: String,
    /// Wire type tag (e.g. `xsd:string`).
    pub wire_type: String,
    /// Whether the schema allows null.
    pub nullable: bool,
    /// Declared numeric precision.
    pub precision: u32,
    /// Declared numeric scale.
    pub scale: u32,
    /// The compound field this one belongs to, if any.
    pub compound_group_name: Option<String>,
}

impl RawFieldDescriptor {
    /// Creates a plain (non-grouped) raw descriptor.
    pub fn new(name: &str, wire_type: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            wire_type: wire_type.to_string(),
            nullable,
            precision: 0,
            scale: 0,
            compound_group_name: None,
        }
    }

    /// Sets precision and scale.
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Sets the compound group name.
    pub fn with_compound_group(mut self, group: &str) -> Self {
        self.compound_group_name = Some(group.to_string());
        self
    }

    /// Whether the wire type is a nested/composite structure.
    pub fn is_compound(&self) -> bool {
        is_compound_type(&self.wire_type)
    }

    /// Target type resolved from the wire type.
    pub fn target_type(&self) -> TargetType {
        map_wire_type(&self.wire_type)
    }
}

/// A reconciled field.
///
/// Fields are private; values are only produced by [`CanonicalFieldDescriptor::from_raw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalFieldDescriptor {
    source_name: String,
    refined_name: String,
    target_type: TargetType,
    nullable_target_type: String,
    storage_type: StorageType,
    is_nullable: bool,
}

impl CanonicalFieldDescriptor {
    /// Builds a canonical descriptor from a raw one.
    ///
    /// Fails with `InvalidArgument` when precision/scale contradict the target type.
    pub fn from_raw(raw: &RawFieldDescriptor, mode: RefineMode) -> AppResult<Self> {
        let target_type = raw.target_type();
        let storage_type =
            map_to_storage_type(target_type, raw.precision, raw.scale).map_err(|e| match e {
                AppError::InvalidArgument(msg) => {
                    AppError::InvalidArgument(format!("field {}: {}", raw.name, msg))
                }
                other => other,
            })?;
        Ok(Self {
            source_name: raw.name.clone(),
            refined_name: refine(&raw.name, mode),
            target_type,
            nullable_target_type: apply_nullable_marker(target_type, raw.nullable),
            storage_type,
            is_nullable: raw.nullable,
        })
    }

    /// Original schema name, used on the wire.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Normalized identifier, unique within the model.
    pub fn refined_name(&self) -> &str {
        &self.refined_name
    }

    /// Mapped primitive type.
    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    /// Target type with its nullable marker applied.
    pub fn nullable_target_type(&self) -> &str {
        &self.nullable_target_type
    }

    /// SQL storage type.
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Whether the describe schema declares the field nullable.
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }
}

/// The ordered, validated field list shared by every emitter.
///
/// Order is the sample's field order. There is no mutating API; the model is
/// only produced by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalFieldModel {
    fields: Vec<CanonicalFieldDescriptor>,
}

impl CanonicalFieldModel {
    pub(crate) fn new(fields: Vec<CanonicalFieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Fields in canonical order.
    pub fn fields(&self) -> &[CanonicalFieldDescriptor] {
        &self.fields
    }

    /// Iterates fields in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalFieldDescriptor> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the model has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks a field up by its wire name.
    pub fn by_source_name(&self, source_name: &str) -> Option<&CanonicalFieldDescriptor> {
        self.fields.iter().find(|f| f.source_name == source_name)
    }

    /// Length of the longest refined name.
    pub fn column_width(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.refined_name.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a CanonicalFieldModel {
    type Item = &'a CanonicalFieldDescriptor;
    type IntoIter = std::slice::Iter<'a, CanonicalFieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
