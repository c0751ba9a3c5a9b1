#![deny(missing_docs)]

//! # Schema Reconciliation
//!
//! Projects the describe schema through the field names observed in a sample
//! instance and validates the result into a [`CanonicalFieldModel`].
//!
//! Checks run in a fixed order and each reports every offending name:
//! 1. duplicate describe entries
//! 2. repeated sample entries
//! 3. sample fields with no describe entry (the metadata envelope is skipped)
//! 4. canonical fields colliding on their refined name
//! 5. unresolved wire types
//!
//! Compound fields are dropped without error.

use crate::error::{AppResult, NameCollision, SchemaError, UnresolvedField};
use crate::model::{CanonicalFieldDescriptor, CanonicalFieldModel, RawFieldDescriptor};
use crate::naming::{refine, RefineMode};
use crate::type_mapping::TargetType;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Sample key wrapping record metadata rather than a business field.
pub const METADATA_ENVELOPE_FIELD: &str = "attributes";

/// Per-run reconciliation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// How raw names become identifiers.
    pub refine_mode: RefineMode,
}

impl ReconcileOptions {
    /// Options with the given refine mode.
    pub fn new(refine_mode: RefineMode) -> Self {
        Self { refine_mode }
    }
}

/// Reconciles describe fields with the ordered sample field names.
///
/// The returned model keeps sample order, minus the metadata envelope and any
/// compound fields. It may be empty; generation rejects that case.
///
/// # Examples
/// ```
/// use entitygen_core::model::RawFieldDescriptor;
/// use entitygen_core::reconciler::{reconcile, ReconcileOptions};
///
/// let describe = vec![
///     RawFieldDescriptor::new("Id", "tns:ID", false),
///     RawFieldDescriptor::new("Last_Name__c", "xsd:string", true),
/// ];
/// let sample = ["attributes", "Last_Name__c", "Id"];
/// let model = reconcile(&describe, &sample, &ReconcileOptions::default()).unwrap();
///
/// let names: Vec<_> = model.iter().map(|f| f.refined_name()).collect();
/// assert_eq!(names, ["LastNameC", "Id"]);
/// ```
pub fn reconcile<S: AsRef<str>>(
    raw_fields: &[RawFieldDescriptor],
    sample_field_names: &[S],
    options: &ReconcileOptions,
) -> AppResult<CanonicalFieldModel> {
    let mode = options.refine_mode;

    // 1. Describe-side identity
    let describe_duplicates = duplicates(raw_fields.iter().map(|f| f.name.as_str()));
    if !describe_duplicates.is_empty() {
        return Err(SchemaError::DuplicateDescribeField(describe_duplicates).into());
    }

    // 2. Sample-side identity, over every entry including the envelope
    let sample: Vec<(&str, String)> = sample_field_names
        .iter()
        .map(|name| (name.as_ref(), refine(name.as_ref(), mode)))
        .collect();
    let sample_duplicates = repeated_refinements(&sample);
    if !sample_duplicates.is_empty() {
        return Err(SchemaError::DuplicateRefinedName(sample_duplicates).into());
    }

    // 3. Projection through the describe schema
    let by_name: IndexMap<&str, &RawFieldDescriptor> =
        raw_fields.iter().map(|f| (f.name.as_str(), f)).collect();

    let mut unmatched = Vec::new();
    let mut candidates: Vec<(&RawFieldDescriptor, String)> = Vec::new();
    for (name, refined) in sample {
        match by_name.get(name) {
            Some(&raw) if raw.is_compound() => {
                trace!(field = name, wire_type = %raw.wire_type, "excluding compound field");
            }
            Some(&raw) => candidates.push((raw, refined)),
            None if name == METADATA_ENVELOPE_FIELD => {
                debug!(field = name, "skipping metadata envelope");
            }
            None => unmatched.push(name.to_string()),
        }
    }
    if !unmatched.is_empty() {
        return Err(SchemaError::UnmatchedSampleField(unmatched).into());
    }

    // 4. Canonical identity
    let mut claims: IndexMap<&str, Vec<String>> = IndexMap::new();
    for (raw, refined) in &candidates {
        claims.entry(refined.as_str()).or_default().push(raw.name.clone());
    }
    let collisions: Vec<NameCollision> = claims
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(refined_name, source_names)| NameCollision {
            refined_name: refined_name.to_string(),
            source_names,
        })
        .collect();
    if !collisions.is_empty() {
        return Err(SchemaError::DuplicateCanonicalField(collisions).into());
    }

    // 5. Type resolution, batched
    let unresolved: Vec<UnresolvedField> = candidates
        .iter()
        .filter(|(raw, _)| raw.target_type() == TargetType::Unknown)
        .map(|(raw, _)| UnresolvedField {
            source_name: raw.name.clone(),
            wire_type: raw.wire_type.clone(),
        })
        .collect();
    if !unresolved.is_empty() {
        return Err(SchemaError::UnresolvedType(unresolved).into());
    }

    let fields = candidates
        .into_iter()
        .map(|(raw, _)| CanonicalFieldDescriptor::from_raw(raw, mode))
        .collect::<AppResult<Vec<_>>>()?;

    debug!(fields = fields.len(), "reconciled canonical model");
    Ok(CanonicalFieldModel::new(fields))
}

/// Names occurring more than once, in first-seen order.
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Refined names produced more than once by the same sample entry.
///
/// Distinct raw names that refine to the same token are left for the
/// canonical check, which can name every source involved.
fn repeated_refinements(sample: &[(&str, String)]) -> Vec<String> {
    let repeated = duplicates(sample.iter().map(|(raw, _)| *raw));
    let mut out: Vec<String> = Vec::new();
    for (raw, refined) in sample {
        if repeated.iter().any(|r| r.as_str() == *raw) && !out.contains(refined) {
            out.push(refined.clone());
        }
    }
    out
}
