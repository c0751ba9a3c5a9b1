#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts wire-level (SOAP/XSD) type tags into target Rust types and into
//! SQL storage projections. Handles nullability markers and the
//! precision/scale contract of scaled numerics.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt::Display;

/// Width used for every character-backed storage column.
pub const TEXT_COLUMN_LENGTH: u32 = 200;

/// Represents the primitive types a wire field can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetType {
    /// A UTC timestamp.
    DateTime,
    /// A calendar date without a time of day.
    Date,
    /// Free text.
    String,
    /// Record identifiers (strings on the wire).
    Id,
    /// A boolean flag.
    Boolean,
    /// A 32-bit integer.
    Integer,
    /// A 64-bit integer.
    Long,
    /// A scaled numeric carrying precision and scale.
    Decimal,
    /// The wire tag is not in the table.
    Unknown,
}

impl TargetType {
    /// The Rust type emitted for this target type.
    pub fn rust_type(&self) -> &'static str {
        match self {
            TargetType::DateTime => "DateTime<Utc>",
            TargetType::Date => "NaiveDate",
            TargetType::String | TargetType::Id => "String",
            TargetType::Boolean => "bool",
            TargetType::Integer => "i32",
            TargetType::Long => "i64",
            TargetType::Decimal => "f64",
            TargetType::Unknown => "unknown",
        }
    }

    /// Whether the storage projection embeds precision and scale.
    pub fn is_scaled_numeric(&self) -> bool {
        matches!(self, TargetType::Decimal)
    }

    /// Whether the type is represented the same with or without nullability.
    pub fn is_string_like(&self) -> bool {
        matches!(self, TargetType::String | TargetType::Id)
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rust_type())
    }
}

/// A SQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageType {
    /// `NVARCHAR(n)`.
    Text(u32),
    /// `BIT`.
    Bit,
    /// `INT`.
    Int,
    /// `BIGINT`.
    BigInt,
    /// `DECIMAL(precision,scale)`.
    Decimal {
        /// Total digits, as declared by the schema.
        precision: u32,
        /// Fractional digits, as declared by the schema.
        scale: u32,
    },
    /// No storage projection exists.
    Unknown,
}

impl Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Text(len) => write!(f, "NVARCHAR({})", len),
            StorageType::Bit => write!(f, "BIT"),
            StorageType::Int => write!(f, "INT"),
            StorageType::BigInt => write!(f, "BIGINT"),
            StorageType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({},{})", precision, scale)
            }
            StorageType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Maps a wire type tag to its target type.
///
/// Total: unknown tags map to `TargetType::Unknown` so callers can collect
/// every unresolved field before failing.
pub fn map_wire_type(tag: &str) -> TargetType {
    match tag {
        "xsd:dateTime" => TargetType::DateTime,
        "xsd:date" => TargetType::Date,
        "xsd:string" => TargetType::String,
        "tns:ID" => TargetType::Id,
        "xsd:boolean" => TargetType::Boolean,
        "xsd:int" => TargetType::Integer,
        "xsd:long" => TargetType::Long,
        "xsd:double" | "xsd:decimal" => TargetType::Decimal,
        _ => TargetType::Unknown,
    }
}

/// Whether a wire type describes a nested/composite structure.
pub fn is_compound_type(tag: &str) -> bool {
    matches!(tag, "urn:address" | "urn:location")
}

/// Projects a target type onto its SQL storage type.
///
/// Scaled numerics embed `precision` and `scale` verbatim and require
/// `precision >= 1` and `scale <= precision`. Any other type must be passed
/// zero for both; spurious precision metadata is rejected rather than dropped.
pub fn map_to_storage_type(
    target: TargetType,
    precision: u32,
    scale: u32,
) -> AppResult<StorageType> {
    if target.is_scaled_numeric() {
        if precision == 0 {
            return Err(AppError::InvalidArgument(format!(
                "{} requires a non-zero precision (scale {})",
                target, scale
            )));
        }
        if scale > precision {
            return Err(AppError::InvalidArgument(format!(
                "scale {} exceeds precision {}",
                scale, precision
            )));
        }
        return Ok(StorageType::Decimal { precision, scale });
    }

    if precision != 0 || scale != 0 {
        return Err(AppError::InvalidArgument(format!(
            "{} does not accept precision/scale, got ({},{})",
            target, precision, scale
        )));
    }

    Ok(match target {
        TargetType::DateTime | TargetType::Date | TargetType::String | TargetType::Id => {
            StorageType::Text(TEXT_COLUMN_LENGTH)
        }
        TargetType::Boolean => StorageType::Bit,
        TargetType::Integer => StorageType::Int,
        TargetType::Long => StorageType::BigInt,
        TargetType::Decimal | TargetType::Unknown => StorageType::Unknown,
    })
}

/// Renders the target type with its nullable marker.
///
/// String-shaped types are identical whether nullable or not; everything else
/// is wrapped in `Option` when nullable.
pub fn apply_nullable_marker(target: TargetType, is_nullable: bool) -> String {
    if target.is_string_like() || !is_nullable {
        return target.rust_type().to_string();
    }
    format!("Option<{}>", target.rust_type())
}
