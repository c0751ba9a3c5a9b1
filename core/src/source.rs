#![deny(missing_docs)]

//! # Source Documents
//!
//! Parses describe and sample payloads (already read into memory) into the
//! records the reconciler consumes. No file system access happens here.

use crate::error::{AppError, AppResult};
use crate::model::RawFieldDescriptor;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A parsed describe document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeSchema {
    /// Object name, when the document declares one.
    pub name: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<RawFieldDescriptor>,
}

#[derive(Debug, Deserialize)]
struct DescribeDocument {
    #[serde(default)]
    name: Option<String>,
    fields: Vec<DescribeField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeField {
    name: String,
    soap_type: String,
    #[serde(default)]
    nillable: bool,
    #[serde(default, deserialize_with = "lenient_u32")]
    precision: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    scale: u32,
    #[serde(default)]
    compound_field_name: Option<String>,
}

impl From<DescribeField> for RawFieldDescriptor {
    fn from(f: DescribeField) -> Self {
        RawFieldDescriptor {
            name: f.name,
            wire_type: f.soap_type,
            nullable: f.nillable,
            precision: f.precision,
            scale: f.scale,
            compound_group_name: f.compound_field_name.filter(|g| !g.is_empty()),
        }
    }
}

/// Accepts `18`, `"18"` or `null`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(u32),
        Text(String),
    }

    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Lenient::Number(n)) => Ok(n),
        Some(Lenient::Text(s)) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid number '{}': {}", s, e))),
    }
}

/// Parses a describe JSON document (`{ "fields": [...] }`).
///
/// # Examples
/// ```
/// use entitygen_core::source::parse_describe;
///
/// let json = r#"{ "name": "Account", "fields": [
///     { "name": "AnnualRevenue", "soapType": "xsd:double", "nillable": true, "precision": "18", "scale": 2 }
/// ]}"#;
/// let schema = parse_describe(json).unwrap();
/// assert_eq!(schema.fields[0].precision, 18);
/// assert_eq!(schema.fields[0].scale, 2);
/// ```
pub fn parse_describe(json: &str) -> AppResult<DescribeSchema> {
    let doc: DescribeDocument = serde_json::from_str(json)?;
    Ok(DescribeSchema {
        name: doc.name,
        fields: doc.fields.into_iter().map(RawFieldDescriptor::from).collect(),
    })
}

/// Extracts the ordered field names from a sample instance.
///
/// Accepts a single object, or an array whose first element is the sample.
pub fn parse_sample(json: &str) -> AppResult<Vec<String>> {
    let value: Value = serde_json::from_str(json)?;
    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => map,
            _ => {
                return Err(AppError::General(
                    "Sample array must start with an object".into(),
                ))
            }
        },
        _ => return Err(AppError::General("Sample must be a JSON object".into())),
    };
    Ok(field_names(&object))
}

fn field_names(object: &Map<String, Value>) -> Vec<String> {
    object.keys().cloned().collect()
}
