//! Wire-to-record converter.
//!
//! Emits the target-shaped `<Entity>Record` and a `From<Entity>` impl copying
//! each canonical field one-to-one. The record may also carry `resource_url`,
//! lifted from the metadata envelope; it is not a canonical field.

use super::{
    attributes_name, chrono_import, field_ident, record_name, rust_file_name, ArtifactEmitter,
    ArtifactKind, GENERATED_HEADER,
};
use crate::error::AppResult;
use crate::model::CanonicalFieldModel;
use crate::naming::file_stem;

/// Record member holding the envelope's resource URL.
pub const RESOURCE_URL_FIELD: &str = "resource_url";

/// Emits `<entity>_converter.rs`.
#[derive(Debug, Clone, Copy)]
pub struct ConverterEmitter {
    include_resource_url: bool,
}

impl ConverterEmitter {
    /// Creates a converter emitter.
    pub fn new(include_resource_url: bool) -> Self {
        Self {
            include_resource_url,
        }
    }
}

impl ArtifactEmitter for ConverterEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Converter
    }

    fn file_name(&self, entity: &str) -> String {
        rust_file_name(entity, "Converter")
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let record = record_name(entity);
        let mut code = String::new();

        code.push_str(GENERATED_HEADER);
        code.push_str("\n#![allow(non_snake_case)]\n\n");
        if let Some(import) = chrono_import(model, &[]) {
            code.push_str(&import);
        }
        code.push_str("use serde::{Deserialize, Serialize};\n\n");
        if self.include_resource_url {
            code.push_str(&format!(
                "use super::{}::{{{}, {}}};\n\n",
                file_stem(entity),
                entity,
                attributes_name(entity)
            ));
        } else {
            code.push_str(&format!("use super::{}::{};\n\n", file_stem(entity), entity));
        }

        code.push_str(&format!("/// Target-shaped `{}` row.\n", entity));
        code.push_str("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n");
        code.push_str(&format!("pub struct {} {{\n", record));
        if self.include_resource_url {
            code.push_str("    /// Resource URL from the record's metadata envelope.\n");
            code.push_str(&format!("    pub {}: Option<String>,\n", RESOURCE_URL_FIELD));
        }
        for field in model {
            code.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(field),
                field.nullable_target_type()
            ));
        }
        code.push_str("}\n\n");

        code.push_str(&format!("impl From<{}> for {} {{\n", entity, record));
        code.push_str(&format!("    fn from(item: {}) -> Self {{\n", entity));
        code.push_str("        Self {\n");
        if self.include_resource_url {
            code.push_str(&format!(
                "            {}: item.attributes.map(|a: {}| a.url),\n",
                RESOURCE_URL_FIELD,
                attributes_name(entity)
            ));
        }
        for field in model {
            let ident = field_ident(field);
            code.push_str(&format!("            {}: item.{},\n", ident, ident));
        }
        code.push_str("        }\n");
        code.push_str("    }\n");
        code.push_str("}\n");

        Ok(code)
    }
}
