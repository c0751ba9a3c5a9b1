//! Wire-shaped data-transfer struct.
//!
//! One member per canonical field, named by its refined name, typed with the
//! nullable target type, and bound to the wire through `#[serde(rename)]`.

use super::{
    attributes_name, chrono_import, field_ident, rust_file_name, ArtifactEmitter, ArtifactKind,
    GENERATED_HEADER,
};
use crate::error::AppResult;
use crate::model::CanonicalFieldModel;
use crate::reconciler::METADATA_ENVELOPE_FIELD;

/// Emits `<entity>.rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityEmitter;

impl ArtifactEmitter for EntityEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Entity
    }

    fn file_name(&self, entity: &str) -> String {
        rust_file_name(entity, "")
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let attributes = attributes_name(entity);
        let mut code = String::new();

        code.push_str(GENERATED_HEADER);
        code.push_str("\n#![allow(non_snake_case)]\n\n");
        if let Some(import) = chrono_import(model, &[]) {
            code.push_str(&import);
        }
        code.push_str("use serde::{Deserialize, Serialize};\n\n");

        // Envelope
        code.push_str(&format!(
            "/// Metadata envelope carried by every `{}` record.\n",
            entity
        ));
        code.push_str("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n");
        code.push_str(&format!("pub struct {} {{\n", attributes));
        code.push_str("    #[serde(rename = \"type\", default)]\n");
        code.push_str("    pub object_type: String,\n");
        code.push_str("    #[serde(default)]\n");
        code.push_str("    pub url: String,\n");
        code.push_str("}\n\n");

        // Entity
        code.push_str(&format!("/// Wire representation of `{}`.\n", entity));
        code.push_str("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n");
        code.push_str(&format!("pub struct {} {{\n", entity));
        code.push_str(&format!(
            "    #[serde(rename = \"{}\", default, skip_serializing_if = \"Option::is_none\")]\n",
            METADATA_ENVELOPE_FIELD
        ));
        code.push_str(&format!("    pub attributes: Option<{}>,\n", attributes));

        for field in model {
            let mut attrs = vec![format!("rename = \"{}\"", field.source_name())];
            if field.is_nullable() {
                attrs.push("default".to_string());
            }
            code.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
            code.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(field),
                field.nullable_target_type()
            ));
        }

        code.push_str("}\n");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support::{account_model, assert_parses};

    #[test]
    fn test_entity_members() {
        let code = EntityEmitter.emit("Account", &account_model()).unwrap();

        assert!(code.contains("pub struct Account {"));
        assert!(code.contains("pub struct AccountAttributes {"));
        assert!(code.contains("use chrono::{DateTime, NaiveDate, Utc};"));

        assert!(code.contains("    #[serde(rename = \"Id\")]\n    pub Id: String,"));
        assert!(code.contains("    #[serde(rename = \"Region__c\", default)]\n    pub RegionC: String,"));
        assert!(code.contains("    #[serde(rename = \"AnnualRevenue\", default)]\n    pub AnnualRevenue: Option<f64>,"));
        assert!(code.contains("    pub NumberOfEmployees: Option<i32>,"));
        assert!(code.contains("    pub LastModifiedDate: DateTime<Utc>,"));
        assert!(code.contains("    pub IsDeleted: bool,"));
        assert!(code.contains("    #[serde(rename = \"Founded__c\", default)]\n    pub FoundedC: Option<NaiveDate>,"));
    }

    #[test]
    fn test_members_follow_model_order() {
        let model = account_model();
        let code = EntityEmitter.emit("Account", &model).unwrap();
        let positions: Vec<usize> = model
            .iter()
            .map(|f| code.find(&format!("pub {}:", f.refined_name())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_entity_parses() {
        assert_parses(&EntityEmitter.emit("Account", &account_model()).unwrap());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(EntityEmitter.file_name("Account"), "account.rs");
        assert_eq!(EntityEmitter.kind(), ArtifactKind::Entity);
    }
}
