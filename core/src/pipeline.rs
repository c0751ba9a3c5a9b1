#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Runs one entity from parsed inputs to rendered artifacts:
//! reconcile → emit. Either every configured artifact is produced or the
//! entity fails as a whole.
//!
//! Batches run each entity independently; a failing entity is reported and the
//! rest continue.

use crate::config::GeneratorConfig;
use crate::emitters::{emit_all, Artifact};
use crate::error::{AppError, AppResult, SchemaError};
use crate::model::CanonicalFieldModel;
use crate::reconciler::reconcile;
use crate::source::{parse_describe, parse_sample, DescribeSchema};
use tracing::{info, warn};

/// Raw inputs for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInput {
    /// Entity (type) name used in every artifact.
    pub entity_name: String,
    /// Describe document text.
    pub describe_json: String,
    /// Sample instance text.
    pub sample_json: String,
}

/// Everything produced for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOutput {
    /// Entity name.
    pub entity_name: String,
    /// The model every artifact was rendered from.
    pub model: CanonicalFieldModel,
    /// Rendered artifacts, in configured order.
    pub artifacts: Vec<Artifact>,
}

/// Result of one entity within a batch.
#[derive(Debug)]
pub struct EntityReport {
    /// Entity name.
    pub entity_name: String,
    /// Output, or the error that stopped this entity.
    pub outcome: AppResult<EntityOutput>,
}

/// Checks that `name` can be used as a type name in every artifact.
pub fn validate_entity_name(name: &str) -> AppResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "entity name '{}' is not a valid identifier",
            name
        )))
    }
}

/// Reconciles an already-parsed describe schema and sample field list.
pub fn build_model(
    describe: &DescribeSchema,
    sample_fields: &[String],
    config: &GeneratorConfig,
) -> AppResult<CanonicalFieldModel> {
    reconcile(&describe.fields, sample_fields, &config.reconcile_options())
}

/// Generates every configured artifact for one entity.
pub fn generate_entity(
    entity_name: &str,
    describe: &DescribeSchema,
    sample_fields: &[String],
    config: &GeneratorConfig,
) -> AppResult<EntityOutput> {
    validate_entity_name(entity_name)?;
    config.validate()?;

    if let Some(declared) = describe.name.as_deref() {
        if declared != entity_name {
            warn!(
                entity = entity_name,
                declared, "describe document names a different object"
            );
        }
    }

    let model = build_model(describe, sample_fields, config)?;
    if model.is_empty() {
        return Err(SchemaError::EmptyModel(entity_name.to_string()).into());
    }
    let artifacts = emit_all(entity_name, &model, config)?;
    info!(
        entity = entity_name,
        fields = model.len(),
        artifacts = artifacts.len(),
        "generated entity"
    );

    Ok(EntityOutput {
        entity_name: entity_name.to_string(),
        model,
        artifacts,
    })
}

/// Parses an entity's documents and generates its artifacts.
pub fn generate_from_json(
    input: &EntityInput,
    config: &GeneratorConfig,
) -> AppResult<EntityOutput> {
    let describe = parse_describe(&input.describe_json)?;
    let sample = parse_sample(&input.sample_json)?;
    generate_entity(&input.entity_name, &describe, &sample, config)
}

/// Generates each entity independently.
///
/// Reports come back in input order; one entity's failure never affects the
/// others.
pub fn generate_batch(inputs: &[EntityInput], config: &GeneratorConfig) -> Vec<EntityReport> {
    inputs
        .iter()
        .map(|input| {
            let outcome = generate_from_json(input, config);
            if let Err(e) = &outcome {
                warn!(entity = %input.entity_name, error = %e, "entity failed");
            }
            EntityReport {
                entity_name: input.entity_name.clone(),
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, describe: &str, sample: &str) -> EntityInput {
        EntityInput {
            entity_name: name.to_string(),
            describe_json: describe.to_string(),
            sample_json: sample.to_string(),
        }
    }

    const DESCRIBE: &str = r#"{ "fields": [
        { "name": "Id", "soapType": "tns:ID", "nillable": false },
        { "name": "Name", "soapType": "xsd:string", "nillable": true }
    ] }"#;

    #[test]
    fn test_entity_name_validation() {
        assert!(validate_entity_name("Account").is_ok());
        assert!(validate_entity_name("Custom_Object").is_ok());
        assert!(validate_entity_name("").is_err());
        assert!(validate_entity_name("1Account").is_err());
        assert!(validate_entity_name("Account-Name").is_err());
    }

    #[test]
    fn test_generate_from_json() {
        let output = generate_from_json(
            &input("Account", DESCRIBE, r#"{ "attributes": {}, "Name": "x", "Id": "1" }"#),
            &GeneratorConfig::default(),
        )
        .unwrap();

        assert_eq!(output.model.len(), 2);
        assert_eq!(output.model.fields()[0].source_name(), "Name");
        assert_eq!(output.artifacts.len(), 6);
    }

    #[test]
    fn test_envelope_only_sample_is_rejected() {
        let result = generate_from_json(
            &input("Account", DESCRIBE, r#"{ "attributes": { "type": "Account" } }"#),
            &GeneratorConfig::default(),
        );
        match result {
            Err(e @ AppError::Schema(SchemaError::EmptyModel(_))) => {
                assert_eq!(e.to_string(), "Schema Error: Entity Account has no fields to generate");
            }
            other => panic!("expected empty model error, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_only_sample_is_rejected() {
        let describe = r#"{ "fields": [
            { "name": "Id", "soapType": "tns:ID", "nillable": false },
            { "name": "BillingAddress", "soapType": "urn:address", "nillable": true }
        ] }"#;
        let result = generate_from_json(
            &input("Account", describe, r#"{ "BillingAddress": {} }"#),
            &GeneratorConfig::default(),
        );
        assert!(matches!(
            result,
            Err(AppError::Schema(SchemaError::EmptyModel(name))) if name == "Account"
        ));
    }

    #[test]
    fn test_invalid_config_fails_before_emitting() {
        let config = GeneratorConfig {
            row_group_size: 0,
            ..GeneratorConfig::default()
        };
        let result = generate_from_json(&input("Account", DESCRIBE, r#"{ "Id": "1" }"#), &config);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let inputs = vec![
            input("Account", DESCRIBE, r#"{ "Id": "1" }"#),
            input("Case", DESCRIBE, r#"{ "Id": "1", "Ghost": 2 }"#),
            input("Lead", DESCRIBE, "not json"),
            input("Contact", DESCRIBE, r#"{ "Id": "2", "Name": "n" }"#),
        ];
        let reports = generate_batch(&inputs, &GeneratorConfig::default());

        let names: Vec<_> = reports.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, ["Account", "Case", "Lead", "Contact"]);

        assert!(reports[0].outcome.is_ok());
        assert!(matches!(
            &reports[1].outcome,
            Err(AppError::Schema(SchemaError::UnmatchedSampleField(names))) if names == &["Ghost"]
        ));
        assert!(matches!(&reports[2].outcome, Err(AppError::Json(_))));
        assert!(reports[3].outcome.is_ok());
    }
}
