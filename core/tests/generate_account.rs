use entitygen_core::{
    generate_from_json, parse_describe, parse_sample, reconcile, AppError, ArtifactKind,
    EntityInput, GeneratorConfig, ReconcileOptions, RefineMode, SchemaError, StorageType,
    TargetType,
};
use pretty_assertions::assert_eq;

const DESCRIBE: &str = include_str!("fixtures/account-describe.json");
const SAMPLE: &str = include_str!("fixtures/account-sample.json");

fn account_input() -> EntityInput {
    EntityInput {
        entity_name: "Account".to_string(),
        describe_json: DESCRIBE.to_string(),
        sample_json: SAMPLE.to_string(),
    }
}

#[test]
fn test_model_follows_sample_order() {
    let output = generate_from_json(&account_input(), &GeneratorConfig::default()).unwrap();
    let refined: Vec<&str> = output.model.iter().map(|f| f.refined_name()).collect();

    assert_eq!(
        refined,
        vec![
            "Id",
            "IsDeleted",
            "Name",
            "BillingStreet",
            "BillingCity",
            "AnnualRevenue",
            "NumberOfEmployees",
            "CreatedDate",
            "LastModifiedDate",
            "SLAExpirationDateC",
            "CustomerPriorityC",
            "NumberOfLocationsC",
            "TierC",
        ]
    );
}

#[test]
fn test_types_and_storage() {
    let output = generate_from_json(&account_input(), &GeneratorConfig::default()).unwrap();
    let field = |name: &str| output.model.by_source_name(name).unwrap();

    assert_eq!(field("Id").target_type(), TargetType::Id);
    assert_eq!(field("AnnualRevenue").nullable_target_type(), "Option<f64>");
    assert_eq!(
        field("AnnualRevenue").storage_type(),
        StorageType::Decimal {
            precision: 18,
            scale: 2
        }
    );
    assert_eq!(
        field("Number_of_Locations__c").storage_type(),
        StorageType::Decimal {
            precision: 3,
            scale: 0
        }
    );
    assert_eq!(field("SLAExpirationDate__c").target_type(), TargetType::Date);
    assert_eq!(
        field("SLAExpirationDate__c").nullable_target_type(),
        "Option<NaiveDate>"
    );
    assert_eq!(
        field("SLAExpirationDate__c").storage_type(),
        StorageType::Text(200)
    );
    assert_eq!(
        field("LastModifiedDate").nullable_target_type(),
        "DateTime<Utc>"
    );
    assert_eq!(field("Customer_Priority__c").nullable_target_type(), "String");
    assert_eq!(field("Tier_1__c").storage_type(), StorageType::Bit);
}

#[test]
fn test_compound_field_and_envelope_are_excluded() {
    let output = generate_from_json(&account_input(), &GeneratorConfig::default()).unwrap();

    assert!(output.model.by_source_name("BillingAddress").is_none());
    assert!(output.model.by_source_name("attributes").is_none());
    for artifact in &output.artifacts {
        assert!(
            !artifact.contents.contains("BillingAddress"),
            "{} mentions the compound field",
            artifact.file_name
        );
    }
}

#[test]
fn test_all_artifacts_written_with_stable_names() {
    let output = generate_from_json(&account_input(), &GeneratorConfig::default()).unwrap();
    let names: Vec<&str> = output.artifacts.iter().map(|a| a.file_name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "account.rs",
            "account_query_builder.rs",
            "account.sql",
            "account_converter.rs",
            "account_upsert.rs",
            "account_parquet_writer.rs",
        ]
    );
}

#[test]
fn test_query_and_table_agree_on_fields() {
    let output = generate_from_json(&account_input(), &GeneratorConfig::default()).unwrap();
    let contents = |kind: ArtifactKind| {
        output
            .artifacts
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.contents.as_str())
            .unwrap()
    };

    let query = contents(ArtifactKind::QueryBuilder);
    assert!(query.contains(
        "SELECT+Id,IsDeleted,Name,BillingStreet,BillingCity,AnnualRevenue,NumberOfEmployees,\
         CreatedDate,LastModifiedDate,SLAExpirationDate__c,Customer_Priority__c,\
         Number_of_Locations__c,Tier_1__c+FROM+Account"
    ));

    let table = contents(ArtifactKind::Table);
    for field in &output.model {
        assert!(table.contains(&format!("    {} ", field.refined_name())));
    }
    assert!(table.contains("NumberOfLocationsC DECIMAL(3,0) NULL"));
}

#[test]
fn test_selected_artifacts_only() {
    let config = GeneratorConfig::from_yaml("artifacts: [table, entity]\ntable_schema: staging\n")
        .unwrap();
    let output = generate_from_json(&account_input(), &config).unwrap();

    let kinds: Vec<ArtifactKind> = output.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ArtifactKind::Table, ArtifactKind::Entity]);
    assert!(output.artifacts[0]
        .contents
        .contains("CREATE TABLE [staging].[Account] ("));
}

#[test]
fn test_verbatim_names() {
    let config = GeneratorConfig {
        refine_names: false,
        ..GeneratorConfig::default()
    };
    let output = generate_from_json(&account_input(), &config).unwrap();
    assert!(output
        .model
        .iter()
        .all(|f| f.refined_name() == f.source_name()));
}

#[test]
fn test_sample_field_missing_from_describe() {
    let sample = SAMPLE.replacen("\"Name\":", "\"Legacy_Code__c\": \"x\",\n  \"Name\":", 1);
    let input = EntityInput {
        sample_json: sample,
        ..account_input()
    };

    match generate_from_json(&input, &GeneratorConfig::default()) {
        Err(AppError::Schema(SchemaError::UnmatchedSampleField(names))) => {
            assert_eq!(names, vec!["Legacy_Code__c".to_string()]);
        }
        other => panic!("expected unmatched field, got {:?}", other),
    }
}

#[test]
fn test_unknown_type_in_sample_is_reported() {
    let describe = parse_describe(DESCRIBE).unwrap();
    let mut sample = parse_sample(SAMPLE).unwrap();
    sample.push("Logo".to_string());

    let err = reconcile(
        &describe.fields,
        &sample,
        &ReconcileOptions::new(RefineMode::Refine),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Schema Error: Unresolved field types: Logo (xsd:base64Binary)"
    );
}

#[test]
fn test_describe_only_fields_are_ignored() {
    let describe = parse_describe(DESCRIBE).unwrap();
    let model = reconcile(
        &describe.fields,
        &["Id", "Name"],
        &ReconcileOptions::default(),
    )
    .unwrap();
    assert_eq!(model.len(), 2);
}
