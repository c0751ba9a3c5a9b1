//! Compiles the generated Account artifacts as a crate and runs a record
//! through every one of them.
//!
//! Needs network access for arrow/parquet, so it is opt-in:
//! `cargo test -p entitygen-core --test generated_crate -- --ignored`

use std::fs;
use std::path::Path;
use std::process::Command;

use entitygen_core::{generate_from_json, EntityInput, GeneratorConfig};
use tempfile::tempdir;

const DESCRIBE: &str = include_str!("fixtures/account-describe.json");
const SAMPLE: &str = include_str!("fixtures/account-sample.json");

const MANIFEST: &str = r#"[package]
name = "generated-account"
version = "0.0.0"
edition = "2021"
publish = false

[workspace]

[dependencies]
arrow-array = "53"
arrow-schema = "53"
parquet = { version = "53", default-features = false, features = ["arrow"] }
chrono = { version = "0.4", features = ["serde"] }
serde = { version = "1", features = ["derive"] }
serde_json = "1"
"#;

const ROUND_TRIP: &str = r#"use generated_account::account::Account;
use generated_account::account_converter::AccountRecord;
use generated_account::account_parquet_writer::AccountParquetWriter;
use generated_account::account_query_builder::AccountQueryBuilder;
use generated_account::account_upsert::{AccountUpsertService, SqlValue, UpsertSink, COLUMNS};

struct Collect(Vec<Vec<SqlValue>>);

impl UpsertSink for Collect {
    type Error = std::convert::Infallible;

    fn execute_batch(&mut self, _statement: &str, rows: Vec<Vec<SqlValue>>) -> Result<(), Self::Error> {
        self.0.extend(rows);
        Ok(())
    }
}

#[test]
fn sample_flows_through_every_artifact() {
    let account: Account = serde_json::from_str(include_str!("../sample.json")).unwrap();
    assert_eq!(account.SLAExpirationDateC.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));

    let mut writer = AccountParquetWriter::try_new(Vec::new()).unwrap();
    writer.write_item(&account).unwrap();
    writer.close().unwrap();

    let record = AccountRecord::from(account);
    assert!(record.resource_url.is_some());

    let mut service = AccountUpsertService::new(Collect(Vec::new()));
    service.push(record).unwrap();
    let sink = service.finish().unwrap();
    assert_eq!(sink.0.len(), 1);
    assert_eq!(sink.0[0].len(), COLUMNS.len());
    assert!(sink.0[0].contains(&SqlValue::Text("2024-05-01".to_string())));

    let query = AccountQueryBuilder::new("/query?q=").default_query();
    assert!(query.ends_with("+FROM+Account"));
}
"#;

fn write_crate(root: &Path) {
    let output = generate_from_json(
        &EntityInput {
            entity_name: "Account".to_string(),
            describe_json: DESCRIBE.to_string(),
            sample_json: SAMPLE.to_string(),
        },
        &GeneratorConfig::default(),
    )
    .unwrap();

    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(root.join("tests")).unwrap();

    let mut lib = String::new();
    for artifact in &output.artifacts {
        fs::write(src.join(&artifact.file_name), &artifact.contents).unwrap();
        if let Some(module) = artifact.file_name.strip_suffix(".rs") {
            lib.push_str(&format!("pub mod {};\n", module));
        }
    }

    fs::write(src.join("lib.rs"), lib).unwrap();
    fs::write(root.join("Cargo.toml"), MANIFEST).unwrap();
    fs::write(root.join("sample.json"), SAMPLE).unwrap();
    fs::write(root.join("tests").join("round_trip.rs"), ROUND_TRIP).unwrap();
}

#[test]
#[ignore = "builds arrow and parquet from crates.io"]
fn test_generated_artifacts_build_and_run() {
    let dir = tempdir().unwrap();
    write_crate(dir.path());

    let status = Command::new(env!("CARGO"))
        .args(["test", "--quiet"])
        .current_dir(dir.path())
        .status()
        .unwrap();

    assert!(status.success(), "generated crate failed to build or test");
}
