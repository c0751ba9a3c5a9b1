#![deny(missing_docs)]

//! # Batch Command
//!
//! Generates several entities from a YAML manifest. Each entity is written to
//! its own subdirectory; one entity failing does not stop the others.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use entitygen_core::{generate_batch, AppError, AppResult, EntityInput};
use serde::Deserialize;
use tracing::error;

use crate::common::{read_text, write_artifacts, ConfigArgs};

/// Arguments for the batch command.
#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Manifest listing the entities to generate.
    #[clap(long, default_value = "entities.yaml")]
    pub manifest: PathBuf,

    /// Root directory; each entity gets a subdirectory.
    #[clap(long, default_value = "generated")]
    pub output: PathBuf,

    #[clap(flatten)]
    pub settings: ConfigArgs,
}

/// Manifest document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Entities, generated in order.
    pub entities: Vec<ManifestEntry>,
}

/// One manifest entry. Relative paths resolve against the manifest's directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// Entity name.
    pub name: String,
    /// Describe document path.
    pub describe: PathBuf,
    /// Sample document path.
    pub sample: PathBuf,
}

impl Manifest {
    /// Parses a manifest document.
    ///
    /// Entry names must be unique; each one names its output directory.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;

        let mut seen = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for entry in &manifest.entities {
            if !seen.insert(entry.name.as_str()) && !duplicates.contains(&entry.name.as_str()) {
                duplicates.push(&entry.name);
            }
        }
        if !duplicates.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "duplicate entity names in manifest: {}",
                duplicates.join(", ")
            )));
        }

        Ok(manifest)
    }
}

/// Loads one entry's documents. Read failures become that entry's own error.
fn load_input(base: &Path, entry: &ManifestEntry) -> AppResult<EntityInput> {
    Ok(EntityInput {
        entity_name: entry.name.clone(),
        describe_json: read_text(&base.join(&entry.describe))?,
        sample_json: read_text(&base.join(&entry.sample))?,
    })
}

/// Executes the batch.
///
/// Returns an error after processing every entity if any of them failed.
pub fn execute(args: &BatchArgs) -> AppResult<()> {
    let config = args.settings.load()?;
    let manifest = Manifest::from_yaml(&read_text(&args.manifest)?)?;
    let base = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut failures: Vec<String> = Vec::new();
    let mut inputs = Vec::with_capacity(manifest.entities.len());
    for entry in &manifest.entities {
        match load_input(&base, entry) {
            Ok(input) => inputs.push(input),
            Err(e) => {
                error!(entity = %entry.name, error = %e, "failed to load inputs");
                println!("FAILED {}: {}", entry.name, e);
                failures.push(entry.name.clone());
            }
        }
    }

    for report in generate_batch(&inputs, &config) {
        let written = report.outcome.and_then(|output| {
            write_artifacts(&args.output.join(&output.entity_name), &output.artifacts)
        });
        match written {
            Ok(paths) => println!("OK     {}: {} artifacts", report.entity_name, paths.len()),
            Err(e) => {
                println!("FAILED {}: {}", report.entity_name, e);
                failures.push(report.entity_name);
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::General(format!(
            "{} of {} entities failed: {}",
            failures.len(),
            manifest.entities.len(),
            failures.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DESCRIBE: &str = r#"{ "fields": [
        { "name": "Id", "soapType": "tns:ID", "nillable": false },
        { "name": "Name", "soapType": "xsd:string", "nillable": true }
    ] }"#;

    fn write_inputs(dir: &Path, name: &str, sample: &str) {
        fs::write(dir.join(format!("{}-describe.json", name)), DESCRIBE).unwrap();
        fs::write(dir.join(format!("{}-sample.json", name)), sample).unwrap();
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = tempdir().unwrap();
        write_inputs(dir.path(), "account", r#"{ "Id": "1", "Name": "a" }"#);
        write_inputs(dir.path(), "case", r#"{ "Id": "1", "Subject": "?" }"#);
        write_inputs(dir.path(), "contact", r#"{ "Id": "1" }"#);

        let manifest = dir.path().join("entities.yaml");
        fs::write(
            &manifest,
            r#"
entities:
  - { name: Account, describe: account-describe.json, sample: account-sample.json }
  - { name: Case, describe: case-describe.json, sample: case-sample.json }
  - { name: Lead, describe: lead-describe.json, sample: lead-sample.json }
  - { name: Contact, describe: contact-describe.json, sample: contact-sample.json }
"#,
        )
        .unwrap();

        let args = BatchArgs {
            manifest,
            output: dir.path().join("out"),
            settings: ConfigArgs::default(),
        };
        let err = execute(&args).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("2 of 4 entities failed"));
        assert!(message.contains("Case"));
        assert!(message.contains("Lead"));

        assert!(args.output.join("Account").join("account.sql").exists());
        assert!(args.output.join("Contact").join("contact.sql").exists());
        assert!(!args.output.join("Case").exists());
    }

    #[test]
    fn test_manifest_rejects_unknown_keys() {
        let yaml = "entities:\n  - { name: A, describe: a.json, sample: b.json, extra: 1 }\n";
        assert!(matches!(Manifest::from_yaml(yaml), Err(AppError::Yaml(_))));
    }

    #[test]
    fn test_manifest_rejects_duplicate_names() {
        let yaml = r#"
entities:
  - { name: Account, describe: a.json, sample: a-sample.json }
  - { name: Case, describe: c.json, sample: c-sample.json }
  - { name: Account, describe: b.json, sample: b-sample.json }
  - { name: Account, describe: d.json, sample: d-sample.json }
"#;
        match Manifest::from_yaml(yaml) {
            Err(AppError::InvalidArgument(msg)) => {
                assert_eq!(msg, "duplicate entity names in manifest: Account");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_manifest_writes_nothing() {
        let dir = tempdir().unwrap();
        write_inputs(dir.path(), "account", r#"{ "Id": "1", "Name": "a" }"#);

        let manifest = dir.path().join("entities.yaml");
        fs::write(
            &manifest,
            r#"
entities:
  - { name: Account, describe: account-describe.json, sample: account-sample.json }
  - { name: Account, describe: account-describe.json, sample: account-sample.json }
"#,
        )
        .unwrap();

        let args = BatchArgs {
            manifest,
            output: dir.path().join("out"),
            settings: ConfigArgs::default(),
        };
        assert!(matches!(execute(&args), Err(AppError::InvalidArgument(_))));
        assert!(!args.output.exists());
    }
}
