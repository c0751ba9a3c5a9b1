#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints the canonical field model as JSON without rendering artifacts.

use std::path::PathBuf;

use entitygen_core::pipeline::build_model;
use entitygen_core::{parse_describe, parse_sample, AppResult, CanonicalFieldModel};

use crate::common::{read_text, ConfigArgs};

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the describe JSON document.
    #[clap(long)]
    pub describe: PathBuf,

    /// Path to the sample instance JSON document.
    #[clap(long)]
    pub sample: PathBuf,

    #[clap(flatten)]
    pub settings: ConfigArgs,
}

/// Reconciles the inputs into a model.
pub fn load_model(args: &InspectArgs) -> AppResult<CanonicalFieldModel> {
    let config = args.settings.load()?;
    let describe = parse_describe(&read_text(&args.describe)?)?;
    let sample = parse_sample(&read_text(&args.sample)?)?;
    build_model(&describe, &sample, &config)
}

/// Executes the inspection.
pub fn execute(args: &InspectArgs) -> AppResult<()> {
    let model = load_model(args)?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_model_serializes_in_sample_order() {
        let dir = tempdir().unwrap();
        let describe = dir.path().join("describe.json");
        let sample = dir.path().join("sample.json");
        fs::write(
            &describe,
            r#"{ "fields": [
                { "name": "Id", "soapType": "tns:ID", "nillable": false },
                { "name": "AnnualRevenue", "soapType": "xsd:double", "nillable": true, "precision": 18, "scale": 2 }
            ] }"#,
        )
        .unwrap();
        fs::write(&sample, r#"{ "AnnualRevenue": 1.5, "Id": "1" }"#).unwrap();

        let args = InspectArgs {
            describe,
            sample,
            settings: ConfigArgs::default(),
        };
        let model = load_model(&args).unwrap();
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json[0]["source_name"], "AnnualRevenue");
        assert_eq!(json[0]["nullable_target_type"], "Option<f64>");
        assert_eq!(json[1]["refined_name"], "Id");
    }
}
