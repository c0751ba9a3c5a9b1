#![deny(missing_docs)]

//! # Generate Command
//!
//! Describe + sample -> canonical model -> artifacts, for a single entity.

use std::path::PathBuf;

use entitygen_core::{generate_entity, parse_describe, parse_sample, AppResult};

use crate::common::{read_text, write_artifacts, ConfigArgs};

/// Arguments for the single-entity generation command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Entity (type) name, e.g. `Account`.
    #[clap(long)]
    pub entity: String,

    /// Path to the describe JSON document.
    #[clap(long)]
    pub describe: PathBuf,

    /// Path to the sample instance JSON document.
    #[clap(long)]
    pub sample: PathBuf,

    /// Directory receiving the generated artifacts.
    #[clap(long, default_value = "generated")]
    pub output: PathBuf,

    #[clap(flatten)]
    pub settings: ConfigArgs,
}

/// Executes the generation.
///
/// Nothing is written unless every artifact renders.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let config = args.settings.load()?;

    // 1. Read inputs
    let describe = parse_describe(&read_text(&args.describe)?)?;
    let sample = parse_sample(&read_text(&args.sample)?)?;

    // 2. Reconcile and render
    let output = generate_entity(&args.entity, &describe, &sample, &config)?;

    // 3. Write files
    let written = write_artifacts(&args.output, &output.artifacts)?;

    println!(
        "Generated {} artifacts for {} ({} fields) in {:?}",
        written.len(),
        output.entity_name,
        output.model.len(),
        args.output
    );

    Ok(())
}
