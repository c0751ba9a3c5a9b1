#![deny(missing_docs)]

//! # entitygen CLI
//!
//! Command Line Interface for the describe/sample code generator.
//!
//! Supported Commands:
//! - `generate`: Describe + sample -> entity, query builder, table, converter,
//!   upsert service and parquet writer for one entity.
//! - `batch`: Runs `generate` for every entity in a YAML manifest.
//! - `inspect`: Prints the reconciled field model as JSON.
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=entitygen_core=debug`).

use clap::{Parser, Subcommand};
use entitygen_core::AppResult;

mod batch;
mod common;
mod generate;
mod inspect;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Entity code generator")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every artifact for one entity.
    Generate(generate::GenerateArgs),
    /// Generate several entities listed in a manifest.
    Batch(batch::BatchArgs),
    /// Print the canonical field model.
    Inspect(inspect::InspectArgs),
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Batch(args) => batch::execute(args)?,
        Commands::Inspect(args) => inspect::execute(args)?,
    }

    Ok(())
}
