#![deny(missing_docs)]

//! # Shared Command Plumbing
//!
//! Configuration loading with command-line overrides, input reading, and
//! artifact writing used by every subcommand.

use std::fs;
use std::path::{Path, PathBuf};

use entitygen_core::{AppError, AppResult, Artifact, ArtifactKind, GeneratorConfig};

/// Configuration options shared by the generating commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file. Command-line flags override its values.
    #[clap(long, env = "ENTITYGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep raw field names instead of refining them.
    #[clap(long)]
    pub no_refine: bool,

    /// Rows per parquet row group in the columnar writer.
    #[clap(long)]
    pub row_group_size: Option<usize>,

    /// Rows per batch in the bulk upsert service.
    #[clap(long)]
    pub batch_size: Option<usize>,

    /// Emit only these artifacts (repeatable).
    #[clap(long = "only", value_parser = parse_kind)]
    pub only: Vec<ArtifactKind>,
}

fn parse_kind(s: &str) -> Result<ArtifactKind, String> {
    s.parse::<ArtifactKind>().map_err(|e| e.to_string())
}

impl ConfigArgs {
    /// Resolves the effective configuration.
    pub fn load(&self) -> AppResult<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_yaml(&read_text(path)?)?,
            None => GeneratorConfig::default(),
        };

        if self.no_refine {
            config.refine_names = false;
        }
        if let Some(size) = self.row_group_size {
            config.row_group_size = size;
        }
        if let Some(size) = self.batch_size {
            config.upsert_batch_size = size;
        }
        if !self.only.is_empty() {
            config.artifacts = self.only.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Reads a UTF-8 input file, naming it in the error.
pub fn read_text(path: &Path) -> AppResult<String> {
    if !path.exists() {
        return Err(AppError::General(format!("Input file not found: {:?}", path)));
    }
    fs::read_to_string(path)
        .map_err(|e| AppError::General(format!("Failed to read {:?}: {}", path, e)))
}

/// Writes artifacts into `dir`, creating it if needed. Returns written paths.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::General(format!("Failed to create output dir: {}", e)))?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents)
            .map_err(|e| AppError::General(format!("Failed to write {:?}: {}", path, e)))?;
        written.push(path);
    }
    Ok(written)
}
