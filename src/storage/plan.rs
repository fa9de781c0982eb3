//! Plan files
//!
//! Plans are read as TOML, YAML or JSON depending on the file extension.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::Plan;

#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("Unsupported plan format '{0}' (expected .toml, .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Plan file not found: {0}")]
    NotFound(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Toml,
    Yaml,
    Json,
}

impl PlanFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlanFileError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(PlanFormat::Toml),
            "yaml" | "yml" => Ok(PlanFormat::Yaml),
            "json" => Ok(PlanFormat::Json),
            _ => Err(PlanFileError::UnsupportedFormat(ext)),
        }
    }

    pub fn parse(&self, content: &str) -> Result<Plan> {
        match self {
            PlanFormat::Toml => toml::from_str(content).context("Failed to parse TOML plan"),
            PlanFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML plan"),
            PlanFormat::Json => serde_json::from_str(content).context("Failed to parse JSON plan"),
        }
    }
}

/// Reads a plan file
pub fn load_plan(path: &Path) -> Result<Plan> {
    let format = PlanFormat::from_path(path)?;
    if !path.is_file() {
        return Err(PlanFileError::NotFound(path.to_path_buf()).into());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan: {}", path.display()))?;
    format
        .parse(&content)
        .with_context(|| format!("Invalid plan: {}", path.display()))
}
