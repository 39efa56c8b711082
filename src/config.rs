//! agentgen configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file
//! exists. Command-line flags override file values.

use agentgen_emit::Target;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "agentgen.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentgenConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned recursively for graph documents.
    pub dir: PathBuf,
    /// File-name globs selecting graph documents.
    pub include: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated code is written to.
    pub dir: PathBuf,
    /// Prepended to the input stem for single-file targets.
    pub prefix: String,
    /// Targets generated for every input.
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed concurrently.
    pub jobs: usize,
    /// Leave inputs whose primary output already exists untouched.
    pub skip_existing: bool,
}

// ============================================================
// Defaults
// ============================================================

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("generated_kg"),
            include: vec!["*.ttl".into(), "*.rdf".into()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            prefix: "crewai_".into(),
            targets: vec![Target::Crewai],
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            skip_existing: true,
        }
    }
}

impl AgentgenConfig {
    /// Load from a TOML file, falling back to defaults if missing or invalid.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The effective config as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Worker count, never zero.
    pub fn jobs(&self) -> usize {
        self.batch.jobs.max(1)
    }
}
