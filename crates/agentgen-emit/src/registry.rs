//! Emitter registry and trait definitions
//!
//! Each backend is a self-contained module in backends/ implementing the
//! Emitter trait. Backends are registered in create_default_registry().

use agentgen_core::{CasePolicy, Error, Ir, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Code generation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Single Python module assembled inline.
    Crewai,
    /// Single Python module rendered from a template.
    CrewaiTemplate,
    /// CrewAI project directory with YAML config.
    CrewaiProject,
}

impl Target {
    pub const ALL: [Target; 3] = [Self::Crewai, Self::CrewaiTemplate, Self::CrewaiProject];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crewai => "crewai",
            Self::CrewaiTemplate => "crewai-template",
            Self::CrewaiProject => "crewai-project",
        }
    }

    /// Case policy applied to every identifier this target emits.
    pub fn case(&self) -> CasePolicy {
        match self {
            Self::Crewai => CasePolicy::Preserve,
            Self::CrewaiTemplate | Self::CrewaiProject => CasePolicy::Lower,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self, Self::CrewaiProject)
    }

    /// Output file or directory name for an input stem.
    pub fn output_name(&self, stem: &str, prefix: &str) -> String {
        if self.is_project() {
            stem.replace("_instances", "")
        } else {
            format!("{}{}.py", prefix, stem)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|t| t.as_str()).collect();
                Error::ConfigError(format!(
                    "unknown target '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// One file of a multi-file artifact, relative to the artifact root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Output of one emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    File(String),
    Project(Vec<GeneratedFile>),
}

impl Artifact {
    /// Contents of a single-file artifact.
    pub fn as_file(&self) -> Option<&str> {
        match self {
            Self::File(s) => Some(s),
            Self::Project(_) => None,
        }
    }

    /// Contents of one project file by relative path.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        match self {
            Self::File(_) => None,
            Self::Project(files) => files
                .iter()
                .find(|f| f.path == path.as_ref())
                .map(|f| f.contents.as_str()),
        }
    }

    /// Write to `dest`: a file for single-file artifacts, a directory tree
    /// otherwise. Parent directories are created.
    pub fn write_to(&self, dest: &Path) -> Result<()> {
        match self {
            Self::File(contents) => {
                if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(dest, contents)?;
            }
            Self::Project(files) => {
                for file in files {
                    let path = dest.join(&file.path);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &file.contents)?;
                }
            }
        }
        Ok(())
    }

    /// Human-readable rendering for stdout.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::File(s) => s.clone(),
            Self::Project(files) => files
                .iter()
                .map(|f| format!("# ==> {} <==\n{}", f.path.display(), f.contents))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A code generation backend.
pub trait Emitter: Send + Sync {
    fn target(&self) -> Target;

    /// Emit source for `ir`. `stem` names the input the IR came from.
    fn emit(&self, ir: &Ir, stem: &str) -> Result<Artifact>;
}

pub struct EmitterRegistry {
    emitters: HashMap<Target, Arc<dyn Emitter>>,
}

impl Default for EmitterRegistry {
    fn default() -> Self { Self::new() }
}

impl EmitterRegistry {
    pub fn new() -> Self { Self { emitters: HashMap::new() } }

    /// Register an emitter. Replaces any existing emitter for the same target.
    pub fn register(&mut self, emitter: impl Emitter + 'static) {
        self.emitters.insert(emitter.target(), Arc::new(emitter));
    }

    pub fn get(&self, target: Target) -> Option<Arc<dyn Emitter>> {
        self.emitters.get(&target).cloned()
    }

    /// Like [`get`](Self::get), failing with a config error for unknown targets.
    pub fn require(&self, target: Target) -> Result<Arc<dyn Emitter>> {
        self.get(target)
            .ok_or_else(|| Error::ConfigError(format!("no emitter registered for {}", target)))
    }

    /// Registered targets, sorted.
    pub fn list(&self) -> Vec<Target> {
        let mut targets: Vec<_> = self.emitters.keys().copied().collect();
        targets.sort();
        targets
    }
}
