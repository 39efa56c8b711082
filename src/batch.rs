//! Batch driver: compile every graph document under a directory.
//!
//! Inputs are discovered recursively, processed on a bounded pool of
//! blocking workers, and reported in discovery order. A failing file is
//! logged and recorded; it never aborts the batch.

use crate::config::AgentgenConfig;
use agentgen_core::{Error, Result};
use agentgen_emit::{Artifact, Emitter, EmitterRegistry};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A discovered graph document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub path: PathBuf,
    /// File stem, prefixed with `<subdir>_` for each directory below the root.
    pub stem: String,
}

/// What happened to one input.
#[derive(Debug)]
pub enum Outcome {
    Generated(Vec<PathBuf>),
    /// The primary output already existed.
    Skipped(PathBuf),
}

#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub result: Result<Outcome>,
}

impl FileReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(Outcome::Generated(outputs)) => {
                let outputs: Vec<_> = outputs.iter().map(|p| p.display().to_string()).collect();
                write!(f, "ok    {} -> {}", self.input.display(), outputs.join(", "))
            }
            Ok(Outcome::Skipped(existing)) => {
                write!(f, "skip  {} ({} exists)", self.input.display(), existing.display())
            }
            Err(e) => write!(f, "FAIL  {}: {}", self.input.display(), e),
        }
    }
}

/// Per-file reports in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.succeeded()).count()
    }

    /// `(file, error)` pairs for every failed input.
    pub fn errors(&self) -> Vec<(&Path, &Error)> {
        self.reports
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.input.as_path(), e)))
            .collect()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{}", report)?;
        }
        write!(f, "{}/{} succeeded", self.succeeded(), self.total())
    }
}

fn include_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            Error::ConfigError(format!("invalid include pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("invalid include patterns: {}", e)))
}

/// Graph documents under `dir` whose file name matches `include`, sorted by
/// path. Inputs that would share a stem keep their extension in it
/// (`a.ttl`, `a.rdf` → `a_ttl`, `a_rdf`).
pub fn discover(dir: &Path, include: &[String]) -> Result<Vec<Input>> {
    if !dir.is_dir() {
        return Err(Error::ConfigError(format!(
            "input directory not found: {}",
            dir.display()
        )));
    }
    let globs = include_set(include)?;

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Some(name) = path.file_name() else { continue };
        if !globs.is_match(name) {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path);
        let mut parts: Vec<String> = rel
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        parts.push(crate::pipeline::stem_of(path));
        inputs.push(Input {
            path: path.to_path_buf(),
            stem: parts.join("_"),
        });
    }
    qualify_shared_stems(&mut inputs);
    debug!("discovered {} inputs under {}", inputs.len(), dir.display());
    Ok(inputs)
}

fn qualify_shared_stems(inputs: &mut [Input]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for input in inputs.iter() {
        *counts.entry(input.stem.clone()).or_default() += 1;
    }
    for input in inputs.iter_mut() {
        if counts[&input.stem] < 2 {
            continue;
        }
        if let Some(ext) = input.path.extension() {
            input.stem = format!("{}_{}", input.stem, ext.to_string_lossy());
        }
    }
}

struct Job {
    emitters: Vec<Arc<dyn Emitter>>,
    output_dir: PathBuf,
    prefix: String,
    skip_existing: bool,
}

impl Job {
    fn destination(&self, emitter: &dyn Emitter, stem: &str) -> PathBuf {
        self.output_dir
            .join(emitter.target().output_name(stem, &self.prefix))
    }

    /// Inputs whose output paths are also claimed by another input, keyed by
    /// input index. Every claimant fails; none of them is compiled.
    fn conflicts(&self, inputs: &[Input]) -> HashMap<usize, Error> {
        let mut claims: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
        for (i, input) in inputs.iter().enumerate() {
            for emitter in &self.emitters {
                let claimants = claims
                    .entry(self.destination(emitter.as_ref(), &input.stem))
                    .or_default();
                if !claimants.contains(&i) {
                    claimants.push(i);
                }
            }
        }

        let mut conflicts = HashMap::new();
        for (dest, claimants) in claims.into_iter().filter(|(_, c)| c.len() > 1) {
            for &i in &claimants {
                let others: Vec<_> = claimants
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| inputs[j].path.display().to_string())
                    .collect();
                conflicts.entry(i).or_insert_with(|| {
                    Error::ConfigError(format!(
                        "output {} is also claimed by {}",
                        dest.display(),
                        others.join(", ")
                    ))
                });
            }
        }
        conflicts
    }

    /// Compile one input for every target. Nothing is written unless every
    /// target emitted successfully.
    fn process(&self, input: &Input) -> Result<Outcome> {
        if let Some(primary) = self.emitters.first() {
            let dest = self.destination(primary.as_ref(), &input.stem);
            if self.skip_existing && dest.exists() {
                return Ok(Outcome::Skipped(dest));
            }
        }

        let ir = crate::pipeline::resolve_file(&input.path)?;
        let mut artifacts: Vec<(PathBuf, Artifact)> = Vec::with_capacity(self.emitters.len());
        for emitter in &self.emitters {
            let dest = self.destination(emitter.as_ref(), &input.stem);
            artifacts.push((dest, emitter.emit(&ir, &input.stem)?));
        }

        let mut written = Vec::with_capacity(artifacts.len());
        for (dest, artifact) in artifacts {
            artifact.write_to(&dest)?;
            written.push(dest);
        }
        Ok(Outcome::Generated(written))
    }
}

/// A per-input result, decided up front or still running on a worker.
enum Pending {
    Ready(Result<Outcome>),
    Running(tokio::task::JoinHandle<Result<Outcome>>),
}

fn worker_failure(e: impl fmt::Display) -> Error {
    Error::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("batch worker failed: {}", e),
    ))
}

/// Run a batch over `config.input.dir`.
///
/// Fails only on setup problems: a missing input directory, bad include
/// patterns, or an unregistered target. Per-file failures are reported in
/// the returned summary.
pub async fn run(config: &AgentgenConfig, registry: &EmitterRegistry) -> Result<BatchSummary> {
    let inputs = discover(&config.input.dir, &config.input.include)?;
    let emitters = config
        .output
        .targets
        .iter()
        .map(|t| registry.require(*t))
        .collect::<Result<Vec<_>>>()?;
    if emitters.is_empty() {
        return Err(Error::ConfigError("no output targets configured".into()));
    }

    let job = Arc::new(Job {
        emitters,
        output_dir: config.output.dir.clone(),
        prefix: config.output.prefix.clone(),
        skip_existing: config.batch.skip_existing,
    });
    let jobs = config.jobs();
    info!(
        "batch: {} inputs from {} with {} worker(s)",
        inputs.len(),
        config.input.dir.display(),
        jobs
    );

    let mut conflicts = job.conflicts(&inputs);
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        if let Some(e) = conflicts.remove(&i) {
            handles.push((input.path, Pending::Ready(Err(e))));
            continue;
        }
        let permit = semaphore.clone().acquire_owned().await.map_err(worker_failure)?;
        let job = job.clone();
        let path = input.path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job.process(&input)
        });
        handles.push((path, Pending::Running(handle)));
    }

    let mut summary = BatchSummary::default();
    for (input, pending) in handles {
        let result = match pending {
            Pending::Ready(result) => result,
            Pending::Running(handle) => handle.await.unwrap_or_else(|e| Err(worker_failure(e))),
        };
        match &result {
            Ok(Outcome::Generated(outputs)) => {
                info!("{}: wrote {} output(s)", input.display(), outputs.len())
            }
            Ok(Outcome::Skipped(dest)) => {
                info!("{}: skipped, {} exists", input.display(), dest.display())
            }
            Err(e) => warn!("{}: {}", input.display(), e),
        }
        summary.reports.push(FileReport { input, result });
    }
    info!("batch: {}/{} succeeded", summary.succeeded(), summary.total());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn discovery_is_recursive_sorted_and_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.ttl"));
        touch(&dir.path().join("a.rdf"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("travel").join("a.ttl"));

        let include = vec!["*.ttl".to_string(), "*.rdf".to_string()];
        let stems: Vec<_> = discover(dir.path(), &include)
            .unwrap()
            .into_iter()
            .map(|i| i.stem)
            .collect();
        assert_eq!(stems, ["a", "b", "travel_a"]);
    }

    #[test]
    fn shared_stems_keep_their_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.ttl"));
        touch(&dir.path().join("a.rdf"));
        touch(&dir.path().join("b.ttl"));

        let include = vec!["*.ttl".to_string(), "*.rdf".to_string()];
        let stems: Vec<_> = discover(dir.path(), &include)
            .unwrap()
            .into_iter()
            .map(|i| i.stem)
            .collect();
        assert_eq!(stems, ["a_rdf", "a_ttl", "b"]);
    }

    #[test]
    fn inputs_claiming_one_output_all_conflict() {
        let registry = agentgen_emit::create_default_registry().unwrap();
        let job = Job {
            emitters: vec![
                registry.require(agentgen_emit::Target::Crewai).unwrap(),
                registry.require(agentgen_emit::Target::CrewaiProject).unwrap(),
            ],
            output_dir: PathBuf::from("out"),
            prefix: "crewai_".into(),
            skip_existing: true,
        };
        let input = |path: &str, stem: &str| Input {
            path: path.into(),
            stem: stem.into(),
        };
        // `travel/a.ttl` and `travel_a.ttl` share a stem; `x` and
        // `x_instances` share a project directory.
        let inputs = [
            input("travel/a.ttl", "travel_a"),
            input("travel_a.ttl", "travel_a"),
            input("x.ttl", "x"),
            input("x_instances.ttl", "x_instances"),
            input("y.ttl", "y"),
        ];
        let conflicts = job.conflicts(&inputs);
        let mut failed: Vec<_> = conflicts.keys().copied().collect();
        failed.sort();
        assert_eq!(failed, [0, 1, 2, 3]);
        assert!(conflicts[&0].to_string().contains("travel_a.ttl"));
        assert!(conflicts[&3].to_string().contains("x.ttl"));
    }

    #[test]
    fn missing_directory_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("absent"), &["*.ttl".into()]).err().unwrap();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn bad_pattern_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &["[".into()]).is_err());
    }

    #[test]
    fn summary_counts_and_lists_errors() {
        let summary = BatchSummary {
            reports: vec![
                FileReport {
                    input: "a.ttl".into(),
                    result: Ok(Outcome::Generated(vec!["out/crewai_a.py".into()])),
                },
                FileReport {
                    input: "b.ttl".into(),
                    result: Err(Error::emission("boom")),
                },
            ],
        };
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.errors().len(), 1);
        let text = summary.to_string();
        assert!(text.contains("FAIL  b.ttl: emission error: boom"));
        assert!(text.ends_with("1/2 succeeded"));
    }
}
