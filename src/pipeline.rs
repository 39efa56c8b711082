//! Single-file compilation: load → extract → resolve → emit.

use agentgen_core::{Ir, Result};
use agentgen_emit::{Artifact, Emitter};
use std::path::Path;
use tracing::debug;

/// Input stem used in output names and generated headers.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string())
}

/// Load and resolve one graph document.
pub fn resolve_file(path: &Path) -> Result<Ir> {
    let graph = agentgen_graph::load(path)?;
    let facts = agentgen_graph::extract(&graph)?;
    agentgen_resolve::resolve(facts)
}

/// Resolve a graph document held in memory. `name` labels parse errors.
pub fn resolve_str(text: &str, name: &str) -> Result<Ir> {
    let graph = agentgen_graph::load_str(text, name)?;
    let facts = agentgen_graph::extract(&graph)?;
    agentgen_resolve::resolve(facts)
}

/// Compile an in-memory graph document under `stem`.
pub fn compile_str(text: &str, stem: &str, emitter: &dyn Emitter) -> Result<Artifact> {
    let ir = resolve_str(text, stem)?;
    emitter.emit(&ir, stem)
}

/// Compile one graph document with `emitter`, naming it by its file stem.
pub fn compile_file(path: &Path, emitter: &dyn Emitter) -> Result<Artifact> {
    compile_as(path, &stem_of(path), emitter)
}

/// Compile one graph document under an explicit stem.
pub fn compile_as(path: &Path, stem: &str, emitter: &dyn Emitter) -> Result<Artifact> {
    let ir = resolve_file(path)?;
    debug!(
        "{}: {} agents, {} tasks -> {}",
        path.display(),
        ir.agents.len(),
        ir.tasks.len(),
        emitter.target()
    );
    emitter.emit(&ir, stem)
}
