//! agentgen emit - CrewAI code generation from the resolved IR
//!
//! Each backend is a self-contained module in src/backends/.
//! To add a backend: create the file, implement Emitter, register below.

pub mod backends;
pub mod contract;
pub mod literal;
pub mod model;
pub mod names;
pub mod registry;
pub mod templates;

pub use model::EmitModel;
pub use registry::{Artifact, Emitter, EmitterRegistry, GeneratedFile, Target};

/// Create the registry with every builtin backend.
pub fn create_default_registry() -> agentgen_core::Result<EmitterRegistry> {
    let mut registry = EmitterRegistry::new();
    registry.register(backends::inline::InlineEmitter);
    registry.register(backends::template::TemplateEmitter::new()?);
    registry.register(backends::project::ProjectEmitter::new()?);
    Ok(registry)
}
