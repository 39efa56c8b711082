//! agentgen graph - loading AgentO documents and extracting raw facts

pub mod extract;
pub mod graph;
pub mod loader;
pub mod queries;

pub use extract::{extract, RawFacts};
pub use graph::{KnowledgeGraph, Row};
pub use loader::{load, load_str};
pub use queries::AGENTO;
