//! agentgen resolve - fallback resolution and task ordering
//!
//! Turns [`agentgen_graph::RawFacts`] into the [`agentgen_core::Ir`] that
//! emitters consume.

pub mod chain;
pub mod order;
mod resolver;

pub use chain::Resolved;
pub use resolver::resolve;
