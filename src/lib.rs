//! agentgen - AgentO knowledge graph to CrewAI compiler
//!
//! The root crate ties the pipeline crates together: single-file
//! compilation, the batch driver, and configuration.

pub mod batch;
pub mod config;
pub mod pipeline;
