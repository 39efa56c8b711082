//! Resolved intermediate representation.
//!
//! The IR is the contract between the resolver and the emitters. Every field
//! is present; optional graph facts have already been resolved or defaulted.
//! Cross-references are identifiers, never Rust references.

use serde::Serialize;

/// Everything extracted from one input graph, resolved and ordered.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Ir {
    pub tools: Vec<ResolvedTool>,
    pub agents: Vec<ResolvedAgent>,
    /// Tasks in execution order.
    pub tasks: Vec<ResolvedTask>,
    pub teams: Vec<ResolvedTeam>,
}

impl Ir {
    pub fn agent(&self, id: &str) -> Option<&ResolvedAgent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn tool(&self, id: &str) -> Option<&ResolvedTool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&ResolvedTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.agents.is_empty() && self.tasks.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolvedTool {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Other tools this tool calls.
    pub uses_tools: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolvedAgent {
    pub id: String,
    /// Display title; may be empty, it is never emitted as code.
    pub title: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Tool identifiers, each present in [`Ir::tools`].
    pub tools: Vec<String>,
    /// Agents this agent delegates to or talks with.
    pub interacts_with: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolvedTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub expected_output: String,
    /// Performing agent, present in [`Ir::agents`] when set.
    pub agent: Option<String>,
    pub prompts: Vec<PromptFragment>,
    pub required_resources: Vec<String>,
    pub produced_resources: Vec<String>,
}

/// Prompt text attached to a task. At least one field is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PromptFragment {
    pub id: String,
    pub instruction: String,
    pub input_data: String,
    pub output_indicator: String,
    pub context: String,
}

impl PromptFragment {
    pub fn is_empty(&self) -> bool {
        self.instruction.is_empty()
            && self.input_data.is_empty()
            && self.output_indicator.is_empty()
            && self.context.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolvedTeam {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Member agent identifiers, each present in [`Ir::agents`].
    pub members: Vec<String>,
    /// Goal and objective texts.
    pub goals: Vec<String>,
    pub workflow_pattern: Option<String>,
}
