//! Task description assembly and the output contract.

use agentgen_core::ResolvedTask;
use serde::Serialize;
use std::fmt;

/// Output format a task is asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    PythonCode,
    Markdown,
    PlainText,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonCode => "python_code",
            Self::Markdown => "markdown",
            Self::PlainText => "plain_text",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the output kind from the first produced resource with a known extension.
pub fn infer_output_kind(task: &ResolvedTask) -> OutputKind {
    for resource in &task.produced_resources {
        let lower = resource.to_ascii_lowercase();
        if lower.ends_with(".py") {
            return OutputKind::PythonCode;
        }
        if lower.ends_with(".md") {
            return OutputKind::Markdown;
        }
    }
    OutputKind::PlainText
}

/// Fixed instruction block appended to every task description.
pub fn output_contract(kind: OutputKind) -> String {
    format!(
        "OUTPUT CONTRACT:\n\
         - Output format: {}\n\
         - Produce fully instantiated content\n\
         - Do NOT explain ontology classes, RDF, schemas, or models\n\
         - Do NOT include commentary, metadata, or explanations",
        kind
    )
}

/// Full task description: heading, resolved description, labeled prompt
/// fragments, then the output contract, separated by blank lines.
pub fn task_description(task: &ResolvedTask) -> String {
    let mut parts = vec![format!("TASK: {}", task.title), task.description.clone()];
    for prompt in &task.prompts {
        if !prompt.instruction.is_empty() {
            parts.push(format!("INSTRUCTIONS:\n{}", prompt.instruction));
        }
        if !prompt.input_data.is_empty() {
            parts.push(format!("INPUTS:\n{}", prompt.input_data));
        }
        if !prompt.output_indicator.is_empty() {
            parts.push(format!("OUTPUT REQUIREMENTS:\n{}", prompt.output_indicator));
        }
    }
    if !task.required_resources.is_empty() {
        let listed: Vec<String> = task
            .required_resources
            .iter()
            .map(|r| format!("- {}", r))
            .collect();
        parts.push(format!("REQUIRED RESOURCES:\n{}", listed.join("\n")));
    }
    parts.push(output_contract(infer_output_kind(task)));
    parts.retain(|p| !p.is_empty());
    parts.join("\n\n")
}
