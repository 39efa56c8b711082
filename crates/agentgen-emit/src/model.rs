//! View model shared by every backend.
//!
//! Names are assigned and text is validated once here, so backends differ
//! only in layout.

use crate::contract::{infer_output_kind, task_description, OutputKind};
use crate::literal::check_controls;
use crate::names::NameTable;
use agentgen_core::{CasePolicy, Ir, ResolvedTool, Result, SafeName};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, Serialize)]
pub struct EmitModel {
    /// Input file stem.
    pub source: String,
    /// Class name for project layouts.
    pub crew_name: String,
    pub team: Option<TeamView>,
    pub tools: Vec<ToolView>,
    pub agents: Vec<AgentView>,
    /// Tasks in execution order.
    pub tasks: Vec<TaskView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TeamView {
    pub title: String,
    pub description: String,
    pub workflow_pattern: Option<String>,
    pub goals: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ToolView {
    pub name: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentView {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<String>,
    pub allow_delegation: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaskView {
    pub name: String,
    pub title: String,
    pub description: String,
    pub expected_output: String,
    pub agent: Option<String>,
    pub output_kind: OutputKind,
}

impl EmitModel {
    /// Assign names under `case`, refusing any name in `reserved`.
    pub fn build(ir: &Ir, stem: &str, case: CasePolicy, reserved: &[&str]) -> Result<Self> {
        let mut names = NameTable::new(case);
        names.reserve(reserved);

        // tools may name each other, so every tool is named before any view
        let tool_names = ir
            .tools
            .iter()
            .map(|t| names.assign(&t.id).map(SafeName::into_string))
            .collect::<Result<Vec<_>>>()?;
        let tools = ir
            .tools
            .iter()
            .zip(tool_names)
            .map(|(t, name)| ToolView {
                name,
                title: t.title.clone(),
                description: tool_doc(t, &names),
            })
            .collect();

        let mut agents = Vec::with_capacity(ir.agents.len());
        for a in &ir.agents {
            let name = names.assign(&a.id)?.into_string();
            let tools = a
                .tools
                .iter()
                .filter_map(|id| names.get(id).map(|n| n.to_string()))
                .collect();
            agents.push(AgentView {
                name,
                role: a.role.clone(),
                goal: a.goal.clone(),
                backstory: a.backstory.clone(),
                tools,
                allow_delegation: !a.interacts_with.is_empty(),
            });
        }

        let mut tasks = Vec::with_capacity(ir.tasks.len());
        for t in &ir.tasks {
            let name = names.assign(&t.id)?.into_string();
            tasks.push(TaskView {
                name,
                title: t.title.clone(),
                description: task_description(t),
                expected_output: t.expected_output.clone(),
                agent: t
                    .agent
                    .as_deref()
                    .and_then(|id| names.get(id))
                    .map(|n| n.to_string()),
                output_kind: infer_output_kind(t),
            });
        }

        let team = ir.teams.first().map(|t| TeamView {
            title: t.title.clone(),
            description: t.description.clone(),
            workflow_pattern: t.workflow_pattern.clone(),
            goals: t.goals.clone(),
        });

        let crew_name = names
            .claim_class(
                &class_name(
                    team.as_ref()
                        .map(|t| t.title.as_str())
                        .unwrap_or_else(|| stem.trim_end_matches("_instances")),
                ),
                "crew class",
            )
            .into_string();
        let model = Self {
            source: stem.to_string(),
            crew_name,
            team,
            tools,
            agents,
            tasks,
        };
        model.validate()?;
        debug!(
            stem,
            case = %case,
            tools = model.tools.len(),
            agents = model.agents.len(),
            tasks = model.tasks.len(),
            "built emit model"
        );
        Ok(model)
    }

    /// Every text that reaches generated source must be encodable.
    fn validate(&self) -> Result<()> {
        check_controls(&self.source)?;
        if let Some(team) = &self.team {
            check_controls(&team.title)?;
            check_controls(&team.description)?;
            for goal in &team.goals {
                check_controls(goal)?;
            }
        }
        for t in &self.tools {
            check_controls(&t.title)?;
            check_controls(&t.description)?;
        }
        for a in &self.agents {
            check_controls(&a.role)?;
            check_controls(&a.goal)?;
            check_controls(&a.backstory)?;
        }
        for t in &self.tasks {
            check_controls(&t.description)?;
            check_controls(&t.expected_output)?;
        }
        Ok(())
    }

    /// Module docstring text: provenance plus the team, when there is one.
    pub fn header(&self, target: &str) -> String {
        let mut lines = vec![
            "Auto-generated CrewAI script".to_string(),
            format!("Source: AgentO knowledge graph ({})", self.source),
            format!("Target: {}", target),
        ];
        if let Some(team) = &self.team {
            lines.push(String::new());
            lines.push(format!("Team: {}", team.title));
            if !team.description.is_empty() {
                lines.push(team.description.clone());
            }
        }
        lines.join("\n")
    }
}

/// Tool docstring: the description, plus the tools it calls when any are known.
fn tool_doc(tool: &ResolvedTool, names: &NameTable) -> String {
    let uses: Vec<&str> = tool
        .uses_tools
        .iter()
        .filter_map(|id| names.get(id).map(|n| n.as_str()))
        .collect();
    if uses.is_empty() {
        tool.description.clone()
    } else {
        format!("{}\n\nUses tools: {}", tool.description, uses.join(", "))
    }
}

/// `game-builder crew` → `GameBuilderCrew`.
pub fn class_name(text: &str) -> String {
    let mut name: String = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "Crew");
    }
    name
}
