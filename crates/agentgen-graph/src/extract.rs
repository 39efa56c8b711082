//! Fact extractor: runs the query battery and collects raw records.
//!
//! Records live in flat vectors keyed by identifier; relationships are
//! identifier pairs. Nothing is resolved here.

use crate::graph::{KnowledgeGraph, Row};
use crate::queries;
use agentgen_core::{Error, Result};
use std::collections::HashSet;
use tracing::info;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTool {
    pub id: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAgent {
    pub id: String,
    pub agent_id: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    /// Goal reference, `hasAgentGoal` preferred over `hasGoal`.
    pub goal: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTask {
    pub id: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    /// `performedByAgent` target.
    pub performed_by: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGoal {
    pub id: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPrompt {
    pub id: String,
    pub instruction: Option<String>,
    pub input_data: Option<String>,
    pub output_indicator: Option<String>,
    pub context: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTeam {
    pub id: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub workflow_pattern: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawStep {
    pub id: String,
    /// Ordinal as written in the graph; parsed by the resolver.
    pub order: Option<String>,
    pub task: Option<String>,
    pub next: Option<String>,
    pub is_start: bool,
    pub is_end: bool,
}

/// How an agent→tool link was expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolLink {
    Current,
    Legacy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentTool {
    pub agent: String,
    pub tool: String,
    pub via: ToolLink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Requires,
    Produces,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskResource {
    pub task: String,
    pub resource: String,
    pub direction: Direction,
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfigValue {
    pub owner: String,
    pub key: String,
    pub value: String,
}

/// Everything the query battery found in one graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFacts {
    pub tools: Vec<RawTool>,
    pub agents: Vec<RawAgent>,
    pub tasks: Vec<RawTask>,
    pub goals: Vec<RawGoal>,
    pub prompts: Vec<RawPrompt>,
    pub teams: Vec<RawTeam>,
    pub steps: Vec<RawStep>,

    pub agent_tools: Vec<AgentTool>,
    pub agent_interactions: Vec<(String, String)>,
    /// `(agent, task)` pairs linked from the agent side.
    pub agent_tasks: Vec<(String, String)>,
    pub task_prompts: Vec<(String, String)>,
    pub task_resources: Vec<TaskResource>,
    pub tool_usage: Vec<(String, String)>,
    pub team_members: Vec<(String, String)>,
    pub team_goals: Vec<(String, String)>,
    pub configs: Vec<ConfigValue>,
}

impl RawFacts {
    pub fn goal(&self, id: &str) -> Option<&RawGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn prompt(&self, id: &str) -> Option<&RawPrompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// First config value stored under `key` for `owner`.
    pub fn config(&self, owner: &str, key: &str) -> Option<&str> {
        self.configs
            .iter()
            .find(|c| c.owner == owner && c.key == key)
            .map(|c| c.value.as_str())
    }
}

/// Run the full query battery against `graph`.
pub fn extract(graph: &KnowledgeGraph) -> Result<RawFacts> {
    let mut facts = RawFacts::default();

    facts.tools = entities(graph, &queries::TOOLS, "tool", |id, r| RawTool {
        id,
        title: own(r, "title"),
        label: own(r, "label"),
        description: own(r, "desc"),
        comment: own(r, "comment"),
    })?;

    facts.agents = entities(graph, &queries::AGENTS, "agent", |id, r| RawAgent {
        id,
        agent_id: own(r, "agentID"),
        role: own(r, "role"),
        description: own(r, "desc"),
        title: own(r, "title"),
        label: own(r, "label"),
        goal: r.first_of(&["agentGoal", "generalGoal"]).map(str::to_string),
    })?;

    facts.tasks = entities(graph, &queries::TASKS, "task", |id, r| RawTask {
        id,
        title: own(r, "title"),
        label: own(r, "label"),
        description: own(r, "desc"),
        performed_by: own(r, "agent"),
    })?;

    facts.goals = entities(graph, &queries::GOALS, "goal", |id, r| RawGoal {
        id,
        title: own(r, "title"),
        label: own(r, "label"),
        description: own(r, "desc"),
    })?;

    facts.prompts = entities(graph, &queries::PROMPTS, "prompt", |id, r| RawPrompt {
        id,
        instruction: own(r, "instruction"),
        input_data: own(r, "inputData"),
        output_indicator: own(r, "outputIndicator"),
        context: own(r, "context"),
    })?;

    facts.teams = entities(graph, &queries::TEAMS, "team", |id, r| RawTeam {
        id,
        title: own(r, "title"),
        label: own(r, "label"),
        description: own(r, "desc"),
        workflow_pattern: own(r, "pattern"),
    })?;

    facts.steps = entities(graph, &queries::WORKFLOW_STEPS, "step", |id, r| RawStep {
        id,
        order: own(r, "order"),
        task: own(r, "task"),
        next: own(r, "next"),
        is_start: r.is_true("isStart"),
        is_end: r.is_true("isEnd"),
    })?;

    facts.agent_tools = edges(graph, &queries::AGENT_TOOLS, ["agent", "tool"])?
        .into_iter()
        .map(|(r, [agent, tool])| AgentTool {
            agent,
            tool,
            via: match r.get("via") {
                Some("legacy") => ToolLink::Legacy,
                _ => ToolLink::Current,
            },
        })
        .collect();

    facts.agent_interactions = pairs(graph, &queries::AGENT_INTERACTIONS, ["agent", "other"])?;
    facts.agent_tasks = pairs(graph, &queries::AGENT_TASKS, ["agent", "task"])?;
    facts.task_prompts = pairs(graph, &queries::TASK_PROMPTS, ["task", "prompt"])?;

    facts.task_resources = edges(graph, &queries::TASK_RESOURCES, ["task", "resource"])?
        .into_iter()
        .map(|(r, [task, resource])| TaskResource {
            task,
            resource,
            direction: match r.get("direction") {
                Some("produces") => Direction::Produces,
                _ => Direction::Requires,
            },
            title: own(&r, "title"),
        })
        .collect();

    facts.tool_usage = pairs(graph, &queries::TOOL_USAGE, ["tool", "other"])?;
    facts.team_members = pairs(graph, &queries::TEAM_MEMBERS, ["team", "agent"])?;
    facts.team_goals = pairs(graph, &queries::TEAM_GOALS, ["team", "goal"])?;

    facts.configs = edges(graph, &queries::CONFIG_VALUES, ["owner", "key"])?
        .into_iter()
        .filter_map(|(r, [owner, key])| {
            let value = own(&r, "value")?;
            Some(ConfigValue { owner, key, value })
        })
        .collect();

    info!(
        tools = facts.tools.len(),
        agents = facts.agents.len(),
        tasks = facts.tasks.len(),
        goals = facts.goals.len(),
        prompts = facts.prompts.len(),
        teams = facts.teams.len(),
        steps = facts.steps.len(),
        "extracted facts"
    );
    Ok(facts)
}

fn own(row: &Row, var: &str) -> Option<String> {
    row.get(var).map(str::to_string)
}

/// One record per identifier; the first row seen wins.
fn entities<T>(
    graph: &KnowledgeGraph,
    query: &queries::Query,
    key: &str,
    build: impl Fn(String, &Row) -> T,
) -> Result<Vec<T>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in graph.select(query)? {
        let Some(id) = row.get(key) else {
            return Err(Error::query(format!("{}: row without ?{}", query.name, key)));
        };
        if seen.insert(id.to_string()) {
            out.push(build(id.to_string(), &row));
        }
    }
    Ok(out)
}

/// Rows keyed by a pair of variables, first occurrence of each pair wins.
fn edges(
    graph: &KnowledgeGraph,
    query: &queries::Query,
    vars: [&str; 2],
) -> Result<Vec<(Row, [String; 2])>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in graph.select(query)? {
        let (Some(a), Some(b)) = (row.get(vars[0]), row.get(vars[1])) else {
            continue;
        };
        let key = [a.to_string(), b.to_string()];
        if seen.insert(key.clone()) {
            out.push((row, key));
        }
    }
    Ok(out)
}

fn pairs(
    graph: &KnowledgeGraph,
    query: &queries::Query,
    vars: [&str; 2],
) -> Result<Vec<(String, String)>> {
    Ok(edges(graph, query, vars)?
        .into_iter()
        .map(|(_, [a, b])| (a, b))
        .collect())
}
