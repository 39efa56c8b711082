//! Raw facts to IR: fallback chains, reference checks, ordering.

use crate::chain::{
    AgentSources, Chain, Resolved, TaskSources, ToolSources, AGENT_BACKSTORY, AGENT_GOAL,
    AGENT_ROLE, TASK_DESCRIPTION, TASK_EXPECTED_OUTPUT, TASK_TITLE, TOOL_DESCRIPTION, TOOL_TITLE,
};
use crate::order::execution_order;
use agentgen_core::ident::local_segment;
use agentgen_core::{
    normalize, CasePolicy, Error, Ir, PromptFragment, ResolvedAgent, ResolvedTask, ResolvedTeam,
    ResolvedTool, Result,
};
use agentgen_graph::extract::{Direction, RawAgent, RawPrompt, RawTask, RawTeam, RawTool, ToolLink};
use agentgen_graph::RawFacts;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resolve extracted facts into the IR.
///
/// Fails only when a record has no identifier of its own. Dangling
/// references are dropped with a warning.
pub fn resolve(facts: RawFacts) -> Result<Ir> {
    check_identity(&facts)?;

    let tool_ids: HashSet<&str> = facts.tools.iter().map(|t| t.id.as_str()).collect();
    let agent_ids: HashSet<&str> = facts.agents.iter().map(|a| a.id.as_str()).collect();

    let tools = facts
        .tools
        .iter()
        .map(|t| resolve_tool(&facts, &tool_ids, t))
        .collect();

    let agents = facts
        .agents
        .iter()
        .map(|a| resolve_agent(&facts, &tool_ids, &agent_ids, a))
        .collect();

    let declared: Vec<ResolvedTask> = facts
        .tasks
        .iter()
        .map(|t| resolve_task(&facts, &agent_ids, t))
        .collect();
    let ids: Vec<&str> = facts.tasks.iter().map(|t| t.id.as_str()).collect();
    let order = execution_order(&ids, &facts.steps);
    let mut slots: Vec<Option<ResolvedTask>> = declared.into_iter().map(Some).collect();
    let tasks = order.into_iter().filter_map(|i| slots[i].take()).collect();

    let teams = facts
        .teams
        .iter()
        .map(|t| resolve_team(&facts, &agent_ids, t))
        .collect();

    let ir = Ir {
        tools,
        agents,
        tasks,
        teams,
    };
    info!(
        tools = ir.tools.len(),
        agents = ir.agents.len(),
        tasks = ir.tasks.len(),
        teams = ir.teams.len(),
        "resolved ir"
    );
    Ok(ir)
}

fn check_identity(facts: &RawFacts) -> Result<()> {
    let kinds = [
        ("tool", facts.tools.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()),
        ("agent", facts.agents.iter().map(|r| r.id.as_str()).collect()),
        ("task", facts.tasks.iter().map(|r| r.id.as_str()).collect()),
        ("prompt", facts.prompts.iter().map(|r| r.id.as_str()).collect()),
        ("team", facts.teams.iter().map(|r| r.id.as_str()).collect()),
        ("step", facts.steps.iter().map(|r| r.id.as_str()).collect()),
    ];
    for (kind, ids) in kinds {
        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(Error::resolution(kind, "record without identifier"));
        }
    }
    Ok(())
}

fn apply<S: 'static>(chain: &Chain<S>, id: &str, sources: &S) -> String {
    let Resolved { value, step } = chain.resolve(sources);
    debug!(id, field = chain.field, step, "resolved");
    value
}

fn display_name(id: &str) -> String {
    normalize(id, CasePolicy::Preserve).into_string()
}

fn resolve_tool(facts: &RawFacts, tool_ids: &HashSet<&str>, tool: &RawTool) -> ResolvedTool {
    let sources = ToolSources {
        name: display_name(&tool.id),
        title: tool.title.clone(),
        label: tool.label.clone(),
        description: tool.description.clone(),
        comment: tool.comment.clone(),
    };
    let uses_tools = facts
        .tool_usage
        .iter()
        .filter(|(from, _)| *from == tool.id)
        .filter_map(|(_, to)| known(tool_ids, to, "tool", &tool.id))
        .collect();

    ResolvedTool {
        id: tool.id.clone(),
        title: apply(&TOOL_TITLE, &tool.id, &sources),
        description: apply(&TOOL_DESCRIPTION, &tool.id, &sources),
        uses_tools,
    }
}

fn resolve_agent(
    facts: &RawFacts,
    tool_ids: &HashSet<&str>,
    agent_ids: &HashSet<&str>,
    agent: &RawAgent,
) -> ResolvedAgent {
    let goal = agent.goal.as_deref().and_then(|g| facts.goal(g));
    let sources = AgentSources {
        name: display_name(&agent.id),
        agent_id: agent.agent_id.clone(),
        role: agent.role.clone(),
        description: agent.description.clone(),
        goal_description: goal.and_then(|g| g.description.clone()),
        goal_title: goal.and_then(|g| g.title.clone().or_else(|| g.label.clone())),
        config_goal: facts.config(&agent.id, "goal").map(str::to_string),
        config_backstory: facts.config(&agent.id, "backstory").map(str::to_string),
    };

    // agentToolUsage supersedes the legacy usesTool links
    let links: Vec<_> = facts.agent_tools.iter().filter(|l| l.agent == agent.id).collect();
    let via = if links.iter().any(|l| l.via == ToolLink::Current) {
        ToolLink::Current
    } else {
        ToolLink::Legacy
    };
    let tools = links
        .iter()
        .filter(|l| l.via == via)
        .filter_map(|l| known(tool_ids, &l.tool, "tool", &agent.id))
        .collect();

    let interacts_with = facts
        .agent_interactions
        .iter()
        .filter(|(from, _)| *from == agent.id)
        .filter_map(|(_, to)| known(agent_ids, to, "agent", &agent.id))
        .collect();

    ResolvedAgent {
        id: agent.id.clone(),
        title: agent.title.clone().or_else(|| agent.label.clone()).unwrap_or_default(),
        role: apply(&AGENT_ROLE, &agent.id, &sources),
        goal: apply(&AGENT_GOAL, &agent.id, &sources),
        backstory: apply(&AGENT_BACKSTORY, &agent.id, &sources),
        tools,
        interacts_with,
    }
}

fn resolve_task(facts: &RawFacts, agent_ids: &HashSet<&str>, task: &RawTask) -> ResolvedTask {
    let attached: Vec<&RawPrompt> = facts
        .task_prompts
        .iter()
        .filter(|(t, _)| *t == task.id)
        .filter_map(|(_, p)| facts.prompt(p))
        .collect();

    let mut sources = TaskSources {
        name: display_name(&task.id),
        title: task.title.clone(),
        label: task.label.clone(),
        description: task.description.clone(),
        // first attached prompt carrying the field, not just the first prompt
        prompt_instruction: attached.iter().find_map(|p| p.instruction.clone()),
        prompt_output: attached.iter().find_map(|p| p.output_indicator.clone()),
        config_expected_output: facts.config(&task.id, "expected_output").map(str::to_string),
        resolved_title: String::new(),
    };
    let title = apply(&TASK_TITLE, &task.id, &sources);
    sources.resolved_title = title.clone();

    let performer = task.performed_by.as_deref().or_else(|| {
        facts
            .agent_tasks
            .iter()
            .find(|(_, t)| *t == task.id)
            .map(|(a, _)| a.as_str())
    });
    let agent = performer.and_then(|a| known(agent_ids, a, "agent", &task.id));

    let resources = |direction: Direction| -> Vec<String> {
        facts
            .task_resources
            .iter()
            .filter(|r| r.task == task.id && r.direction == direction)
            .map(|r| r.title.clone().unwrap_or_else(|| r.resource.clone()))
            .collect()
    };

    ResolvedTask {
        id: task.id.clone(),
        description: apply(&TASK_DESCRIPTION, &task.id, &sources),
        expected_output: apply(&TASK_EXPECTED_OUTPUT, &task.id, &sources),
        title,
        agent,
        prompts: attached
            .iter()
            .map(|p| fragment(p))
            .filter(|f| !f.is_empty())
            .collect(),
        required_resources: resources(Direction::Requires),
        produced_resources: resources(Direction::Produces),
    }
}

fn fragment(prompt: &RawPrompt) -> PromptFragment {
    PromptFragment {
        id: prompt.id.clone(),
        instruction: prompt.instruction.clone().unwrap_or_default(),
        input_data: prompt.input_data.clone().unwrap_or_default(),
        output_indicator: prompt.output_indicator.clone().unwrap_or_default(),
        context: prompt.context.clone().unwrap_or_default(),
    }
}

fn resolve_team(facts: &RawFacts, agent_ids: &HashSet<&str>, team: &RawTeam) -> ResolvedTeam {
    let members = facts
        .team_members
        .iter()
        .filter(|(t, _)| *t == team.id)
        .filter_map(|(_, a)| known(agent_ids, a, "agent", &team.id))
        .collect();

    // a goal may be a Goal entity or a bare literal objective
    let goals = facts
        .team_goals
        .iter()
        .filter(|(t, _)| *t == team.id)
        .filter_map(|(_, g)| match facts.goal(g) {
            Some(goal) => goal
                .description
                .clone()
                .or_else(|| goal.title.clone())
                .or_else(|| goal.label.clone()),
            None => Some(g.clone()),
        })
        .collect();

    ResolvedTeam {
        id: team.id.clone(),
        title: team
            .title
            .clone()
            .or_else(|| team.label.clone())
            .unwrap_or_else(|| display_name(&team.id)),
        description: team.description.clone().unwrap_or_default(),
        members,
        goals,
        workflow_pattern: team.workflow_pattern.as_deref().map(|p| local_segment(p).to_string()),
    }
}

fn known(ids: &HashSet<&str>, target: &str, kind: &str, from: &str) -> Option<String> {
    if ids.contains(target) {
        Some(target.to_string())
    } else {
        warn!(from, target, kind, "dropping reference to unknown {}", kind);
        None
    }
}
