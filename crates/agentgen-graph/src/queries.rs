//! The fixed query battery, written against the AgentO vocabulary.
//!
//! One query per entity kind and one per relationship kind. `order_by` lists
//! the variables whose declaration rank orders the rows.

/// AgentO namespace.
pub const AGENTO: &str = "http://www.w3id.org/agentic-ai/onto#";

macro_rules! sparql {
    ($body:literal) => {
        concat!(
            "PREFIX : <http://www.w3id.org/agentic-ai/onto#>\n",
            "PREFIX dcterms: <http://purl.org/dc/terms/>\n",
            "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n",
            $body
        )
    };
}

#[derive(Debug)]
pub struct Query {
    pub name: &'static str,
    pub sparql: &'static str,
    pub order_by: &'static [&'static str],
}

// ─── Entities ───

/// Plain tools. `LLMAgent` specializes `Tool` and is excluded here.
pub const TOOLS: Query = Query {
    name: "tools",
    sparql: sparql!(
        "SELECT ?tool ?title ?label ?desc ?comment WHERE {
            ?tool a :Tool .
            FILTER NOT EXISTS { ?tool a :LLMAgent }
            OPTIONAL { ?tool dcterms:title ?title }
            OPTIONAL { ?tool rdfs:label ?label }
            OPTIONAL { ?tool dcterms:description ?desc }
            OPTIONAL { ?tool rdfs:comment ?comment }
        }"
    ),
    order_by: &["tool"],
};

pub const AGENTS: Query = Query {
    name: "agents",
    sparql: sparql!(
        "SELECT ?agent ?agentID ?role ?desc ?title ?label ?agentGoal ?generalGoal WHERE {
            ?agent a :LLMAgent .
            OPTIONAL { ?agent :agentID ?agentID }
            OPTIONAL { ?agent :agentRole ?role }
            OPTIONAL { ?agent dcterms:description ?desc }
            OPTIONAL { ?agent dcterms:title ?title }
            OPTIONAL { ?agent rdfs:label ?label }
            OPTIONAL { ?agent :hasAgentGoal ?agentGoal }
            OPTIONAL { ?agent :hasGoal ?generalGoal }
        }"
    ),
    order_by: &["agent", "agentGoal", "generalGoal"],
};

pub const TASKS: Query = Query {
    name: "tasks",
    sparql: sparql!(
        "SELECT ?task ?title ?label ?desc ?agent WHERE {
            ?task a :Task .
            OPTIONAL { ?task dcterms:title ?title }
            OPTIONAL { ?task rdfs:label ?label }
            OPTIONAL { ?task dcterms:description ?desc }
            OPTIONAL { ?task :performedByAgent ?agent }
        }"
    ),
    order_by: &["task", "agent"],
};

/// Declared goals and anything used as a goal or objective.
pub const GOALS: Query = Query {
    name: "goals",
    sparql: sparql!(
        "SELECT ?goal ?title ?label ?desc WHERE {
            { ?goal a :Goal }
            UNION { ?owner :hasAgentGoal ?goal }
            UNION { ?owner :hasGoal ?goal }
            UNION { ?owner :hasTeamGoal ?goal }
            UNION { ?owner :hasObjective ?goal }
            FILTER (!isLiteral(?goal))
            OPTIONAL { ?goal dcterms:title ?title }
            OPTIONAL { ?goal rdfs:label ?label }
            OPTIONAL { ?goal dcterms:description ?desc }
        }"
    ),
    order_by: &["goal"],
};

pub const PROMPTS: Query = Query {
    name: "prompts",
    sparql: sparql!(
        "SELECT ?prompt ?instruction ?inputData ?outputIndicator ?context WHERE {
            ?prompt a :Prompt .
            OPTIONAL { ?prompt :promptInstruction ?instruction }
            OPTIONAL { ?prompt :promptInputData ?inputData }
            OPTIONAL { ?prompt :promptOutputIndicator ?outputIndicator }
            OPTIONAL { ?prompt :promptContext ?context }
        }"
    ),
    order_by: &["prompt"],
};

pub const TEAMS: Query = Query {
    name: "teams",
    sparql: sparql!(
        "SELECT ?team ?title ?label ?desc ?pattern WHERE {
            ?team a :Team .
            OPTIONAL { ?team dcterms:title ?title }
            OPTIONAL { ?team rdfs:label ?label }
            OPTIONAL { ?team dcterms:description ?desc }
            OPTIONAL { ?team :hasWorkflowPattern ?pattern }
        }"
    ),
    order_by: &["team", "pattern"],
};

/// Workflow steps, including the start/end specializations.
pub const WORKFLOW_STEPS: Query = Query {
    name: "workflow_steps",
    sparql: sparql!(
        "SELECT ?step ?order ?task ?next ?isStart ?isEnd WHERE {
            VALUES ?stepType { :WorkflowStep :StartStep :EndStep }
            ?step a ?stepType .
            OPTIONAL { ?step :stepOrder ?order }
            OPTIONAL { ?step :hasAssociatedTask ?task }
            OPTIONAL { ?step :nextStep ?next }
            BIND (EXISTS { ?step a :StartStep } AS ?isStart)
            BIND (EXISTS { ?step a :EndStep } AS ?isEnd)
        }"
    ),
    order_by: &["step", "task"],
};

// ─── Relationships ───

/// Agent → tool. `agentToolUsage` is current; `usesTool` is the legacy name.
pub const AGENT_TOOLS: Query = Query {
    name: "agent_tools",
    sparql: sparql!(
        "SELECT ?agent ?tool ?via WHERE {
            ?agent a :LLMAgent .
            { ?agent :agentToolUsage ?tool . BIND (\"current\" AS ?via) }
            UNION
            { ?agent :usesTool ?tool . BIND (\"legacy\" AS ?via) }
            ?tool a :Tool .
            FILTER NOT EXISTS { ?tool a :LLMAgent }
        }"
    ),
    order_by: &["agent", "tool"],
};

pub const AGENT_INTERACTIONS: Query = Query {
    name: "agent_interactions",
    sparql: sparql!(
        "SELECT ?agent ?other WHERE {
            ?agent a :LLMAgent ;
                   :interactsWith ?other .
        }"
    ),
    order_by: &["agent", "other"],
};

/// Agent → task, for graphs that link from the agent side.
pub const AGENT_TASKS: Query = Query {
    name: "agent_tasks",
    sparql: sparql!(
        "SELECT ?agent ?task WHERE {
            ?agent a :LLMAgent .
            { ?agent :hasTask ?task } UNION { ?agent :performsTask ?task }
            ?task a :Task .
        }"
    ),
    order_by: &["task", "agent"],
};

pub const TASK_PROMPTS: Query = Query {
    name: "task_prompts",
    sparql: sparql!(
        "SELECT ?task ?prompt WHERE {
            ?task a :Task .
            { ?task :taskPrompt ?prompt } UNION { ?task :hasPrompt ?prompt }
            ?prompt a :Prompt .
        }"
    ),
    order_by: &["task", "prompt"],
};

pub const TASK_RESOURCES: Query = Query {
    name: "task_resources",
    sparql: sparql!(
        "SELECT ?task ?resource ?direction ?title WHERE {
            ?task a :Task .
            { ?task :requiresResource ?resource . BIND (\"requires\" AS ?direction) }
            UNION
            { ?task :producedResource ?resource . BIND (\"produces\" AS ?direction) }
            OPTIONAL { ?resource dcterms:title ?title }
        }"
    ),
    order_by: &["task", "resource"],
};

pub const TOOL_USAGE: Query = Query {
    name: "tool_usage",
    sparql: sparql!(
        "SELECT ?tool ?other WHERE {
            ?tool a :Tool ;
                  :toolUsage ?other .
            ?other a :Tool .
            FILTER NOT EXISTS { ?tool a :LLMAgent }
            FILTER NOT EXISTS { ?other a :LLMAgent }
        }"
    ),
    order_by: &["tool", "other"],
};

pub const TEAM_MEMBERS: Query = Query {
    name: "team_members",
    sparql: sparql!(
        "SELECT ?team ?agent WHERE {
            ?team a :Team ;
                  :hasAgentMember ?agent .
        }"
    ),
    order_by: &["team", "agent"],
};

pub const TEAM_GOALS: Query = Query {
    name: "team_goals",
    sparql: sparql!(
        "SELECT ?team ?goal WHERE {
            ?team a :Team .
            { ?team :hasTeamGoal ?goal } UNION { ?team :hasObjective ?goal }
        }"
    ),
    order_by: &["team", "goal"],
};

/// Fallback values attached through `hasAgentConfig` (agents and tasks alike).
pub const CONFIG_VALUES: Query = Query {
    name: "config_values",
    sparql: sparql!(
        "SELECT ?owner ?config ?key ?value WHERE {
            ?owner :hasAgentConfig ?config .
            ?config :configKey ?key ;
                    :configValue ?value .
            FILTER (STR(?key) IN (\"goal\", \"backstory\", \"expected_output\"))
        }"
    ),
    order_by: &["owner", "config"],
};

/// Every query, in execution order.
pub const BATTERY: &[&Query] = &[
    &TOOLS,
    &AGENTS,
    &TASKS,
    &GOALS,
    &PROMPTS,
    &TEAMS,
    &WORKFLOW_STEPS,
    &AGENT_TOOLS,
    &AGENT_INTERACTIONS,
    &AGENT_TASKS,
    &TASK_PROMPTS,
    &TASK_RESOURCES,
    &TOOL_USAGE,
    &TEAM_MEMBERS,
    &TEAM_GOALS,
    &CONFIG_VALUES,
];
