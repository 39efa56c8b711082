//! Tests for agentgen-graph: loading, query battery, fact extraction

use agentgen_graph::extract::{Direction, ToolLink};
use agentgen_graph::queries::BATTERY;
use agentgen_graph::*;
use std::path::PathBuf;

const EX: &str = "http://example.org/research#";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn research_facts() -> RawFacts {
    let graph = load(fixture("research_crew.ttl")).unwrap();
    extract(&graph).unwrap()
}

// ===========================================================================
// Loader
// ===========================================================================

#[test]
fn loads_turtle_fixture_from_disk() {
    let graph = load(fixture("research_crew.ttl")).unwrap();
    assert!(!graph.is_empty());
    assert_eq!(graph.rank(&ex("ResearchTeam")), Some(0));
}

#[test]
fn loads_rdf_xml_fixture_from_disk() {
    let graph = load(fixture("research_crew.rdf")).unwrap();
    let facts = extract(&graph).unwrap();
    assert_eq!(facts.agents.len(), 1);
    assert_eq!(facts.tools.len(), 1);
    assert_eq!(facts.tasks[0].performed_by.as_deref(), Some(ex("Researcher").as_str()));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("absent.ttl")).err().unwrap();
    assert_eq!(err.kind(), "io");
}

// ===========================================================================
// Query battery
// ===========================================================================

#[test]
fn every_query_runs_on_an_empty_graph() {
    let graph = load_str("", "empty.ttl").unwrap();
    assert!(graph.is_empty());
    for query in BATTERY {
        let rows = graph.select(query).unwrap();
        assert!(rows.is_empty(), "{} returned rows", query.name);
    }
}

#[test]
fn select_orders_rows_by_declaration() {
    let graph = load(fixture("research_crew.ttl")).unwrap();
    let rows = graph.select(&queries::TASKS).unwrap();
    let ids: Vec<_> = rows.iter().filter_map(|r| r.get("task")).collect();
    assert_eq!(ids[0], ex("WriteReport"));
    assert!(ids.iter().all(|id| *id == ex("WriteReport") || *id == ex("Research")));
}

// ===========================================================================
// Extraction
// ===========================================================================

#[test]
fn entities_follow_declaration_order() {
    let facts = research_facts();
    let agents: Vec<_> = facts.agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(agents, [ex("Researcher"), ex("Writer")]);
    let tasks: Vec<_> = facts.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(tasks, [ex("WriteReport"), ex("Research")]);
}

#[test]
fn llm_agents_are_never_tools() {
    let facts = research_facts();
    let tools: Vec<_> = facts.tools.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(tools, [ex("WebSearch"), ex("Scraper")]);
    assert!(facts.agent_tools.iter().all(|l| l.tool != ex("Writer")));
    assert!(facts.tool_usage.iter().all(|(_, other)| *other != ex("Writer")));
}

#[test]
fn agent_tool_links_record_predicate_generation() {
    let facts = research_facts();
    let links: Vec<_> = facts
        .agent_tools
        .iter()
        .map(|l| (l.tool.as_str(), l.via))
        .collect();
    assert_eq!(
        links,
        [
            (ex("WebSearch").as_str(), ToolLink::Current),
            (ex("Scraper").as_str(), ToolLink::Legacy),
        ]
    );
}

#[test]
fn duplicate_rows_keep_the_first() {
    let facts = research_facts();
    let research: Vec<_> = facts.tasks.iter().filter(|t| t.id == ex("Research")).collect();
    assert_eq!(research.len(), 1);
    assert_eq!(research[0].title.as_deref(), Some("Research"));
}

#[test]
fn literals_are_trimmed_and_blank_is_absent() {
    let facts = research_facts();
    let writer = facts.agents.iter().find(|a| a.id == ex("Writer")).unwrap();
    assert_eq!(writer.description.as_deref(), Some("Writes clear prose."));

    let prompt = facts.prompt(&ex("ResearchPrompt")).unwrap();
    assert_eq!(prompt.instruction.as_deref(), Some("Find X"));
    assert_eq!(prompt.context, None);
}

#[test]
fn goals_and_configs_are_collected() {
    let facts = research_facts();
    let researcher = &facts.agents[0];
    assert_eq!(researcher.agent_id.as_deref(), Some("researcher-01"));
    assert_eq!(researcher.goal.as_deref(), Some(ex("FindGoal").as_str()));
    assert_eq!(
        facts.goal(&ex("FindGoal")).unwrap().description.as_deref(),
        Some("Find primary sources")
    );
    assert_eq!(facts.config(&ex("Writer"), "goal"), Some("Write the report"));
    assert_eq!(facts.config(&ex("Writer"), "backstory"), None);
}

#[test]
fn relationships_are_collected() {
    let facts = research_facts();
    assert_eq!(facts.agent_tasks, [(ex("Researcher"), ex("Research"))]);
    assert_eq!(facts.task_prompts, [(ex("Research"), ex("ResearchPrompt"))]);
    assert_eq!(facts.agent_interactions, [(ex("Researcher"), ex("Writer"))]);
    assert_eq!(facts.tool_usage, [(ex("WebSearch"), ex("Scraper"))]);
    assert_eq!(
        facts.team_members,
        [(ex("ResearchTeam"), ex("Researcher")), (ex("ResearchTeam"), ex("Writer"))]
    );
    assert_eq!(facts.team_goals, [(ex("ResearchTeam"), ex("PublishGoal"))]);

    let produced = facts
        .task_resources
        .iter()
        .find(|r| r.direction == Direction::Produces)
        .unwrap();
    assert_eq!(produced.task, ex("WriteReport"));
    assert_eq!(produced.title.as_deref(), Some("report.md"));
}

#[test]
fn workflow_steps_carry_flags_and_ordinals() {
    let facts = research_facts();
    let step1 = facts.steps.iter().find(|s| s.id == ex("Step1")).unwrap();
    assert_eq!(step1.order.as_deref(), Some("1"));
    assert_eq!(step1.task.as_deref(), Some(ex("Research").as_str()));
    assert_eq!(step1.next.as_deref(), Some(ex("Step2").as_str()));
    assert!(step1.is_start);
    assert!(!step1.is_end);
}

#[test]
fn extraction_is_repeatable() {
    assert_eq!(research_facts(), research_facts());
}
