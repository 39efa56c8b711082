//! End-to-end tests: graph documents on disk to generated CrewAI code.

use agentgen::batch::{self, Outcome};
use agentgen::config::AgentgenConfig;
use agentgen::pipeline::compile_file;
use agentgen_emit::{create_default_registry, Target};
use regex::Regex;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn compile(name: &str, target: Target) -> String {
    let registry = create_default_registry().unwrap();
    let emitter = registry.require(target).unwrap();
    compile_file(&fixture(name), emitter.as_ref())
        .unwrap()
        .to_display_string()
}

fn batch_config(input: &Path, output: &Path) -> AgentgenConfig {
    let mut config = AgentgenConfig::default();
    config.input.dir = input.to_path_buf();
    config.output.dir = output.to_path_buf();
    config
}

fn copy_fixture(name: &str, dest: &Path) {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::copy(fixture(name), dest).unwrap();
}

// ============================================================
// Single file
// ============================================================

#[test]
fn turtle_document_compiles_with_resolved_values() {
    let src = compile("trip_instances.ttl", Target::Crewai);

    assert!(src.contains("Source: AgentO knowledge graph (trip_instances)\n"));
    assert!(src.contains("Team: Trip Planning Crew\n"));
    assert!(src.contains("@tool('flight_search')\n"));
    assert!(src.contains("    goal='Draft a day-by-day itinerary',\n"));
    assert!(src.contains("    backstory='Has booked thousands of hotels.',\n"));
    assert!(src.contains("    expected_output='A markdown itinerary',\n    agent=planner,\n"));
    assert!(src.contains("    expected_output='Completed: Book hotel',\n    agent=booker,\n"));
    assert!(src.contains(
        "        agents=[planner, booker],\n        tasks=[plan_itinerary, book_hotel],\n"
    ));
}

#[test]
fn rdf_xml_document_compiles_through_the_fallback() {
    let src = compile("support_instances.rdf", Target::Crewai);
    assert!(src.contains("triage = Agent(\n    role='Triage Agent',\n"));
    assert!(src.contains("TASK: Classify ticket\n\nLabel the ticket by product area\n"));
}

#[test]
fn malformed_document_reports_both_parsers() {
    let registry = create_default_registry().unwrap();
    let emitter = registry.require(Target::Crewai).unwrap();
    let err = compile_file(&fixture("broken.ttl"), emitter.as_ref()).err().unwrap();
    assert_eq!(err.kind(), "parse");
    let msg = err.to_string();
    assert!(msg.contains("turtle:"));
    assert!(msg.contains("rdf/xml:"));
}

#[test]
fn compilation_is_idempotent_for_every_target() {
    for target in Target::ALL {
        assert_eq!(
            compile("trip_instances.ttl", target),
            compile("trip_instances.ttl", target),
            "{}",
            target
        );
    }
}

#[test]
fn inline_and_template_targets_agree() {
    let inline = compile("trip_instances.ttl", Target::Crewai);
    let rendered = compile("trip_instances.ttl", Target::CrewaiTemplate);

    let defs = Regex::new(r"(?m)^(\w+) = (Agent|Task)\(").unwrap();
    let names = |src: &str| -> Vec<String> {
        defs.captures_iter(src).map(|c| c[1].to_string()).collect()
    };
    assert_eq!(names(&inline), names(&rendered));
    assert_eq!(
        rendered.replace("Target: crewai-template", "Target: crewai"),
        inline
    );
}

// ============================================================
// Batch
// ============================================================

#[tokio::test]
async fn batch_survives_a_malformed_input() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    copy_fixture("trip_instances.ttl", &input.path().join("1_trip.ttl"));
    copy_fixture("broken.ttl", &input.path().join("2_broken.ttl"));
    copy_fixture("support_instances.rdf", &input.path().join("3_support.rdf"));

    let registry = create_default_registry().unwrap();
    let summary = batch::run(&batch_config(input.path(), output.path()), &registry)
        .await
        .unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded(), 2);
    let errors = summary.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0.ends_with("2_broken.ttl"));
    assert_eq!(errors[0].1.kind(), "parse");
    assert!(summary.to_string().ends_with("2/3 succeeded"));

    assert!(output.path().join("crewai_1_trip.py").is_file());
    assert!(output.path().join("crewai_3_support.py").is_file());
    assert!(!output.path().join("crewai_2_broken.py").exists());
}

#[tokio::test]
async fn batch_reports_in_input_order_with_many_workers() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..6 {
        copy_fixture("trip_instances.ttl", &input.path().join(format!("trip_{}.ttl", i)));
    }

    let mut config = batch_config(input.path(), output.path());
    config.batch.jobs = 4;
    let registry = create_default_registry().unwrap();
    let summary = batch::run(&config, &registry).await.unwrap();

    let order: Vec<_> = summary
        .reports
        .iter()
        .map(|r| r.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        order,
        ["trip_0.ttl", "trip_1.ttl", "trip_2.ttl", "trip_3.ttl", "trip_4.ttl", "trip_5.ttl"]
    );
    assert_eq!(summary.succeeded(), 6);
}

#[tokio::test]
async fn batch_prefixes_subdirectory_stems_and_writes_every_target() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    copy_fixture("trip_instances.ttl", &input.path().join("trip_instances.ttl"));
    copy_fixture("trip_instances.ttl", &input.path().join("europe").join("trip_instances.ttl"));

    let mut config = batch_config(input.path(), output.path());
    config.output.targets = vec![Target::Crewai, Target::CrewaiProject];
    let registry = create_default_registry().unwrap();
    let summary = batch::run(&config, &registry).await.unwrap();
    assert_eq!(summary.succeeded(), 2);

    assert!(output.path().join("crewai_trip_instances.py").is_file());
    assert!(output.path().join("crewai_europe_trip_instances.py").is_file());
    assert!(output.path().join("trip").join("config").join("agents.yaml").is_file());
    assert!(output.path().join("europe_trip").join("crew.py").is_file());
}

#[tokio::test]
async fn batch_skips_existing_outputs_unless_forced() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    copy_fixture("trip_instances.ttl", &input.path().join("trip.ttl"));
    let existing = output.path().join("crewai_trip.py");
    std::fs::write(&existing, "# hand edited\n").unwrap();

    let registry = create_default_registry().unwrap();
    let mut config = batch_config(input.path(), output.path());
    let summary = batch::run(&config, &registry).await.unwrap();
    assert!(matches!(summary.reports[0].result, Ok(Outcome::Skipped(_))));
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "# hand edited\n");

    config.batch.skip_existing = false;
    let summary = batch::run(&config, &registry).await.unwrap();
    assert!(matches!(summary.reports[0].result, Ok(Outcome::Generated(_))));
    assert!(std::fs::read_to_string(&existing).unwrap().contains("def main():"));
}

#[tokio::test]
async fn batch_without_input_directory_fails_setup() {
    let root = tempfile::tempdir().unwrap();
    let config = batch_config(&root.path().join("missing"), &root.path().join("out"));
    let registry = create_default_registry().unwrap();
    let err = batch::run(&config, &registry).await.err().unwrap();
    assert_eq!(err.kind(), "config");
}

fn agent_graph(name: &str) -> String {
    format!(
        "@prefix : <http://www.w3id.org/agentic-ai/onto#> .\n\
         <http://example.org/kg#{name}> a :LLMAgent ; :agentRole \"{name}\" .\n"
    )
}

fn agent_graph_xml(name: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n\
                  xmlns:ag=\"http://www.w3id.org/agentic-ai/onto#\">\n\
           <ag:LLMAgent rdf:about=\"http://example.org/kg#{name}\">\n\
             <ag:agentRole>{name}</ag:agentRole>\n\
           </ag:LLMAgent>\n\
         </rdf:RDF>\n"
    )
}

#[tokio::test]
async fn batch_keeps_extensions_when_stems_are_shared() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("a.ttl"), agent_graph("alpha")).unwrap();
    std::fs::write(input.path().join("a.rdf"), agent_graph_xml("beta")).unwrap();

    let mut config = batch_config(input.path(), output.path());
    config.batch.jobs = 2;
    let registry = create_default_registry().unwrap();
    let summary = batch::run(&config, &registry).await.unwrap();
    assert_eq!(summary.succeeded(), 2, "{}", summary);

    let ttl = std::fs::read_to_string(output.path().join("crewai_a_ttl.py")).unwrap();
    let rdf = std::fs::read_to_string(output.path().join("crewai_a_rdf.py")).unwrap();
    assert!(ttl.contains("alpha = Agent("));
    assert!(rdf.contains("beta = Agent("));
    assert!(!output.path().join("crewai_a.py").exists());
}

#[tokio::test]
async fn batch_fails_inputs_that_claim_the_same_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(input.path().join("travel")).unwrap();
    std::fs::write(input.path().join("travel").join("a.ttl"), agent_graph("alpha")).unwrap();
    std::fs::write(input.path().join("travel_a.ttl"), agent_graph("beta")).unwrap();
    std::fs::write(input.path().join("z.ttl"), agent_graph("gamma")).unwrap();

    let registry = create_default_registry().unwrap();
    let summary = batch::run(&batch_config(input.path(), output.path()), &registry)
        .await
        .unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.errors().len(), 2);
    assert!(summary.to_string().ends_with("1/3 succeeded"));
    assert!(!output.path().join("crewai_travel_a.py").exists());
    assert!(output.path().join("crewai_z.py").is_file());
}
