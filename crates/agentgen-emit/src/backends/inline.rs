//! Inline backend: assembles a CrewAI module with plain string building.

use super::MODULE_NAMES;
use crate::literal::{py_block, py_str};
use crate::model::EmitModel;
use crate::registry::{Artifact, Emitter, Target};
use agentgen_core::{Ir, Result};
use std::fmt::Write;

const RULE: &str = "# ===========================================================";

pub struct InlineEmitter;

impl Emitter for InlineEmitter {
    fn target(&self) -> Target {
        Target::Crewai
    }

    fn emit(&self, ir: &Ir, stem: &str) -> Result<Artifact> {
        let model = EmitModel::build(ir, stem, self.target().case(), MODULE_NAMES)?;
        Ok(Artifact::File(render(&model, self.target())?))
    }
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "{}\n# {}\n{}\n\n", RULE, title, RULE);
}

fn render(model: &EmitModel, target: Target) -> Result<String> {
    let mut out = String::new();
    let header = format!("\n{}\n", model.header(target.as_str()));
    let _ = write!(out, "{}\n\n", py_block(&header)?);
    out.push_str("from crewai import Agent, Crew, Process, Task\n");
    out.push_str("from crewai.tools import tool\n\n");

    section(&mut out, "Tools");
    for t in &model.tools {
        let _ = write!(
            out,
            "@tool('{name}')\n\
             def {name}(query: str) -> str:\n    \
             {doc}\n    \
             return f\"[Tool stub: {name}] Executed with input: {{query}}\"\n\n\n",
            name = t.name,
            doc = py_str(&t.description)?,
        );
    }

    section(&mut out, "Agents");
    for a in &model.agents {
        let _ = writeln!(out, "{} = Agent(", a.name);
        let _ = writeln!(out, "    role={},", py_str(&a.role)?);
        let _ = writeln!(out, "    goal={},", py_str(&a.goal)?);
        let _ = writeln!(out, "    backstory={},", py_str(&a.backstory)?);
        let _ = writeln!(out, "    tools=[{}],", a.tools.join(", "));
        if a.allow_delegation {
            out.push_str("    allow_delegation=True,\n");
        }
        out.push_str("    verbose=True,\n)\n\n");
    }

    section(&mut out, "Tasks (execution order)");
    for t in &model.tasks {
        let _ = writeln!(out, "{} = Task(", t.name);
        let _ = writeln!(out, "    description={},", py_str(&t.description)?);
        let _ = writeln!(out, "    expected_output={},", py_str(&t.expected_output)?);
        if let Some(agent) = &t.agent {
            let _ = writeln!(out, "    agent={},", agent);
        }
        out.push_str(")\n\n");
    }

    section(&mut out, "Crew");
    let agents: Vec<_> = model.agents.iter().map(|a| a.name.as_str()).collect();
    let tasks: Vec<_> = model.tasks.iter().map(|t| t.name.as_str()).collect();
    out.push_str("def main():\n");
    out.push_str("    crew = Crew(\n");
    let _ = writeln!(out, "        agents=[{}],", agents.join(", "));
    let _ = writeln!(out, "        tasks=[{}],", tasks.join(", "));
    out.push_str("        process=Process.sequential,\n");
    out.push_str("        verbose=True,\n");
    out.push_str("    )\n");
    out.push_str("    result = crew.kickoff()\n");
    out.push_str("    print(result)\n\n\n");
    out.push_str("if __name__ == \"__main__\":\n");
    out.push_str("    main()\n");
    Ok(out)
}
