//! Project backend: a CrewAI project directory.
//!
//! Agent and task text goes to `config/agents.yaml` and `config/tasks.yaml`;
//! `crew.py` wires them to tools and `main.py` kicks the crew off.

use super::PROJECT_NAMES;
use crate::model::{AgentView, EmitModel, TaskView};
use crate::registry::{Artifact, Emitter, GeneratedFile, Target};
use crate::templates::{self, CREW_TEMPLATE, MAIN_TEMPLATE};
use agentgen_core::{Error, Ir, Result};
use minijinja::Environment;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

pub struct ProjectEmitter {
    env: Environment<'static>,
}

impl ProjectEmitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: templates::environment()?,
        })
    }
}

#[derive(Serialize)]
struct AgentConfig<'a> {
    role: &'a str,
    goal: &'a str,
    backstory: &'a str,
}

#[derive(Serialize)]
struct TaskConfig<'a> {
    description: &'a str,
    expected_output: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent: Option<&'a str>,
}

impl<'a> From<&'a AgentView> for AgentConfig<'a> {
    fn from(a: &'a AgentView) -> Self {
        Self {
            role: &a.role,
            goal: &a.goal,
            backstory: &a.backstory,
        }
    }
}

impl<'a> From<&'a TaskView> for TaskConfig<'a> {
    fn from(t: &'a TaskView) -> Self {
        Self {
            description: &t.description,
            expected_output: &t.expected_output,
            agent: t.agent.as_deref(),
        }
    }
}

/// Mapping keyed by name, in model order.
fn keyed_yaml<S: Serialize>(entries: impl IntoIterator<Item = (String, S)>) -> Result<String> {
    let mut map = Mapping::new();
    for (name, entry) in entries {
        let value = serde_yaml::to_value(entry).map_err(yaml_error)?;
        map.insert(Value::String(name), value);
    }
    serde_yaml::to_string(&map).map_err(yaml_error)
}

fn yaml_error(e: serde_yaml::Error) -> Error {
    Error::emission(format!("yaml: {}", e))
}

impl Emitter for ProjectEmitter {
    fn target(&self) -> Target {
        Target::CrewaiProject
    }

    fn emit(&self, ir: &Ir, stem: &str) -> Result<Artifact> {
        let target = self.target();
        let model = EmitModel::build(ir, stem, target.case(), PROJECT_NAMES)?;

        let agents = keyed_yaml(
            model.agents.iter().map(|a| (a.name.clone(), AgentConfig::from(a))),
        )?;
        let tasks = keyed_yaml(
            model.tasks.iter().map(|t| (t.name.clone(), TaskConfig::from(t))),
        )?;
        let crew = templates::render(&self.env, CREW_TEMPLATE, &model, target.as_str())?;
        let main = templates::render(&self.env, MAIN_TEMPLATE, &model, target.as_str())?;

        Ok(Artifact::Project(vec![
            GeneratedFile {
                path: PathBuf::from("config/agents.yaml"),
                contents: agents,
            },
            GeneratedFile {
                path: PathBuf::from("config/tasks.yaml"),
                contents: tasks,
            },
            GeneratedFile {
                path: PathBuf::from("crew.py"),
                contents: crew,
            },
            GeneratedFile {
                path: PathBuf::from("main.py"),
                contents: main,
            },
        ]))
    }
}
