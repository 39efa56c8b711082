//! Fallback chains for optional fields.
//!
//! Each field is resolved by an ordered table of steps. The first step that
//! yields a non-empty value wins, and the winning step's name is reported with
//! the value. The final step of every chain is a default that always yields.

pub const DEFAULT_GOAL: &str = "Complete assigned tasks";
pub const DEFAULT_ROLE: &str = "LLM Agent";
pub const DEFAULT_TOOL_DESCRIPTION: &str = "CrewAI Tool";

/// One candidate source for a field.
pub struct Step<S: 'static> {
    pub name: &'static str,
    pub source: fn(&S) -> Option<String>,
}

/// A field's ordered candidate sources.
pub struct Chain<S: 'static> {
    pub field: &'static str,
    pub steps: &'static [Step<S>],
}

/// A resolved value and the step that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub step: &'static str,
}

impl<S: 'static> Chain<S> {
    pub fn resolve(&self, sources: &S) -> Resolved {
        for step in self.steps {
            if let Some(value) = (step.source)(sources).filter(|v| !v.trim().is_empty()) {
                return Resolved {
                    value,
                    step: step.name,
                };
            }
        }
        Resolved {
            value: String::new(),
            step: "none",
        }
    }
}

// ─── Agents ───

/// Candidate facts for one agent's text fields.
#[derive(Clone, Debug, Default)]
pub struct AgentSources {
    /// Preserve-case normalized identifier.
    pub name: String,
    pub agent_id: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub goal_description: Option<String>,
    pub goal_title: Option<String>,
    pub config_goal: Option<String>,
    pub config_backstory: Option<String>,
}

pub static AGENT_ROLE: Chain<AgentSources> = Chain {
    field: "agent.role",
    steps: &[
        Step { name: "role", source: |s| s.role.clone() },
        Step { name: "default", source: |_| Some(DEFAULT_ROLE.to_string()) },
    ],
};

pub static AGENT_GOAL: Chain<AgentSources> = Chain {
    field: "agent.goal",
    steps: &[
        Step { name: "goal description", source: |s| s.goal_description.clone() },
        Step { name: "goal title", source: |s| s.goal_title.clone() },
        Step { name: "config goal", source: |s| s.config_goal.clone() },
        Step { name: "role", source: |s| s.role.clone() },
        Step { name: "default", source: |_| Some(DEFAULT_GOAL.to_string()) },
    ],
};

pub static AGENT_BACKSTORY: Chain<AgentSources> = Chain {
    field: "agent.backstory",
    steps: &[
        Step { name: "description", source: |s| s.description.clone() },
        Step { name: "config backstory", source: |s| s.config_backstory.clone() },
        Step {
            name: "default",
            source: |s| {
                let id = s
                    .agent_id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or(&s.name);
                Some(format!("Agent: {}", id))
            },
        },
    ],
};

// ─── Tasks ───

#[derive(Clone, Debug, Default)]
pub struct TaskSources {
    pub name: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub prompt_instruction: Option<String>,
    pub prompt_output: Option<String>,
    pub config_expected_output: Option<String>,
    /// Output of [`TASK_TITLE`], filled in before the dependent chains run.
    pub resolved_title: String,
}

pub static TASK_TITLE: Chain<TaskSources> = Chain {
    field: "task.title",
    steps: &[
        Step { name: "title", source: |s| s.title.clone() },
        Step { name: "label", source: |s| s.label.clone() },
        Step { name: "identifier", source: |s| Some(s.name.clone()) },
    ],
};

pub static TASK_DESCRIPTION: Chain<TaskSources> = Chain {
    field: "task.description",
    steps: &[
        Step { name: "description", source: |s| s.description.clone() },
        Step { name: "prompt instruction", source: |s| s.prompt_instruction.clone() },
        Step { name: "title", source: |s| Some(s.resolved_title.clone()) },
    ],
};

pub static TASK_EXPECTED_OUTPUT: Chain<TaskSources> = Chain {
    field: "task.expected_output",
    steps: &[
        Step { name: "prompt output indicator", source: |s| s.prompt_output.clone() },
        Step { name: "config expected_output", source: |s| s.config_expected_output.clone() },
        Step {
            name: "default",
            source: |s| Some(format!("Completed: {}", s.resolved_title)),
        },
    ],
};

// ─── Tools ───

#[derive(Clone, Debug, Default)]
pub struct ToolSources {
    pub name: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
}

pub static TOOL_TITLE: Chain<ToolSources> = Chain {
    field: "tool.title",
    steps: &[
        Step { name: "title", source: |s| s.title.clone() },
        Step { name: "label", source: |s| s.label.clone() },
        Step { name: "identifier", source: |s| Some(s.name.clone()) },
    ],
};

pub static TOOL_DESCRIPTION: Chain<ToolSources> = Chain {
    field: "tool.description",
    steps: &[
        Step { name: "description", source: |s| s.description.clone() },
        Step { name: "comment", source: |s| s.comment.clone() },
        Step { name: "default", source: |_| Some(DEFAULT_TOOL_DESCRIPTION.to_string()) },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_present_step_wins() {
        let s = AgentSources {
            goal_title: Some("Publish".into()),
            config_goal: Some("from config".into()),
            role: Some("Writer".into()),
            ..Default::default()
        };
        let r = AGENT_GOAL.resolve(&s);
        assert_eq!(r.value, "Publish");
        assert_eq!(r.step, "goal title");
    }

    #[test]
    fn blank_values_fall_through() {
        let s = AgentSources {
            role: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(AGENT_ROLE.resolve(&s).value, DEFAULT_ROLE);
        assert_eq!(AGENT_GOAL.resolve(&s).step, "default");
    }

    #[test]
    fn backstory_prefers_agent_id_over_name() {
        let mut s = AgentSources {
            name: "Writer".into(),
            ..Default::default()
        };
        assert_eq!(AGENT_BACKSTORY.resolve(&s).value, "Agent: Writer");
        s.agent_id = Some("writer-7".into());
        assert_eq!(AGENT_BACKSTORY.resolve(&s).value, "Agent: writer-7");
    }

    #[test]
    fn tool_description_falls_back_to_comment_then_default() {
        let mut s = ToolSources {
            comment: Some("Fetches pages".into()),
            ..Default::default()
        };
        assert_eq!(TOOL_DESCRIPTION.resolve(&s).step, "comment");
        s.comment = None;
        assert_eq!(TOOL_DESCRIPTION.resolve(&s).value, DEFAULT_TOOL_DESCRIPTION);
    }

    #[test]
    fn every_chain_ends_in_a_step_that_always_yields() {
        assert_eq!(AGENT_ROLE.resolve(&AgentSources::default()).step, "default");
        assert_eq!(AGENT_GOAL.resolve(&AgentSources::default()).step, "default");
        assert_eq!(TOOL_DESCRIPTION.resolve(&ToolSources::default()).step, "default");
        let task = TaskSources {
            resolved_title: "Research".into(),
            ..Default::default()
        };
        assert_eq!(TASK_EXPECTED_OUTPUT.resolve(&task).value, "Completed: Research");
        assert_eq!(TASK_DESCRIPTION.resolve(&task).value, "Research");
    }
}
