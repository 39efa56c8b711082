pub mod inline;
pub mod project;
pub mod template;

/// Names a generated single-file module defines or imports itself.
pub(crate) const MODULE_NAMES: &[&str] = &["Agent", "Crew", "Process", "Task", "tool", "main"];

/// Names a generated project's crew module and class define or import.
pub(crate) const PROJECT_NAMES: &[&str] = &[
    "Agent",
    "Crew",
    "Process",
    "Task",
    "tool",
    "CrewBase",
    "agent",
    "crew",
    "task",
    "agents",
    "tasks",
    "agents_config",
    "tasks_config",
];
