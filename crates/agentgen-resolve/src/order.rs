//! Task execution order from workflow steps.

use agentgen_graph::extract::RawStep;
use std::collections::HashSet;
use tracing::warn;

/// Step ordinal; missing or unparseable ordinals count as 0.
pub fn ordinal(step: &RawStep) -> i64 {
    let Some(raw) = step.order.as_deref() else {
        return 0;
    };
    if let Ok(n) = raw.parse::<i64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => {
            warn!(step = %step.id, order = raw, "unparseable step ordinal, using 0");
            0
        }
    }
}

/// Order `tasks` (given in declaration order) by the steps that reference them.
///
/// Steps pointing at known tasks are sorted by ordinal, ties keeping input
/// order; a task reached by several steps keeps its first position. Tasks no
/// step covers follow in declaration order. Returns indices into `tasks`.
pub fn execution_order(tasks: &[&str], steps: &[RawStep]) -> Vec<usize> {
    let mut sequenced: Vec<(i64, usize)> = steps
        .iter()
        .filter_map(|step| {
            let task = step.task.as_deref()?;
            let index = tasks.iter().position(|t| *t == task)?;
            Some((ordinal(step), index))
        })
        .collect();
    // stable: equal ordinals keep step order
    sequenced.sort_by_key(|(ordinal, _)| *ordinal);

    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(tasks.len());
    for (_, index) in sequenced {
        if seen.insert(index) {
            order.push(index);
        }
    }
    for index in 0..tasks.len() {
        if seen.insert(index) {
            order.push(index);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, order: Option<&str>, task: Option<&str>) -> RawStep {
        RawStep {
            id: id.into(),
            order: order.map(str::to_string),
            task: task.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn sorts_by_ordinal() {
        let tasks = ["C", "A", "B"];
        let steps = [
            step("s1", Some("3"), Some("C")),
            step("s2", Some("1"), Some("A")),
            step("s3", Some("2"), Some("B")),
        ];
        let order: Vec<_> = execution_order(&tasks, &steps).into_iter().map(|i| tasks[i]).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn no_steps_keeps_declaration_order() {
        let tasks = ["C", "A", "B"];
        assert_eq!(execution_order(&tasks, &[]), [0, 1, 2]);
    }

    #[test]
    fn ties_keep_step_order_and_duplicates_keep_first_position() {
        let tasks = ["A", "B"];
        let steps = [
            step("s1", Some("1"), Some("B")),
            step("s2", Some("1"), Some("A")),
            step("s3", Some("5"), Some("B")),
        ];
        assert_eq!(execution_order(&tasks, &steps), [1, 0]);
    }

    #[test]
    fn uncovered_and_unknown_tasks() {
        let tasks = ["A", "B", "C"];
        let steps = [
            step("s1", Some("2"), Some("C")),
            step("s2", Some("1"), Some("Ghost")),
            step("s3", Some("0"), None),
        ];
        assert_eq!(execution_order(&tasks, &steps), [2, 0, 1]);
    }

    #[test]
    fn ordinal_parsing() {
        assert_eq!(ordinal(&step("s", None, None)), 0);
        assert_eq!(ordinal(&step("s", Some("-4"), None)), -4);
        assert_eq!(ordinal(&step("s", Some("2.9"), None)), 2);
        assert_eq!(ordinal(&step("s", Some("first"), None)), 0);
    }
}
