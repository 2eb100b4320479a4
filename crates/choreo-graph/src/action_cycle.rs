//! Action chain cycle detection
//!
//! Each action names at most one successor, so the action-level relation
//! is a functional graph and detection reduces to linked-structure cycle
//! detection: walk from every unvisited action, marking the walk
//! in-progress; revisiting an in-progress action means a cycle. Actions
//! proven cycle-free are marked done and short-circuit later walks, so
//! the whole check is O(number of actions).

use choreo_types::{normalized, Plan};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Detects cyclic `next_action_name` references in a plan.
#[derive(Debug, Clone, Default)]
pub struct ActionCycleDetector;

impl ActionCycleDetector {
    pub fn new() -> Self {
        Self
    }

    /// True if the action chain contains a self-loop or a longer cycle.
    /// Names are matched trim- and case-insensitively; a successor naming
    /// no existing action simply terminates that walk.
    pub fn has_circle(&self, plan: &Plan) -> bool {
        let mut marks: HashMap<String, Mark> = HashMap::new();

        for action in &plan.actions {
            let mut walk = Vec::new();
            let mut current = Some(normalized(&action.name));

            while let Some(key) = current {
                match marks.get(&key) {
                    Some(Mark::Done) => break,
                    Some(Mark::Visiting) => return true,
                    None => {}
                }
                marks.insert(key.clone(), Mark::Visiting);

                current = plan
                    .action(&key)
                    .and_then(|a| a.next_action_name.as_deref())
                    .map(normalized);
                walk.push(key);
            }

            for key in walk {
                marks.insert(key, Mark::Done);
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreo_types::{Action, ServiceRequirement, Step};

    fn action(name: &str, next: Option<&str>) -> Action {
        Action {
            name: name.into(),
            next_action_name: next.map(Into::into),
            first_step_names: vec!["s".into()],
            steps: vec![Step::new("s", ServiceRequirement::new("svc", None, None))],
        }
    }

    fn plan(actions: Vec<Action>) -> Plan {
        Plan {
            name: "p".into(),
            first_action_name: actions[0].name.clone(),
            actions,
        }
    }

    #[test]
    fn test_single_terminal_action_has_no_circle() {
        let plan = plan(vec![action("only", None)]);
        assert!(!ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_acyclic_chain_has_no_circle() {
        let plan = plan(vec![
            action("a", Some("b")),
            action("b", Some("c")),
            action("c", None),
        ]);
        assert!(!ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_self_reference_is_a_circle() {
        let plan = plan(vec![action("a", Some("a"))]);
        assert!(ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_two_action_cycle_is_detected() {
        let plan = plan(vec![action("a", Some("b")), action("b", Some("a"))]);
        assert!(ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_cycle_reached_from_a_tail_is_detected() {
        // c -> a -> b -> a
        let plan = plan(vec![
            action("c", Some("a")),
            action("a", Some("b")),
            action("b", Some("a")),
        ]);
        assert!(ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_case_and_trim_folding_in_references() {
        let plan = plan(vec![action("Build", Some(" BUILD "))]);
        assert!(ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_reference_to_missing_action_terminates_walk() {
        let plan = plan(vec![action("a", Some("ghost"))]);
        assert!(!ActionCycleDetector::new().has_circle(&plan));
    }

    #[test]
    fn test_shared_acyclic_suffix_short_circuits() {
        let plan = plan(vec![
            action("a", Some("c")),
            action("b", Some("c")),
            action("c", None),
        ]);
        assert!(!ActionCycleDetector::new().has_circle(&plan));
    }
}
