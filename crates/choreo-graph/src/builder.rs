//! Conversion between step lists and step graphs
//!
//! Steps arrive on the wire as a flat list with per-step successor name
//! lists. The builder turns that into a [`StepGraph`] for analysis, and
//! writes a validated (usually normalized) graph back onto the action,
//! regenerating successor lists and first-step names from the graph's
//! edges.

use crate::graph::StepGraph;
use choreo_types::{normalized, Action};
use std::collections::HashMap;

/// Errors from applying a graph back onto an action. The messages are
/// part of the external contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Graph is null.")]
    NullGraph,

    #[error("Action has no steps.")]
    NoSteps,

    #[error("Graph is incompatible with action.")]
    IncompatibleGraph,
}

/// Builds step graphs from actions and applies validated graphs back.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Converts an action's step list into a graph: one node per step,
    /// one edge per successor name. A missing action yields no graph.
    ///
    /// Successor names are resolved to the declared step-name spelling
    /// (trim- and case-insensitively); a successor that matches no step
    /// is kept verbatim, which [`apply_graph_to_action`]
    /// (Self::apply_graph_to_action) later reports as an incompatibility.
    pub fn build_from_action(&self, action: Option<&Action>) -> Option<StepGraph> {
        let action = action?;

        let mut graph = StepGraph::new();
        let mut canonical: HashMap<String, &str> = HashMap::new();
        for step in &action.steps {
            graph.add_node(step.name.clone());
            canonical.insert(normalized(&step.name), step.name.as_str());
        }

        for step in &action.steps {
            let Some(next_names) = &step.next_step_names else {
                continue;
            };
            for next in next_names {
                let target = canonical
                    .get(&normalized(next))
                    .copied()
                    .unwrap_or(next.as_str());
                graph.link(step.name.clone(), target);
            }
        }

        Some(graph)
    }

    /// Rewrites an action's successor lists and first-step names from a
    /// graph over the same step names.
    ///
    /// Returns `Ok(None)` for a missing action. Fails when the graph is
    /// missing, the action has no steps, or the graph's node set does not
    /// exactly match the action's step names.
    pub fn apply_graph_to_action(
        &self,
        graph: Option<&StepGraph>,
        action: Option<Action>,
    ) -> Result<Option<Action>, GraphError> {
        let Some(mut action) = action else {
            return Ok(None);
        };
        let graph = graph.ok_or(GraphError::NullGraph)?;

        if action.steps.is_empty() {
            return Err(GraphError::NoSteps);
        }

        if graph.len() != action.steps.len()
            || !action.steps.iter().all(|s| graph.contains(&s.name))
        {
            return Err(GraphError::IncompatibleGraph);
        }

        for step in &mut action.steps {
            // Node presence was just checked against the full step list.
            let node = graph.node(&step.name).ok_or(GraphError::IncompatibleGraph)?;
            step.next_step_names = if node.next().is_empty() {
                None
            } else {
                Some(node.next().iter().cloned().collect())
            };
        }
        action.first_step_names = graph.source_names();

        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreo_types::{ServiceRequirement, Step};

    fn step(name: &str, next: &[&str]) -> Step {
        let step = Step::new(name, ServiceRequirement::new("svc", Some(1), Some(2)));
        if next.is_empty() {
            step
        } else {
            step.with_next_steps(next.iter().map(|s| s.to_string()).collect())
        }
    }

    fn diamond_action() -> Action {
        Action {
            name: "deploy".into(),
            next_action_name: None,
            first_step_names: vec!["a".into()],
            steps: vec![
                step("a", &["b", "c"]),
                step("b", &["d"]),
                step("c", &["d"]),
                step("d", &[]),
            ],
        }
    }

    #[test]
    fn test_build_from_missing_action_is_none() {
        assert!(GraphBuilder::new().build_from_action(None).is_none());
    }

    #[test]
    fn test_build_diamond_edges() {
        let graph = GraphBuilder::new()
            .build_from_action(Some(&diamond_action()))
            .unwrap();
        assert_eq!(graph.len(), 4);
        let a = graph.node("a").unwrap();
        assert_eq!(a.next().iter().collect::<Vec<_>>(), vec!["b", "c"]);
        let d = graph.node("d").unwrap();
        assert_eq!(d.prev().iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(d.next().is_empty());
    }

    #[test]
    fn test_build_resolves_successor_spelling() {
        let mut action = diamond_action();
        action.steps[1].next_step_names = Some(vec![" D ".into()]);
        let graph = GraphBuilder::new().build_from_action(Some(&action)).unwrap();
        assert_eq!(graph.len(), 4);
        assert!(graph.node("b").unwrap().next().contains("d"));
    }

    #[test]
    fn test_apply_missing_action_is_ok_none() {
        let builder = GraphBuilder::new();
        let graph = builder.build_from_action(Some(&diamond_action()));
        assert_eq!(builder.apply_graph_to_action(graph.as_ref(), None), Ok(None));
    }

    #[test]
    fn test_apply_missing_graph_fails() {
        let result = GraphBuilder::new().apply_graph_to_action(None, Some(diamond_action()));
        assert_eq!(result, Err(GraphError::NullGraph));
        assert_eq!(GraphError::NullGraph.to_string(), "Graph is null.");
    }

    #[test]
    fn test_apply_to_action_without_steps_fails() {
        let builder = GraphBuilder::new();
        let graph = builder.build_from_action(Some(&diamond_action())).unwrap();
        let mut action = diamond_action();
        action.steps.clear();
        let result = builder.apply_graph_to_action(Some(&graph), Some(action));
        assert_eq!(result, Err(GraphError::NoSteps));
        assert_eq!(GraphError::NoSteps.to_string(), "Action has no steps.");
    }

    #[test]
    fn test_apply_with_mismatched_node_set_fails() {
        let builder = GraphBuilder::new();
        let mut graph = builder.build_from_action(Some(&diamond_action())).unwrap();
        graph.add_node("extra");
        let result = builder.apply_graph_to_action(Some(&graph), Some(diamond_action()));
        assert_eq!(result, Err(GraphError::IncompatibleGraph));
        assert_eq!(
            GraphError::IncompatibleGraph.to_string(),
            "Graph is incompatible with action."
        );
    }

    #[test]
    fn test_round_trip_reproduces_first_steps_and_is_idempotent() {
        let builder = GraphBuilder::new();
        let graph = builder.build_from_action(Some(&diamond_action())).unwrap();

        let applied = builder
            .apply_graph_to_action(Some(&graph), Some(diamond_action()))
            .unwrap()
            .unwrap();
        assert_eq!(applied.first_step_names, vec!["a".to_string()]);
        assert_eq!(
            applied.step("a").unwrap().next_step_names,
            Some(vec!["b".to_string(), "c".to_string()])
        );
        assert_eq!(applied.step("d").unwrap().next_step_names, None);

        // build -> apply -> build yields the same structural graph
        let rebuilt = builder.build_from_action(Some(&applied)).unwrap();
        assert_eq!(rebuilt, graph);
    }
}
