//! Canonical plan, action, and step types
//!
//! These are the shapes produced by validation: every referenced name
//! exists, action and step names are unique, and all graphs are acyclic.

use crate::name::names_match;
use serde::{Deserialize, Serialize};

/// The service capability a step requires from its executor.
///
/// Versions are integers on the wire; an absent bound means "unbounded"
/// on that side. When both bounds are present, `min_version <=
/// max_version` holds for validated plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequirement {
    /// Name of the required service definition (never blank once
    /// validated).
    pub service_definition: String,

    /// Inclusive minimum acceptable service version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<i32>,

    /// Inclusive maximum acceptable service version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<i32>,
}

impl ServiceRequirement {
    /// Creates a requirement with an optional version range.
    pub fn new(
        service_definition: impl Into<String>,
        min_version: Option<i32>,
        max_version: Option<i32>,
    ) -> Self {
        Self {
            service_definition: service_definition.into(),
            min_version,
            max_version,
        }
    }
}

/// The smallest unit of work: one service invocation within an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Step name, unique within its action.
    pub name: String,

    /// Names of the steps that run after this one. `None` marks a
    /// terminal step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_names: Option<Vec<String>>,

    /// The service capability this step requires.
    pub service_requirement: ServiceRequirement,
}

impl Step {
    /// Creates a terminal step with the given requirement.
    pub fn new(name: impl Into<String>, service_requirement: ServiceRequirement) -> Self {
        Self {
            name: name.into(),
            next_step_names: None,
            service_requirement,
        }
    }

    /// Sets the successor step names.
    pub fn with_next_steps(mut self, names: Vec<String>) -> Self {
        self.next_step_names = Some(names);
        self
    }
}

/// A named unit of work: a DAG of steps, optionally chained to one
/// successor action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action name, unique within its plan.
    pub name: String,

    /// The single successor action, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action_name: Option<String>,

    /// Entry points into this action's step graph.
    pub first_step_names: Vec<String>,

    /// All steps of this action.
    pub steps: Vec<Step>,
}

impl Action {
    /// Looks up a step by name (trim- and case-insensitive).
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| names_match(&s.name, name))
    }

    /// Returns the names of all steps, in declaration order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A named workflow: an ordered chain of actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Plan name (never blank once validated).
    pub name: String,

    /// The action the plan starts with.
    pub first_action_name: String,

    /// All actions of the plan.
    pub actions: Vec<Action>,
}

impl Plan {
    /// Looks up an action by name (trim- and case-insensitive).
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| names_match(&a.name, name))
    }

    /// Flattens every action's steps into one list, preserving action
    /// order and per-action step order.
    pub fn all_steps(&self) -> Vec<&Step> {
        self.actions.iter().flat_map(|a| a.steps.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan {
            name: "rollout".into(),
            first_action_name: "build".into(),
            actions: vec![Action {
                name: "build".into(),
                next_action_name: None,
                first_step_names: vec!["compile".into()],
                steps: vec![
                    Step::new("compile", ServiceRequirement::new("compiler", Some(1), Some(3)))
                        .with_next_steps(vec!["package".into()]),
                    Step::new("package", ServiceRequirement::new("packager", None, None)),
                ],
            }],
        }
    }

    #[test]
    fn test_lookup_is_case_and_trim_insensitive() {
        let plan = sample_plan();
        assert!(plan.action(" BUILD ").is_some());
        let action = plan.action("build").unwrap();
        assert!(action.step("Compile").is_some());
        assert!(action.step("missing").is_none());
    }

    #[test]
    fn test_all_steps_preserves_order() {
        let plan = sample_plan();
        let names: Vec<_> = plan.all_steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["compile", "package"]);
    }

    #[test]
    fn test_wire_fields_are_camel_case() {
        let json = serde_json::to_value(sample_plan()).unwrap();
        assert!(json.get("firstActionName").is_some());
        let step = &json["actions"][0]["steps"][0];
        assert!(step.get("nextStepNames").is_some());
        assert!(step["serviceRequirement"].get("serviceDefinition").is_some());
        assert_eq!(step["serviceRequirement"]["minVersion"], 1);
    }

    #[test]
    fn test_terminal_step_omits_next_list() {
        let plan = sample_plan();
        let json = serde_json::to_value(&plan.actions[0].steps[1]).unwrap();
        assert!(json.get("nextStepNames").is_none());
    }

    #[test]
    fn test_round_trip() {
        let plan = sample_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, back);
    }
}
