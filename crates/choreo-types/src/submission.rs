//! Submission wire shapes
//!
//! The submission types mirror the canonical plan types but keep `Option`
//! wherever the wire permits null, including inside lists. The validator's
//! contract distinguishes "Action is null." from "Action name is null or
//! blank.", so the distinction must survive deserialization.

use serde::{Deserialize, Serialize};

/// A submitted service requirement, all fields nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequirementSubmission {
    #[serde(default)]
    pub service_definition: Option<String>,
    #[serde(default)]
    pub min_version: Option<i32>,
    #[serde(default)]
    pub max_version: Option<i32>,
}

/// A submitted step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub next_step_names: Option<Vec<String>>,
    #[serde(default)]
    pub service_requirement: Option<ServiceRequirementSubmission>,
}

/// A submitted action. List entries are themselves nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub next_action_name: Option<String>,
    #[serde(default)]
    pub first_step_names: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub steps: Option<Vec<Option<StepSubmission>>>,
}

/// A submitted plan, as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_action_name: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<Option<ActionSubmission>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_fields_deserialize_to_none() {
        let submission: PlanSubmission = serde_json::from_str(
            r#"{"name": null, "firstActionName": "a", "actions": [null]}"#,
        )
        .unwrap();
        assert!(submission.name.is_none());
        assert_eq!(submission.first_action_name.as_deref(), Some("a"));
        assert_eq!(submission.actions, Some(vec![None]));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let submission: StepSubmission = serde_json::from_str(r#"{"name": "s1"}"#).unwrap();
        assert!(submission.next_step_names.is_none());
        assert!(submission.service_requirement.is_none());
    }
}
