//! Run-request wire contract and execution-side types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered capability provider able to run a step's service
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executor {
    /// Unique executor identifier.
    pub id: Uuid,
    /// Human-readable executor name.
    pub name: String,
    /// Network address the executor is reachable at.
    pub address: String,
}

impl Executor {
    /// Creates an executor with a fresh identifier.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// A service instance discovered through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    /// Provider service name.
    pub name: String,
    /// Provider host address.
    pub address: String,
    /// Provider port.
    pub port: u16,
}

/// One registry answer per queried requirement, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Providers matching the requirement; empty means none found.
    pub providers: Vec<ServiceProvider>,
}

/// A request to run a stored plan, including the caller's notification
/// callback coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPlanRequest {
    /// Identifier of the stored plan to run.
    pub plan_id: i64,

    /// Callback protocol ("HTTP" or "HTTPS").
    #[serde(default)]
    pub notify_protocol: Option<String>,

    /// Callback host address.
    #[serde(default)]
    pub notify_address: Option<String>,

    /// Callback TCP port.
    pub notify_port: i32,

    /// Callback path; a null or blank path is defaulted to "" when the
    /// request is rejected.
    #[serde(default)]
    pub notify_path: Option<String>,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// The plan was rejected before dispatch.
    Aborted,
    /// Every step resolved an executor and a provider.
    Admitted,
}

/// Response returned when a run request is rejected (or, for callers that
/// want an explicit record, admitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPlanResponse {
    /// The plan the response refers to; `None` when the request itself
    /// was null.
    pub plan_id: Option<i64>,

    /// Admission outcome.
    pub status: ExecutionStatus,

    /// Literal, stable error messages in the order the checks ran.
    pub error_messages: Vec<String>,
}

impl RunPlanResponse {
    /// Creates an aborted response carrying the given messages.
    pub fn aborted(plan_id: Option<i64>, error_messages: Vec<String>) -> Self {
        Self {
            plan_id,
            status: ExecutionStatus::Aborted,
            error_messages,
        }
    }
}
