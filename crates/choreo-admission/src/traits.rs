//! Collaborator traits consumed by the admission checker
//!
//! Each collaborator is a narrow trait so the checker depends only on
//! the capability it needs. Production backends (persistent stores, a
//! real registry client) implement the same traits as the in-memory
//! doubles in [`crate::memory`].

use async_trait::async_trait;
use choreo_types::{Executor, Plan, QueryResult, ServiceRequirement, Step};
use uuid::Uuid;

/// Errors from the plan store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Plan not found: {0}")]
    PlanNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the registry driver. The Display form becomes the detail
/// of the "Something happened when connecting to the Service Registry:"
/// abort message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryDriverError {
    #[error("Connection refused: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Errors from address syntax verification. The Display form becomes the
/// detail of the "Invalid notify address." message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Address is null or blank.")]
    Blank,

    #[error("Address contains illegal characters.")]
    IllegalCharacters,

    #[error("Address is not a valid IPv4 address or hostname.")]
    Malformed,
}

/// Read access to stored, already-validated plans.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Loads a plan by its identifier.
    async fn get_plan_by_id(&self, id: i64) -> Result<Plan, StoreError>;

    /// Flattens a plan's steps across all actions, preserving action
    /// order and per-action step order.
    fn collect_steps(&self, plan: &Plan) -> Vec<Step> {
        plan.all_steps().into_iter().cloned().collect()
    }
}

/// Lookup of executors able to satisfy a service requirement.
#[async_trait]
pub trait ExecutorStore: Send + Sync {
    /// Returns every executor serving the given service definition
    /// within the version range. Empty means none are capable.
    async fn find_executors(
        &self,
        service_definition: &str,
        min_version: Option<i32>,
        max_version: Option<i32>,
    ) -> Vec<Executor>;
}

/// Query driver for the external service registry.
#[async_trait]
pub trait RegistryDriver: Send + Sync {
    /// Resolves providers for every requirement in one round trip. The
    /// result list has one entry per requirement, in input order.
    async fn multi_query(
        &self,
        requirements: &[ServiceRequirement],
    ) -> Result<Vec<QueryResult>, RegistryDriverError>;
}

/// The abstract executor-selection strategy. How one executor is picked
/// among several candidates is deliberately outside this core.
#[async_trait]
pub trait ExecutorSelector: Send + Sync {
    /// Picks an executor for the requirement, preferably not the one
    /// identified by `exclude`. `None` means no executor could be
    /// selected.
    async fn select(
        &self,
        service_definition: &str,
        min_version: Option<i32>,
        max_version: Option<i32>,
        exclude: Option<Uuid>,
    ) -> Option<Executor>;
}

/// Syntax-only address verification. Implementations must not touch the
/// network.
pub trait AddressVerifier: Send + Sync {
    fn verify(&self, address: &str) -> Result<(), AddressError>;
}
