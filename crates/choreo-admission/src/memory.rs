//! In-memory implementations of the admission collaborators
//!
//! These are suitable for development and testing. Production
//! deployments back the same traits with persistent stores and a real
//! registry client.

use crate::traits::{
    ExecutorSelector, ExecutorStore, PlanStore, RegistryDriver, RegistryDriverError, StoreError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use choreo_types::{normalized, Executor, Plan, QueryResult, ServiceProvider, ServiceRequirement};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

fn version_in_range(version: i32, min: Option<i32>, max: Option<i32>) -> bool {
    min.map_or(true, |m| version >= m) && max.map_or(true, |m| version <= m)
}

#[derive(Debug, Clone)]
struct StoredPlan {
    plan: Plan,
    registered_at: DateTime<Utc>,
}

/// In-memory plan store with sequential identifiers.
pub struct InMemoryPlanStore {
    plans: DashMap<i64, StoredPlan>,
    next_id: AtomicI64,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self {
            plans: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Stores a validated plan and returns its identifier.
    pub fn register(&self, plan: Plan) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.plans.insert(
            id,
            StoredPlan {
                plan,
                registered_at: Utc::now(),
            },
        );
        id
    }

    /// When the plan was registered, if it exists.
    pub fn registered_at(&self, id: i64) -> Option<DateTime<Utc>> {
        self.plans.get(&id).map(|p| p.registered_at)
    }
}

impl Default for InMemoryPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn get_plan_by_id(&self, id: i64) -> Result<Plan, StoreError> {
        self.plans
            .get(&id)
            .map(|stored| stored.plan.clone())
            .ok_or(StoreError::PlanNotFound(id))
    }
}

/// In-memory executor store, indexed by service definition.
pub struct InMemoryExecutorStore {
    by_service: DashMap<String, Vec<(i32, Executor)>>,
}

impl InMemoryExecutorStore {
    pub fn new() -> Self {
        Self {
            by_service: DashMap::new(),
        }
    }

    /// Registers an executor serving `service_definition` at `version`.
    pub fn register(&self, service_definition: &str, version: i32, executor: Executor) {
        self.by_service
            .entry(normalized(service_definition))
            .or_default()
            .push((version, executor));
    }
}

impl Default for InMemoryExecutorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutorStore for InMemoryExecutorStore {
    async fn find_executors(
        &self,
        service_definition: &str,
        min_version: Option<i32>,
        max_version: Option<i32>,
    ) -> Vec<Executor> {
        self.by_service
            .get(&normalized(service_definition))
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(version, _)| version_in_range(*version, min_version, max_version))
                    .map(|(_, executor)| executor.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// In-memory registry driver, indexed by service definition.
pub struct InMemoryRegistryDriver {
    providers: DashMap<String, Vec<(i32, ServiceProvider)>>,
}

impl InMemoryRegistryDriver {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Registers a provider offering `service_definition` at `version`.
    pub fn register_provider(
        &self,
        service_definition: &str,
        version: i32,
        provider: ServiceProvider,
    ) {
        self.providers
            .entry(normalized(service_definition))
            .or_default()
            .push((version, provider));
    }
}

impl Default for InMemoryRegistryDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryDriver for InMemoryRegistryDriver {
    async fn multi_query(
        &self,
        requirements: &[ServiceRequirement],
    ) -> Result<Vec<QueryResult>, RegistryDriverError> {
        Ok(requirements
            .iter()
            .map(|requirement| {
                let providers = self
                    .providers
                    .get(&normalized(&requirement.service_definition))
                    .map(|entries| {
                        entries
                            .iter()
                            .filter(|(version, _)| {
                                version_in_range(
                                    *version,
                                    requirement.min_version,
                                    requirement.max_version,
                                )
                            })
                            .map(|(_, provider)| provider.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                QueryResult { providers }
            })
            .collect())
    }
}

/// Round-robin selection over an executor store.
///
/// Rotates through the capable executors; when more than one candidate
/// exists, the excluded (previously selected) executor is skipped so
/// consecutive steps spread across executors.
pub struct RoundRobinSelector {
    store: Arc<dyn ExecutorStore>,
    counter: AtomicU64,
}

impl RoundRobinSelector {
    pub fn new(store: Arc<dyn ExecutorStore>) -> Self {
        Self {
            store,
            counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ExecutorSelector for RoundRobinSelector {
    async fn select(
        &self,
        service_definition: &str,
        min_version: Option<i32>,
        max_version: Option<i32>,
        exclude: Option<Uuid>,
    ) -> Option<Executor> {
        let mut candidates = self
            .store
            .find_executors(service_definition, min_version, max_version)
            .await;
        if candidates.len() > 1 {
            if let Some(excluded) = exclude {
                candidates.retain(|e| e.id != excluded);
            }
        }
        if candidates.is_empty() {
            return None;
        }
        let index = self.counter.fetch_add(1, Ordering::SeqCst) as usize % candidates.len();
        candidates.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreo_types::{Action, Step};

    fn sample_plan() -> Plan {
        Plan {
            name: "p".into(),
            first_action_name: "a".into(),
            actions: vec![Action {
                name: "a".into(),
                next_action_name: None,
                first_step_names: vec!["s".into()],
                steps: vec![Step::new("s", ServiceRequirement::new("svc", None, None))],
            }],
        }
    }

    #[tokio::test]
    async fn test_plan_store_round_trip() {
        let store = InMemoryPlanStore::new();
        let id = store.register(sample_plan());
        let loaded = store.get_plan_by_id(id).await.unwrap();
        assert_eq!(loaded.name, "p");
        assert!(store.registered_at(id).is_some());
        assert_eq!(
            store.get_plan_by_id(id + 1).await,
            Err(StoreError::PlanNotFound(id + 1))
        );
    }

    #[tokio::test]
    async fn test_collect_steps_flattens_in_order() {
        let store = InMemoryPlanStore::new();
        let mut plan = sample_plan();
        plan.actions.push(Action {
            name: "b".into(),
            next_action_name: None,
            first_step_names: vec!["t".into()],
            steps: vec![Step::new("t", ServiceRequirement::new("svc", None, None))],
        });
        let names: Vec<String> = store
            .collect_steps(&plan)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["s".to_string(), "t".to_string()]);
    }

    #[tokio::test]
    async fn test_executor_store_matches_version_range() {
        let store = InMemoryExecutorStore::new();
        store.register("Service", 2, Executor::new("runner-2", "10.0.0.2:9000"));
        store.register("service", 5, Executor::new("runner-5", "10.0.0.5:9000"));

        let found = store.find_executors("SERVICE", Some(1), Some(3)).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "runner-2");

        let all = store.find_executors("service", None, None).await;
        assert_eq!(all.len(), 2);

        assert!(store.find_executors("service", Some(6), None).await.is_empty());
        assert!(store.find_executors("other", None, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_multi_query_answers_in_input_order() {
        let driver = InMemoryRegistryDriver::new();
        driver.register_provider(
            "svc",
            1,
            ServiceProvider {
                name: "svc".into(),
                address: "10.0.0.9".into(),
                port: 7000,
            },
        );

        let requirements = vec![
            ServiceRequirement::new("missing", None, None),
            ServiceRequirement::new("svc", Some(1), Some(1)),
        ];
        let results = driver.multi_query(&requirements).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].providers.is_empty());
        assert_eq!(results[1].providers.len(), 1);
    }

    #[tokio::test]
    async fn test_round_robin_rotates() {
        let store = Arc::new(InMemoryExecutorStore::new());
        store.register("svc", 1, Executor::new("one", "10.0.0.1:9000"));
        store.register("svc", 1, Executor::new("two", "10.0.0.2:9000"));
        let selector = RoundRobinSelector::new(store);

        let first = selector.select("svc", None, None, None).await.unwrap();
        let second = selector.select("svc", None, None, None).await.unwrap();
        let third = selector.select("svc", None, None, None).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.id, third.id);
    }

    #[tokio::test]
    async fn test_round_robin_excludes_previous_when_possible() {
        let store = Arc::new(InMemoryExecutorStore::new());
        store.register("svc", 1, Executor::new("one", "10.0.0.1:9000"));
        store.register("svc", 1, Executor::new("two", "10.0.0.2:9000"));
        let selector = RoundRobinSelector::new(store.clone());

        let first = selector.select("svc", None, None, None).await.unwrap();
        let second = selector.select("svc", None, None, Some(first.id)).await.unwrap();
        assert_ne!(first.id, second.id);

        // a lone candidate is returned even when excluded
        let lonely = Arc::new(InMemoryExecutorStore::new());
        lonely.register("svc", 1, Executor::new("only", "10.0.0.3:9000"));
        let selector = RoundRobinSelector::new(lonely);
        let only = selector.select("svc", None, None, None).await.unwrap();
        let again = selector.select("svc", None, None, Some(only.id)).await.unwrap();
        assert_eq!(only.id, again.id);
    }

    #[tokio::test]
    async fn test_selector_returns_none_without_candidates() {
        let selector = RoundRobinSelector::new(Arc::new(InMemoryExecutorStore::new()));
        assert!(selector.select("svc", None, None, None).await.is_none());
    }
}
