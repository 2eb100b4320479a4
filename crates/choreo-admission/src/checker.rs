//! The two-phase execution admission checker

use crate::traits::{
    AddressVerifier, ExecutorSelector, ExecutorStore, PlanStore, RegistryDriver,
};
use choreo_types::{QueryResult, RunPlanRequest, RunPlanResponse, ServiceRequirement};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const MIN_NOTIFY_PORT: i32 = 1;
const MAX_NOTIFY_PORT: i32 = 65535;
const KNOWN_NOTIFY_PROTOCOLS: [&str; 2] = ["HTTP", "HTTPS"];

/// Resolves an executor and a service provider for every step of a
/// stored plan before it is allowed to run.
///
/// Stateless between calls; every invocation works on an immutable
/// snapshot of its plan and independent collaborator calls, so checks
/// for different plans may run concurrently without coordination.
pub struct ExecutionAdmissionChecker {
    plans: Arc<dyn PlanStore>,
    executors: Arc<dyn ExecutorStore>,
    registry: Arc<dyn RegistryDriver>,
    selector: Arc<dyn ExecutorSelector>,
    verifier: Arc<dyn AddressVerifier>,
}

impl ExecutionAdmissionChecker {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        executors: Arc<dyn ExecutorStore>,
        registry: Arc<dyn RegistryDriver>,
        selector: Arc<dyn ExecutorSelector>,
        verifier: Arc<dyn AddressVerifier>,
    ) -> Self {
        Self {
            plans,
            executors,
            registry,
            selector,
            verifier,
        }
    }

    /// Phase A: validates the run request itself.
    ///
    /// Unlike structural plan validation this does not short-circuit:
    /// every violated field check is accumulated, in check order, into
    /// one aborted response. A `None` return means the request is sound
    /// and resource admission may proceed.
    ///
    /// On rejection a null or blank notify path is defaulted to `""`.
    pub fn check_run_request(
        &self,
        request: Option<&mut RunPlanRequest>,
    ) -> Option<RunPlanResponse> {
        let Some(request) = request else {
            return Some(RunPlanResponse::aborted(None, vec!["Request is null.".into()]));
        };

        let mut messages = Vec::new();

        if request.plan_id <= 0 {
            messages.push("Plan id is not valid.".to_string());
        }

        let protocol_known = request
            .notify_protocol
            .as_deref()
            .is_some_and(|p| {
                KNOWN_NOTIFY_PROTOCOLS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(p.trim()))
            });
        if !protocol_known {
            messages.push("Invalid notify protocol.".to_string());
        }

        if let Err(error) = self
            .verifier
            .verify(request.notify_address.as_deref().unwrap_or(""))
        {
            messages.push(format!("Invalid notify address. {error}"));
        }

        if request.notify_port < MIN_NOTIFY_PORT || request.notify_port > MAX_NOTIFY_PORT {
            messages.push(format!(
                "Notify port must be between {MIN_NOTIFY_PORT} and {MAX_NOTIFY_PORT}."
            ));
        }

        if messages.is_empty() {
            return None;
        }

        if request
            .notify_path
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            request.notify_path = Some(String::new());
        }
        warn!(plan_id = request.plan_id, count = messages.len(), "run request rejected");
        Some(RunPlanResponse::aborted(Some(request.plan_id), messages))
    }

    /// Phase B: resolves resources for every step of the stored plan.
    ///
    /// Fail-fast: the first step that cannot resolve an executor or
    /// provider aborts the whole plan. `None` means every step resolved
    /// and the plan is admitted. When `resolve_executors` is false the
    /// selection strategy is not consulted (availability-only dry run).
    pub async fn check_plan_for_execution(
        &self,
        plan_id: i64,
        resolve_executors: bool,
    ) -> Option<RunPlanResponse> {
        debug!(plan_id, resolve_executors, "checking plan for execution");

        let plan = match self.plans.get_plan_by_id(plan_id).await {
            Ok(plan) => plan,
            Err(error) => {
                warn!(plan_id, error = %error, "plan lookup failed");
                return Some(RunPlanResponse::aborted(
                    Some(plan_id),
                    vec![error.to_string()],
                ));
            }
        };
        let steps = self.plans.collect_steps(&plan);

        // One registry round trip per admission check: the multi-query
        // carries every step's requirement and is issued at the first
        // step that needs provider data.
        let mut registry_results: Option<Vec<QueryResult>> = None;
        let mut last_selected: Option<Uuid> = None;

        for (index, step) in steps.iter().enumerate() {
            let requirement = &step.service_requirement;

            let candidates = self
                .executors
                .find_executors(
                    &requirement.service_definition,
                    requirement.min_version,
                    requirement.max_version,
                )
                .await;
            if candidates.is_empty() {
                return Some(self.abort_for_step(plan_id, "Executor not found for step", step));
            }

            if registry_results.is_none() {
                let requirements: Vec<ServiceRequirement> = steps
                    .iter()
                    .map(|s| s.service_requirement.clone())
                    .collect();
                match self.registry.multi_query(&requirements).await {
                    Ok(results) => registry_results = Some(results),
                    Err(error) => {
                        warn!(plan_id, error = %error, "registry query failed");
                        return Some(RunPlanResponse::aborted(
                            Some(plan_id),
                            vec![format!(
                                "Something happened when connecting to the Service Registry: {error}"
                            )],
                        ));
                    }
                }
            }

            let provider_found = registry_results
                .as_ref()
                .and_then(|results| results.get(index))
                .is_some_and(|result| !result.providers.is_empty());
            if !provider_found {
                return Some(self.abort_for_step(plan_id, "Provider not found for step", step));
            }

            if resolve_executors {
                match self
                    .selector
                    .select(
                        &requirement.service_definition,
                        requirement.min_version,
                        requirement.max_version,
                        last_selected,
                    )
                    .await
                {
                    Some(executor) => last_selected = Some(executor.id),
                    None => {
                        return Some(self.abort_for_step(
                            plan_id,
                            "Executor not found for step",
                            step,
                        ));
                    }
                }
            }
        }

        info!(plan_id, steps = steps.len(), "plan admitted for execution");
        None
    }

    fn abort_for_step(
        &self,
        plan_id: i64,
        reason: &str,
        step: &choreo_types::Step,
    ) -> RunPlanResponse {
        warn!(plan_id, step = %step.name, "{reason}");
        RunPlanResponse::aborted(Some(plan_id), vec![format!("{reason}: {}", step.name)])
    }

    /// Runs both phases: request validation, then resource admission.
    pub async fn admit(
        &self,
        request: Option<&mut RunPlanRequest>,
        resolve_executors: bool,
    ) -> Option<RunPlanResponse> {
        let plan_id = request.as_ref().map(|r| r.plan_id);
        if let Some(rejection) = self.check_run_request(request) {
            return Some(rejection);
        }
        // check_run_request only passes on a present request.
        let plan_id = plan_id?;
        self.check_plan_for_execution(plan_id, resolve_executors)
            .await
    }
}
