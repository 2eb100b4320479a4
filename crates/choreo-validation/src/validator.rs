//! Multi-stage plan validation and normalization

use choreo_graph::{ActionCycleDetector, GraphBuilder, StepGraphAnalyzer};
use choreo_types::{
    is_blank, names_match, normalized, Action, ActionSubmission, Plan, PlanSubmission,
    PlanValidationError, PlanValidationResult, ServiceRequirement, Step,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// How far a validation pass should go.
///
/// Both modes run every structural check, including step-graph cycle
/// detection. `Full` additionally rewrites each action with its
/// normalized (minimal-edge) graph; `StructureOnly` returns the plan
/// with successor lists exactly as submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    #[default]
    Full,
    StructureOnly,
}

/// Validates and normalizes submitted plans.
///
/// Stateless and request-scoped: each call owns its inputs, so
/// concurrent validations need no coordination.
#[derive(Debug, Clone, Default)]
pub struct PlanValidator {
    builder: GraphBuilder,
    analyzer: StepGraphAnalyzer,
    action_cycles: ActionCycleDetector,
}

impl PlanValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a submission and returns the canonical plan.
    ///
    /// Fail-fast: the first violated check wins, and its message is the
    /// literal contract string. The check order is fixed; callers and
    /// tests rely on it.
    pub fn validate_and_normalize_plan(
        &self,
        request: Option<PlanSubmission>,
        mode: ValidationMode,
    ) -> PlanValidationResult<Plan> {
        debug!(?mode, "validating plan submission");
        let result = self.run(request, mode);
        if let Err(ref error) = result {
            warn!(error = %error, "plan submission rejected");
        }
        result
    }

    fn run(
        &self,
        request: Option<PlanSubmission>,
        mode: ValidationMode,
    ) -> PlanValidationResult<Plan> {
        let request = request.ok_or(PlanValidationError::NullRequest)?;

        let name = match request.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(PlanValidationError::BlankPlanName),
        };
        let first_action_name = match request.first_action_name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(PlanValidationError::MissingFirstAction),
        };
        let submitted_actions = match request.actions {
            Some(actions) if !actions.is_empty() => actions,
            _ => return Err(PlanValidationError::EmptyActionList),
        };

        let mut actions = Vec::with_capacity(submitted_actions.len());
        for submission in submitted_actions {
            actions.push(self.validate_action(submission)?);
        }

        let mut plan = Plan {
            name,
            first_action_name,
            actions,
        };

        self.check_action_references(&plan)?;

        if self.action_cycles.has_circle(&plan) {
            return Err(PlanValidationError::ActionCycle);
        }

        self.check_and_normalize_step_graphs(&mut plan, mode)?;

        Ok(plan)
    }

    /// Structural checks for one action, producing its canonical form.
    fn validate_action(
        &self,
        submission: Option<ActionSubmission>,
    ) -> PlanValidationResult<Action> {
        let submission = submission.ok_or(PlanValidationError::NullAction)?;

        let name = match submission.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(PlanValidationError::BlankActionName),
        };
        if let Some(next) = &submission.next_action_name {
            if names_match(&name, next) {
                return Err(PlanValidationError::SelfReferencingAction);
            }
        }

        let submitted_first_steps = match submission.first_step_names {
            Some(list) if !list.is_empty() => list,
            _ => return Err(PlanValidationError::EmptyFirstStepList),
        };
        let mut first_step_names = Vec::with_capacity(submitted_first_steps.len());
        for entry in submitted_first_steps {
            match entry {
                Some(n) if !n.trim().is_empty() => first_step_names.push(n),
                _ => return Err(PlanValidationError::BlankFirstStepName),
            }
        }

        let submitted_steps = submission.steps.ok_or(PlanValidationError::NullStepList)?;
        if submitted_steps.len() < first_step_names.len() {
            return Err(PlanValidationError::StepListSmallerThanFirstStepList);
        }

        let mut steps = Vec::with_capacity(submitted_steps.len());
        for submitted in submitted_steps {
            let submitted = submitted.ok_or(PlanValidationError::NullStep)?;
            let step_name = match submitted.name {
                Some(n) if !n.trim().is_empty() => n,
                _ => return Err(PlanValidationError::BlankStepName),
            };
            let requirement = submitted
                .service_requirement
                .ok_or(PlanValidationError::NullServiceRequirement)?;
            if is_blank(requirement.service_definition.as_deref()) {
                return Err(PlanValidationError::BlankServiceDefinition);
            }
            if let (Some(min), Some(max)) = (requirement.min_version, requirement.max_version) {
                if min > max {
                    return Err(PlanValidationError::InvalidVersionRange);
                }
            }
            let service_definition = requirement.service_definition.unwrap_or_default();
            steps.push(Step {
                name: step_name,
                next_step_names: submitted.next_step_names,
                service_requirement: ServiceRequirement::new(
                    service_definition,
                    requirement.min_version,
                    requirement.max_version,
                ),
            });
        }

        for first in &first_step_names {
            if !steps.iter().any(|s| names_match(&s.name, first)) {
                return Err(PlanValidationError::FirstStepNotFound(first.clone()));
            }
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(normalized(&step.name)) {
                return Err(PlanValidationError::DuplicateStepName);
            }
        }

        for step in &steps {
            for next in step.next_step_names.iter().flatten() {
                if !steps.iter().any(|s| names_match(&s.name, next)) {
                    return Err(PlanValidationError::StepNotFound(next.clone()));
                }
            }
        }

        self.check_step_reachability(&first_step_names, &steps)?;

        Ok(Action {
            name,
            next_action_name: submission.next_action_name,
            first_step_names,
            steps,
        })
    }

    /// Every step must be reachable from the action's first-step set.
    fn check_step_reachability(
        &self,
        first_step_names: &[String],
        steps: &[Step],
    ) -> PlanValidationResult<()> {
        let by_name: HashMap<String, &Step> = steps
            .iter()
            .map(|s| (normalized(&s.name), s))
            .collect();

        let mut visited = HashSet::new();
        let mut queue: VecDeque<String> =
            first_step_names.iter().map(|n| normalized(n)).collect();
        while let Some(key) = queue.pop_front() {
            if !visited.insert(key.clone()) {
                continue;
            }
            if let Some(step) = by_name.get(&key) {
                for next in step.next_step_names.iter().flatten() {
                    queue.push_back(normalized(next));
                }
            }
        }

        for step in steps {
            if !visited.contains(&normalized(&step.name)) {
                return Err(PlanValidationError::UnreachableStep(step.name.clone()));
            }
        }
        Ok(())
    }

    /// Plan-level reference checks: first action, next-action references,
    /// duplicates, reachability.
    fn check_action_references(&self, plan: &Plan) -> PlanValidationResult<()> {
        if plan.action(&plan.first_action_name).is_none() {
            return Err(PlanValidationError::FirstActionNotFound);
        }

        for action in &plan.actions {
            if let Some(next) = &action.next_action_name {
                if plan.action(next).is_none() {
                    return Err(PlanValidationError::ActionNotFound(next.clone()));
                }
            }
        }

        let mut seen = HashSet::new();
        for action in &plan.actions {
            if !seen.insert(normalized(&action.name)) {
                return Err(PlanValidationError::DuplicateActionName);
            }
        }

        let mut visited = HashSet::new();
        let mut current = Some(normalized(&plan.first_action_name));
        while let Some(key) = current {
            if !visited.insert(key.clone()) {
                break;
            }
            current = plan
                .action(&key)
                .and_then(|a| a.next_action_name.as_deref())
                .map(normalized);
        }
        for action in &plan.actions {
            if !visited.contains(&normalized(&action.name)) {
                return Err(PlanValidationError::UnreachableAction(action.name.clone()));
            }
        }

        Ok(())
    }

    /// Per-action step-graph cycle check, then (in `Full` mode) rewrite
    /// of each action with its normalized graph.
    fn check_and_normalize_step_graphs(
        &self,
        plan: &mut Plan,
        mode: ValidationMode,
    ) -> PlanValidationResult<()> {
        for action in &mut plan.actions {
            let Some(graph) = self.builder.build_from_action(Some(action)) else {
                continue;
            };
            if self.analyzer.has_circle(&graph) {
                return Err(PlanValidationError::StepCycle(action.name.clone()));
            }
            if mode == ValidationMode::StructureOnly {
                continue;
            }

            let reduced = self.analyzer.normalize(&graph);
            match self
                .builder
                .apply_graph_to_action(Some(&reduced), Some(action.clone()))
            {
                Ok(Some(rewritten)) => *action = rewritten,
                // Normalization never changes the node set, so the graph
                // stays compatible with the action it was built from.
                _ => continue,
            }
        }
        Ok(())
    }
}
