//! Error types for plan validation
//!
//! The message strings are part of the external contract: clients and
//! tests match on exact text. Never reword them.

/// Errors produced by structural plan validation, in the order the checks
/// run. Validation is fail-fast: one violation per call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanValidationError {
    #[error("Request is null.")]
    NullRequest,

    #[error("Plan name is null or blank.")]
    BlankPlanName,

    #[error("First action is not specified.")]
    MissingFirstAction,

    #[error("Action list is null or empty.")]
    EmptyActionList,

    #[error("Action is null.")]
    NullAction,

    #[error("Action name is null or blank.")]
    BlankActionName,

    #[error("Action references itself as next action.")]
    SelfReferencingAction,

    #[error("First steps list is null or empty.")]
    EmptyFirstStepList,

    #[error("First step name is null or blank.")]
    BlankFirstStepName,

    #[error("Step list is null.")]
    NullStepList,

    #[error("The size of the step list is lesser than the size of the first step list.")]
    StepListSmallerThanFirstStepList,

    #[error("Step is null.")]
    NullStep,

    #[error("Step name is null or blank.")]
    BlankStepName,

    #[error("Service requirement is null.")]
    NullServiceRequirement,

    #[error("Service definition is null or blank.")]
    BlankServiceDefinition,

    #[error("Minimum version cannot be greater than maximum version.")]
    InvalidVersionRange,

    #[error("Specified first step {0} is not found in the steps list.")]
    FirstStepNotFound(String),

    #[error("Step name duplication found.")]
    DuplicateStepName,

    #[error("Step not found: {0}")]
    StepNotFound(String),

    #[error("Step is unreachable: {0}")]
    UnreachableStep(String),

    #[error("Specified first action is not found in the actions list.")]
    FirstActionNotFound,

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Action name duplication found.")]
    DuplicateActionName,

    #[error("Unreachable action detected: {0}")]
    UnreachableAction(String),

    #[error("An action references a previous action as its next action (or referencing itself).")]
    ActionCycle,

    #[error("Circular reference detected between the steps of action: {0}")]
    StepCycle(String),
}

/// Result type alias for plan validation.
pub type PlanValidationResult<T> = Result<T, PlanValidationError>;
