//! Choreographer Plan Validator
//!
//! Full structural validation and normalization of a submitted plan,
//! performed once at submission time. Validation is fail-fast: the first
//! violation wins, and the message it carries is a fixed string of the
//! external contract (see `choreo_types::PlanValidationError`).
//!
//! The stages, in order:
//!
//! 1. Request-level checks (request present, plan name, first action,
//!    action list).
//! 2. Per-action structural checks (names, first steps, step list, each
//!    step's service requirement, first-step existence, duplicates,
//!    successor existence, step reachability).
//! 3. Plan-level reference checks (first action exists, every next-action
//!    reference resolves, no duplicate action names, every action
//!    reachable).
//! 4. Action-chain cycle detection.
//! 5. Per-action step-graph cycle detection, then normalization: each
//!    action's graph is reduced to its canonical minimal-edge form and
//!    written back, regenerating successor lists and first-step names.

#![deny(unsafe_code)]

mod validator;

pub use validator::{PlanValidator, ValidationMode};
