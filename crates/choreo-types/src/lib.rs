//! Choreographer Domain Types
//!
//! Plans in Choreographer are multi-step workflows dispatched across
//! dynamically discovered executors. A **Plan** is a chain of **Actions**;
//! each Action is a DAG of **Steps**; each Step is bound to a service
//! requirement (definition name plus an integer version range) that must
//! resolve to a concrete executor and provider before the plan may run.
//!
//! # Key Concepts
//!
//! - **Plan / Action / Step**: The canonical, validated workflow shape.
//!   Every name reference has been resolved, every graph proven acyclic.
//! - **PlanSubmission**: The nullable wire shape a client submits. The
//!   validator distinguishes "field is null" from "field is invalid", so
//!   the submission types carry `Option` wherever the wire permits null.
//! - **RunPlanRequest / RunPlanResponse**: The run-request contract. A
//!   rejected run carries `ExecutionStatus::Aborted` plus the literal
//!   error messages callers match on.
//!
//! # Design Principles
//!
//! 1. Error messages are part of the external contract. They are fixed
//!    strings, never reworded.
//! 2. Name comparisons are trim- and case-insensitive everywhere.
//! 3. Canonical types cannot represent the malformed states the validator
//!    rejects.

#![deny(unsafe_code)]

mod errors;
mod execution;
mod name;
mod plan;
mod submission;

pub use errors::*;
pub use execution::*;
pub use name::*;
pub use plan::*;
pub use submission::*;
