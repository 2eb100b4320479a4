//! Choreographer Step/Action Graphs
//!
//! An action's steps form a directed graph: each step names the steps
//! that run after it. This crate holds the in-memory graph structure and
//! the algorithms the validator runs over it:
//!
//! - **StepGraph / Node**: An arena of nodes indexed by step name, with
//!   edges stored as name sets rather than pointers. Ordered collections
//!   keep every traversal deterministic.
//! - **GraphBuilder**: Converts a step list (with per-step successor name
//!   lists) into a [`StepGraph`], and writes a validated graph back onto
//!   an action, recomputing its first-step names.
//! - **StepGraphAnalyzer**: Cycle detection over arbitrary branching, and
//!   normalization (transitive reduction) into the canonical minimal-edge
//!   form.
//! - **ActionCycleDetector**: Cycle detection over the action chain,
//!   where each action has at most one successor.

#![deny(unsafe_code)]

mod action_cycle;
mod analyzer;
mod builder;
mod graph;

pub use action_cycle::ActionCycleDetector;
pub use analyzer::StepGraphAnalyzer;
pub use builder::{GraphBuilder, GraphError};
pub use graph::{Node, StepGraph};
