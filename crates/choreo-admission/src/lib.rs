//! Choreographer Execution Admission
//!
//! Before a stored plan is dispatched, every one of its steps must
//! resolve a capable executor and a service provider. Admission is
//! all-or-nothing: the first unresolved step aborts the whole plan.
//!
//! # Key Concepts
//!
//! - **ExecutionAdmissionChecker**: The two-phase checker. Phase A
//!   validates the run request itself, accumulating every violated field
//!   check into one response. Phase B resolves resources per step,
//!   fail-fast, with a single batched registry round trip per plan.
//! - **Collaborator traits**: Plan store, executor store, registry
//!   driver, executor selector, and address verifier are narrow traits
//!   so the checker can be exercised against test doubles and backed by
//!   real services in production.
//! - **In-memory implementations**: DashMap-backed stores and a
//!   round-robin selector, suitable for development and testing.
//!
//! # Design Principles
//!
//! 1. The checker coordinates, never dispatches. A fully resolved plan
//!    yields no response at all — silence means "proceed".
//! 2. Collaborator failures surface as aborted responses, never panics,
//!    and are never retried here.
//! 3. Registry traffic is bounded: one multi-query per admission check
//!    regardless of plan size.

#![deny(unsafe_code)]

mod address;
mod checker;
mod memory;
mod traits;

pub use address::SyntaxAddressVerifier;
pub use checker::ExecutionAdmissionChecker;
pub use memory::{
    InMemoryExecutorStore, InMemoryPlanStore, InMemoryRegistryDriver, RoundRobinSelector,
};
pub use traits::{
    AddressError, AddressVerifier, ExecutorSelector, ExecutorStore, PlanStore, RegistryDriver,
    RegistryDriverError, StoreError,
};
