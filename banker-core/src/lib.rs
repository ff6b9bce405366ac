//! # banker-core
//!
//! Deadlock-avoidance resource allocation: the safety algorithm and the
//! resource-request algorithm over a fixed set of processes and reusable
//! resource types.
//!
//! ### Key Submodules:
//! - `vector`: resource vectors and per-process matrices
//! - `state`: the allocation snapshot and its derived Need matrix
//! - `safety`: decides whether every process can eventually finish
//! - `request`: evaluates one request against a snapshot
//!
//! Everything here is synchronous and single-owner. Evaluating a request never
//! changes the caller's snapshot; committing a grant is an explicit step.

pub mod error;
pub mod request;
pub mod safety;
pub mod state;
pub mod vector;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::request::*;
    pub use crate::safety::*;
    pub use crate::state::*;
    pub use crate::vector::*;
}

pub use error::StateError;
pub use request::{Decision, Evaluation, LimitCheck, Request, RequestEvaluator};
pub use safety::SafetyChecker;
pub use state::{derive_need, ResourceState};
pub use vector::{Matrix, ResourceVector};
