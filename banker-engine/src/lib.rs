//! # banker-engine
//!
//! Runs one evaluation end to end so every frontend shares the same behavior:
//! decode the input, evaluate the request, render the report, and commit the
//! grant when configured to. Also hosts scenario replay and fuzzing.

pub mod error;
pub mod runtime;

pub use error::EngineError;
pub use runtime::{
    run_evaluation, run_fuzz_mode, run_scenario, state_hash, verify_state_hash, FuzzSummary,
    RunReport,
};
