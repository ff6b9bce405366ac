use thiserror::Error;

use banker_config::ConfigError;
use banker_core::{Decision, StateError};
use banker_protocol::InputError;
use banker_simulator::ScenarioError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Invalid state: {0}")]
    State(#[from] StateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario expected {expected} but the evaluation decided {actual}")]
    UnexpectedDecision { expected: Decision, actual: Decision },

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Determinism check failed for seed {seed}: {detail}")]
    Determinism { seed: u64, detail: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
