use thiserror::Error;

/// Defects in a caller-supplied state or request.
///
/// None of these are raised by the safety algorithm itself. They come from the
/// validation that runs ahead of it, and every one of them terminates the
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("process index {index} is out of range (system has {processes} processes)")]
    InvalidProcessId { index: usize, processes: usize },

    #[error(
        "process {process} holds {allocated} units of resource {resource} but declared a maximum of {max}"
    )]
    InconsistentState {
        process: usize,
        resource: usize,
        allocated: u64,
        max: u64,
    },

    #[error("{requested} units of resource {resource} requested but only {available} available")]
    InsufficientAvailable {
        resource: usize,
        requested: u64,
        available: u64,
    },

    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
