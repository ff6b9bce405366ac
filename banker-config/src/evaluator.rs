//! Request evaluation configuration.
//!
//! Controls how input is decoded and whether a granted request is committed
//! back into the canonical state.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Request evaluation parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Replace the canonical state with the post-grant state after a grant.
    /// Off by default, so a run only reports and never changes the state.
    #[serde(default)]
    pub commit_on_grant: bool,

    /// Prefix of process identifiers in the request line (`P` in `P3`).
    #[validate(custom(function = validation::validate_process_prefix))]
    #[serde(default = "default_process_prefix")]
    pub process_prefix: String,

    /// Largest process count accepted from input.
    #[validate(range(min = 1, max = 65536))]
    #[serde(default = "default_dimension_limit")]
    pub max_processes: usize,

    /// Largest resource-type count accepted from input.
    #[validate(range(min = 1, max = 65536))]
    #[serde(default = "default_dimension_limit")]
    pub max_resources: usize,
}

fn default_process_prefix() -> String {
    "P".into()
}

fn default_dimension_limit() -> usize {
    1024
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            commit_on_grant: false,
            process_prefix: default_process_prefix(),
            max_processes: default_dimension_limit(),
            max_resources: default_dimension_limit(),
        }
    }
}
