//! Scenario files.
//!
//! ```yaml
//! name: textbook grant
//! available: [3, 3, 2]
//! max: [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
//! allocation: [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]
//! request: { process: 1, units: [1, 0, 2] }
//! expect: granted
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use banker_core::{Decision, Request, ResourceState, ResourceVector, StateError};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Serde(#[from] serde_yaml::Error),
    #[error("Invalid scenario state: {0}")]
    State(#[from] StateError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub available: ResourceVector,
    pub max: Vec<ResourceVector>,
    pub allocation: Vec<ResourceVector>,
    pub request: Request,
    #[serde(default)]
    pub expect: Option<Decision>,
}

impl Scenario {
    /// Captures a snapshot and request, e.g. to save a failing fuzz case.
    pub fn from_parts(state: &ResourceState, request: Request) -> Self {
        Self {
            name: None,
            available: state.available().clone(),
            max: state.max().rows().to_vec(),
            allocation: state.allocation().rows().to_vec(),
            request,
            expect: None,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(format!(
                "{} does not exist",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds and validates the snapshot.
    pub fn state(&self) -> Result<ResourceState, ScenarioError> {
        Ok(ResourceState::new(
            self.available.clone(),
            self.max.clone(),
            self.allocation.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTBOOK: &str = r#"
name: textbook grant
available: [3, 3, 2]
max: [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
allocation: [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]
request: { process: 1, units: [1, 0, 2] }
expect: granted
"#;

    #[test]
    fn parses_scenario() {
        let scenario = Scenario::from_yaml(TEXTBOOK).unwrap();
        assert_eq!(scenario.name.as_deref(), Some("textbook grant"));
        assert_eq!(scenario.expect, Some(Decision::Granted));
        assert_eq!(scenario.request.process, 1);

        let state = scenario.state().unwrap();
        assert_eq!(state.need()[0], ResourceVector::new(vec![7, 4, 3]));
    }

    #[test]
    fn yaml_round_trip() {
        let scenario = Scenario::from_yaml(TEXTBOOK).unwrap();
        let back = Scenario::from_yaml(&scenario.to_yaml().unwrap()).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn inconsistent_scenario_is_rejected() {
        let broken = TEXTBOOK.replace("[2, 1, 1]", "[2, 3, 1]");
        let scenario = Scenario::from_yaml(&broken).unwrap();
        assert!(matches!(
            scenario.state(),
            Err(ScenarioError::State(StateError::InconsistentState { process: 3, .. }))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Scenario::load_from_file("no/such/scenario.yaml"),
            Err(ScenarioError::FileNotFound(_))
        ));
    }
}
