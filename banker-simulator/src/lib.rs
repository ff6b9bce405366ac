// banker-simulator/src/lib.rs

/*!
# Banker Simulator

Deterministic inputs for the request evaluator that do not come from the text
protocol.

## Key Components:
- **Scenarios:** YAML files holding a snapshot, a request and optionally the
  decision the evaluation is expected to reach.
- **Generator:** Seeded random snapshots and requests. The same seed always
  yields the same sequence, so a failing fuzz iteration can be replayed.
*/

pub mod generator;
pub mod scenario;

pub use generator::StateGenerator;
pub use scenario::{Scenario, ScenarioError};
