//! ## banker-core::state
//! **Allocation snapshot with a derived Need matrix**
//!
//! `ResourceState` is built once from validated input and never mutated in
//! place. Hypothetical post-grant states are new values produced by
//! [`ResourceState::with_request`], so the canonical snapshot can only change
//! when its owner replaces it.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::vector::{Matrix, ResourceVector};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StateParts", into = "StateParts")]
pub struct ResourceState {
    available: ResourceVector,
    max: Matrix,
    allocation: Matrix,
    need: Matrix,
}

/// Serialized form: Need is derived, never stored.
#[derive(Clone, Serialize, Deserialize)]
struct StateParts {
    available: ResourceVector,
    max: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
}

impl ResourceState {
    /// Validates dimensions and derives Need.
    ///
    /// R is the length of `available`; P is the number of rows in `max`.
    pub fn new(
        available: ResourceVector,
        max: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Result<Self, StateError> {
        let resources = available.len();
        let processes = max.len();
        if allocation.len() != processes {
            return Err(StateError::DimensionMismatch {
                what: "allocation matrix",
                expected: processes,
                actual: allocation.len(),
            });
        }
        let max = Matrix::from_rows(resources, max)?;
        let allocation = Matrix::from_rows(resources, allocation)?;
        let need = derive_need(&max, &allocation)?;
        Ok(Self {
            available,
            max,
            allocation,
            need,
        })
    }

    /// Number of resource types (R).
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    /// Number of processes (P).
    pub fn processes(&self) -> usize {
        self.max.processes()
    }

    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    pub fn max(&self) -> &Matrix {
        &self.max
    }

    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    pub fn need(&self) -> &Matrix {
        &self.need
    }

    /// Returns the state that would exist after granting `request` to
    /// `process`: Available shrinks by the request, the process's Allocation
    /// row grows by it, and Need is re-derived.
    ///
    /// Fails with `InconsistentState` if the request takes the process past
    /// its declared maximum, and with `InsufficientAvailable` if the request
    /// is larger than what is available. `self` is never modified.
    pub fn with_request(
        &self,
        process: usize,
        request: &ResourceVector,
    ) -> Result<Self, StateError> {
        request.expect_len("request vector", self.resources())?;
        let current = self
            .allocation
            .row(process)
            .ok_or(StateError::InvalidProcessId {
                index: process,
                processes: self.processes(),
            })?;

        let available = self.available.checked_sub(request).ok_or_else(|| {
            let resource = (0..self.resources())
                .find(|&j| request[j] > self.available[j])
                .unwrap_or_default();
            StateError::InsufficientAvailable {
                resource,
                requested: request[resource],
                available: self.available[resource],
            }
        })?;

        let mut row = current.clone();
        row.saturating_add_assign(request);
        let allocation = self.allocation.with_row(process, row)?;
        let need = derive_need(&self.max, &allocation)?;

        Ok(Self {
            available,
            max: self.max.clone(),
            allocation,
            need,
        })
    }
}

/// need[i][j] = max[i][j] - allocation[i][j].
///
/// Reports the first cell where allocation exceeds max instead of producing a
/// negative need.
pub fn derive_need(max: &Matrix, allocation: &Matrix) -> Result<Matrix, StateError> {
    if allocation.processes() != max.processes() {
        return Err(StateError::DimensionMismatch {
            what: "allocation matrix",
            expected: max.processes(),
            actual: allocation.processes(),
        });
    }
    let rows = max
        .rows()
        .iter()
        .zip(allocation.rows())
        .enumerate()
        .map(|(process, (max_row, alloc_row))| {
            max_row.checked_sub(alloc_row).ok_or_else(|| {
                let resource = (0..max_row.len())
                    .find(|&j| alloc_row[j] > max_row[j])
                    .unwrap_or_default();
                StateError::InconsistentState {
                    process,
                    resource,
                    allocated: alloc_row[resource],
                    max: max_row[resource],
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Matrix::from_rows(max.width(), rows)
}

impl TryFrom<StateParts> for ResourceState {
    type Error = StateError;

    fn try_from(parts: StateParts) -> Result<Self, StateError> {
        ResourceState::new(parts.available, parts.max, parts.allocation)
    }
}

impl From<ResourceState> for StateParts {
    fn from(state: ResourceState) -> Self {
        StateParts {
            available: state.available,
            max: state.max.into_rows(),
            allocation: state.allocation.into_rows(),
        }
    }
}
