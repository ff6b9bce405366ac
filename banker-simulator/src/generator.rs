//! Seeded random snapshots and requests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

use banker_core::{Request, ResourceState, ResourceVector};

/// Largest per-cell value of a generated Max matrix.
const MAX_UNITS: u64 = 9;

/// Upper bound on generated Available cells. Kept low so generated states are
/// a mix of safe and unsafe.
const MAX_AVAILABLE: u64 = 4;

pub struct StateGenerator {
    rng: StdRng,
}

impl StateGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A well-formed snapshot: every allocation cell is at most its max.
    pub fn state(&mut self, processes: usize, resources: usize) -> ResourceState {
        let available = self.vector(resources, MAX_AVAILABLE);
        let mut max = Vec::with_capacity(processes);
        let mut allocation = Vec::with_capacity(processes);
        for _ in 0..processes {
            let max_row = self.vector(resources, MAX_UNITS);
            let alloc_row = ResourceVector::new(
                max_row
                    .iter()
                    .map(|&m| self.rng.random_range(0..=m))
                    .collect(),
            );
            max.push(max_row);
            allocation.push(alloc_row);
        }
        trace!(processes, resources, "generated state");
        ResourceState::new(available, max, allocation)
            .expect("allocation rows are drawn at or below max")
    }

    /// A request from a random process. Each cell is drawn up to one unit past
    /// the process's need so some requests exceed their limits.
    ///
    /// `state` must have at least one process.
    pub fn request(&mut self, state: &ResourceState) -> Request {
        let process = self.rng.random_range(0..state.processes());
        let units = state.need()[process]
            .iter()
            .map(|&n| self.rng.random_range(0..=n + 1))
            .collect();
        Request::new(process, ResourceVector::new(units))
    }

    /// A random permutation of `0..processes`.
    pub fn scan_order(&mut self, processes: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..processes).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn vector(&mut self, len: usize, bound: u64) -> ResourceVector {
        ResourceVector::new((0..len).map(|_| self.rng.random_range(0..=bound)).collect())
    }
}
