//! ## banker-core::safety
//! **Safety algorithm: greedy fixed-point search over completion order**
//!
//! A state is safe when some ordering lets every process obtain its remaining
//! need, finish, and release what it holds. The scan repeatedly passes over the
//! unfinished processes, finishing every one whose need fits inside `work` and
//! folding its allocation back into `work`. A pass that finishes nobody means
//! the search is stuck.
//!
//! Releasing only ever grows `work`, so a process that is eligible stays
//! eligible. That makes the true/false answer independent of scan order; only
//! the reported sequence depends on it.

use tracing::{debug, trace};

use crate::vector::{Matrix, ResourceVector};

/// Decides safety for (work, allocation) pairs against a fixed Max matrix.
///
/// Holds nothing but a borrow of Max, so the same checker is reused for the
/// pre-check and the post-check of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct SafetyChecker<'a> {
    max: &'a Matrix,
}

impl<'a> SafetyChecker<'a> {
    pub fn new(max: &'a Matrix) -> Self {
        Self { max }
    }

    /// True when every process can finish starting from `work`.
    pub fn is_safe(&self, work: &ResourceVector, allocation: &Matrix) -> bool {
        self.safe_sequence(work, allocation).is_some()
    }

    /// The completion order found by scanning in ascending process index, or
    /// `None` when the state is unsafe.
    pub fn safe_sequence(&self, work: &ResourceVector, allocation: &Matrix) -> Option<Vec<usize>> {
        let order: Vec<usize> = (0..self.max.processes()).collect();
        self.safe_sequence_in_order(work, allocation, &order)
    }

    /// Same search with unfinished processes visited in `order` on every pass.
    ///
    /// `order` should be a permutation of `0..P`; indices outside that range
    /// are ignored and processes missing from it never finish.
    ///
    /// Need is derived here from `allocation` (not from any stored Need) since
    /// the allocation may be hypothetical. Cells where a caller-supplied
    /// allocation exceeds max count as zero need. Neither argument is modified.
    ///
    /// Returns `None` when `work` or `allocation` does not match the shape of
    /// Max, since no completion order exists for a malformed state.
    pub fn safe_sequence_in_order(
        &self,
        work: &ResourceVector,
        allocation: &Matrix,
        order: &[usize],
    ) -> Option<Vec<usize>> {
        let processes = self.max.processes();
        if allocation.processes() != processes
            || allocation.width() != self.max.width()
            || work.len() != self.max.width()
        {
            debug!(
                processes,
                allocation_rows = allocation.processes(),
                width = self.max.width(),
                work_len = work.len(),
                "dimensions do not match max; state is unsafe"
            );
            return None;
        }

        let need: Vec<ResourceVector> = self
            .max
            .rows()
            .iter()
            .zip(allocation.rows())
            .map(|(max_row, alloc_row)| max_row.saturating_sub(alloc_row))
            .collect();

        let mut work = work.clone();
        let mut finished = vec![false; processes];
        let mut sequence = Vec::with_capacity(processes);
        let mut pass = 0usize;

        while sequence.len() < processes {
            pass += 1;
            let mut progressed = false;

            for &i in order.iter().filter(|&&i| i < processes) {
                if finished[i] || !need[i].fits_within(&work) {
                    continue;
                }
                work.saturating_add_assign(&allocation[i]);
                finished[i] = true;
                sequence.push(i);
                progressed = true;
                trace!(process = i, pass, work = %work, "process can finish");
            }

            if !progressed {
                debug!(
                    pass,
                    finished = sequence.len(),
                    processes,
                    "no process can finish; state is unsafe"
                );
                return None;
            }
        }

        debug!(passes = pass, sequence = ?sequence, "state is safe");
        Some(sequence)
    }
}
