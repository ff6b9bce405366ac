//! ## banker-core::vector
//! **Resource vectors and per-process matrices**
//!
//! A `ResourceVector` holds one non-negative count per resource type. A
//! `Matrix` is a row per process, every row the same width.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Ordered unit counts, one per resource type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u64>);

impl ResourceVector {
    pub fn new(units: Vec<u64>) -> Self {
        Self(units)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.0.iter()
    }

    /// True when every component is zero (an empty vector included).
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&u| u == 0)
    }

    /// Component-wise `self <= other`.
    pub fn fits_within(&self, other: &ResourceVector) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// Component-wise subtraction, `None` if any component would go negative.
    pub fn checked_sub(&self, other: &ResourceVector) -> Option<ResourceVector> {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(ResourceVector)
    }

    /// Component-wise subtraction clamped at zero.
    pub fn saturating_sub(&self, other: &ResourceVector) -> ResourceVector {
        ResourceVector(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a.saturating_sub(*b))
                .collect(),
        )
    }

    pub fn saturating_add_assign(&mut self, other: &ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a = a.saturating_add(*b);
        }
    }

    pub(crate) fn expect_len(&self, what: &'static str, expected: usize) -> Result<(), StateError> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(StateError::DimensionMismatch {
                what,
                expected,
                actual: self.len(),
            })
        }
    }
}

impl From<Vec<u64>> for ResourceVector {
    fn from(units: Vec<u64>) -> Self {
        Self(units)
    }
}

impl Index<usize> for ResourceVector {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.0[index]
    }
}

impl fmt::Display for ResourceVector {
    /// Space separated, no trailing space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (j, units) in self.0.iter().enumerate() {
            if j > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{units}")?;
        }
        Ok(())
    }
}

/// One `ResourceVector` row per process. Used for Max, Allocation and Need.
///
/// Not serialized on its own: an empty matrix cannot carry its width, so
/// snapshots serialize rows and rebuild matrices through `ResourceState::new`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    width: usize,
    rows: Vec<ResourceVector>,
}

impl Matrix {
    /// Builds a matrix whose rows must all have `width` columns.
    pub fn from_rows(width: usize, rows: Vec<ResourceVector>) -> Result<Self, StateError> {
        for row in &rows {
            row.expect_len("matrix row", width)?;
        }
        Ok(Self { width, rows })
    }

    pub fn zeros(processes: usize, width: usize) -> Self {
        Self {
            width,
            rows: vec![ResourceVector::zeros(width); processes],
        }
    }

    /// Number of rows (processes).
    pub fn processes(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (resource types).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, process: usize) -> Option<&ResourceVector> {
        self.rows.get(process)
    }

    pub fn rows(&self) -> &[ResourceVector] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ResourceVector> {
        self.rows
    }

    /// Returns a copy of this matrix with one row replaced.
    pub fn with_row(&self, process: usize, row: ResourceVector) -> Result<Self, StateError> {
        row.expect_len("matrix row", self.width)?;
        if process >= self.rows.len() {
            return Err(StateError::InvalidProcessId {
                index: process,
                processes: self.rows.len(),
            });
        }
        let mut rows = self.rows.clone();
        rows[process] = row;
        Ok(Self {
            width: self.width,
            rows,
        })
    }
}

impl Index<usize> for Matrix {
    type Output = ResourceVector;

    fn index(&self, process: usize) -> &ResourceVector {
        &self.rows[process]
    }
}

impl fmt::Display for Matrix {
    /// One row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(units: &[u64]) -> ResourceVector {
        ResourceVector::new(units.to_vec())
    }

    #[test]
    fn fits_within_is_componentwise() {
        assert!(v(&[1, 2, 2]).fits_within(&v(&[3, 3, 2])));
        assert!(!v(&[1, 4, 0]).fits_within(&v(&[3, 3, 2])));
        assert!(v(&[]).fits_within(&v(&[])));
    }

    #[test]
    fn checked_sub_rejects_underflow() {
        assert_eq!(v(&[3, 3, 2]).checked_sub(&v(&[1, 0, 2])), Some(v(&[2, 3, 0])));
        assert_eq!(v(&[3, 3, 2]).checked_sub(&v(&[0, 4, 0])), None);
    }

    #[test]
    fn display_has_no_trailing_space() {
        assert_eq!(v(&[7, 4, 3]).to_string(), "7 4 3");
        assert_eq!(v(&[]).to_string(), "");
    }

    #[test]
    fn matrix_rejects_ragged_rows() {
        let err = Matrix::from_rows(3, vec![v(&[1, 2, 3]), v(&[1, 2])]).unwrap_err();
        assert_eq!(
            err,
            StateError::DimensionMismatch {
                what: "matrix row",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn with_row_leaves_original_untouched() {
        let original = Matrix::zeros(2, 2);
        let updated = original.with_row(1, v(&[4, 5])).unwrap();
        assert_eq!(original[1], v(&[0, 0]));
        assert_eq!(updated[1], v(&[4, 5]));
        assert!(original.with_row(2, v(&[0, 0])).is_err());
    }
}
