//! Dense travel-cost matrix.

use crate::error::{Error, Result};

/// A dense n×n cost matrix stored in row-major order.
///
/// Holds either travel durations (seconds) or distances (metres) between
/// locations. Matrices built by the planner put the warehouse at index 0.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 4.0],
///     vec![8.0, 4.0, 0.0],
/// ]).unwrap();
/// assert_eq!(dm.get(0, 2), 8.0);
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from a flat row-major grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Fails with [`Error::Matrix`] unless every row has one entry per row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::Matrix(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `max(1)` keeps `chunks` happy for the empty matrix.
        self.data.chunks(self.size.max(1))
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Position of the first NaN or infinite entry, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        let size = self.size.max(1);
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|k| (k / size, k % size))
    }

    /// Returns the nearest neighbor of `from` among the given candidates.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }

    /// Extracts the matrix restricted to `indices`, in the given order.
    ///
    /// Entry `(i, j)` of the result is `self.get(indices[i], indices[j])`.
    pub fn submatrix(&self, indices: &[usize]) -> Self {
        let n = indices.len();
        let mut sub = Self::new(n);
        for (i, &from) in indices.iter().enumerate() {
            for (j, &to) in indices.iter().enumerate() {
                sub.set(i, j, self.get(from, to));
            }
        }
        sub
    }
}
