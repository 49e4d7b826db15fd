//! Paired duration/distance matrices.

use serde::{Deserialize, Serialize};

use super::DistanceMatrix;
use crate::error::{Error, Result};
use crate::geo::haversine;
use crate::models::Coordinate;

/// Which of the two travel matrices a stage works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Travel time in seconds.
    #[default]
    Duration,
    /// Driven distance in metres.
    Distance,
}

/// Travel durations (seconds) and distances (metres) between the same
/// set of locations.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    durations: DistanceMatrix,
    distances: DistanceMatrix,
}

impl TravelMatrices {
    /// Pairs two matrices; they must cover the same number of locations
    /// and hold only finite values.
    pub fn new(durations: DistanceMatrix, distances: DistanceMatrix) -> Result<Self> {
        if durations.size() != distances.size() {
            return Err(Error::Matrix(format!(
                "duration matrix is {0}x{0} but distance matrix is {1}x{1}",
                durations.size(),
                distances.size()
            )));
        }
        for (name, m) in [("duration", &durations), ("distance", &distances)] {
            if let Some((i, j)) = m.first_non_finite() {
                return Err(Error::Matrix(format!(
                    "{name} matrix has a non-finite value at ({i}, {j})"
                )));
            }
        }
        Ok(Self {
            durations,
            distances,
        })
    }

    pub fn durations(&self) -> &DistanceMatrix {
        &self.durations
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// The matrix for the given metric.
    pub fn metric(&self, metric: Metric) -> &DistanceMatrix {
        match metric {
            Metric::Duration => &self.durations,
            Metric::Distance => &self.distances,
        }
    }

    pub fn size(&self) -> usize {
        self.durations.size()
    }

    /// Both matrices restricted to `indices`.
    pub fn submatrices(&self, indices: &[usize]) -> Self {
        Self {
            durations: self.durations.submatrix(indices),
            distances: self.distances.submatrix(indices),
        }
    }
}

/// Straight-line travel matrices for when no routing engine is available.
///
/// Distances are great-circle metres; durations assume a constant
/// `speed_kmh`.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::haversine_matrices;
/// use delivery_routes::models::Coordinate;
///
/// let pts = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
/// let m = haversine_matrices(&pts, 36.0).unwrap();
/// let d = m.distances().get(0, 1);
/// assert!((m.durations().get(0, 1) - d / 10.0).abs() < 1e-9);
/// ```
pub fn haversine_matrices(coordinates: &[Coordinate], speed_kmh: f64) -> Result<TravelMatrices> {
    if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "speed must be positive, got {speed_kmh} km/h"
        )));
    }
    let speed_ms = speed_kmh / 3.6;
    let n = coordinates.len();
    let mut durations = DistanceMatrix::new(n);
    let mut distances = DistanceMatrix::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = haversine(coordinates[i], coordinates[j]);
            distances.set(i, j, d);
            distances.set(j, i, d);
            durations.set(i, j, d / speed_ms);
            durations.set(j, i, d / speed_ms);
        }
    }
    TravelMatrices::new(durations, distances)
}
