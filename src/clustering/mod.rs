//! Partitioning stops into routes.
//!
//! - [`label_routes`] — column min-max scaling followed by complete-linkage
//!   agglomerative clustering on a travel matrix
//! - [`sweep_labels`] — balanced angular sectors around the warehouse

mod agglomerative;
mod scaling;
mod sweep;

pub use agglomerative::agglomerative_labels;
pub use scaling::min_max_scale;
pub use sweep::sweep_labels;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::Result;

/// How stops are grouped into routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMethod {
    /// Complete linkage on the scaled travel matrix.
    #[default]
    Agglomerative,
    /// Polar angle around the warehouse.
    Sweep,
}

/// Scales `matrix` column-wise and cuts it into `n_routes` clusters.
///
/// Returns one label per location in `0..n_routes`.
///
/// # Examples
///
/// ```
/// use delivery_routes::clustering::label_routes;
/// use delivery_routes::distance::DistanceMatrix;
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 60.0, 900.0],
///     vec![60.0, 0.0, 880.0],
///     vec![900.0, 880.0, 0.0],
/// ]).unwrap();
/// assert_eq!(label_routes(&m, 2).unwrap(), vec![0, 0, 1]);
/// ```
pub fn label_routes(matrix: &DistanceMatrix, n_routes: usize) -> Result<Vec<usize>> {
    agglomerative_labels(&min_max_scale(matrix), n_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_changes_nothing_for_uniform_columns() {
        // Every column spans [0, 10], so scaling is a uniform divide.
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 10.0, 10.0],
            vec![1.0, 0.0, 10.0, 10.0],
            vec![10.0, 10.0, 0.0, 1.0],
            vec![10.0, 10.0, 1.0, 0.0],
        ])
        .expect("square");
        assert_eq!(
            label_routes(&m, 2).expect("ok"),
            agglomerative_labels(&m, 2).expect("ok")
        );
    }

    #[test]
    fn test_method_serde() {
        let m: ClusterMethod = serde_json::from_str("\"sweep\"").expect("parse");
        assert_eq!(m, ClusterMethod::Sweep);
        assert_eq!(ClusterMethod::default(), ClusterMethod::Agglomerative);
    }
}
