//! Single-vehicle stop sequencing.
//!
//! Every function here works on a matrix whose index 0 is the warehouse
//! and whose remaining indices are the stops of one route.
//!
//! - [`solve`] — exact search for small routes, otherwise construction,
//!   local search and iterated local search
//! - [`TspOptions`] — roundtrip vs open path, construction heuristic, limits
//! - [`Tour`] — visiting order and its cost

mod brute_force;
mod construction;
mod ils;
mod local_search;

pub use brute_force::brute_force;
pub use construction::{farthest_insertion, nearest_neighbor};
pub use ils::{double_bridge, iterated_local_search};
pub use local_search::{local_search, or_opt_improve, two_opt_improve};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMatrix;

/// Matrix index of the warehouse.
pub const WAREHOUSE: usize = 0;

/// Moves must gain at least this much to count as improvements.
pub(crate) const EPSILON: f64 = 1e-10;

/// Initial tour heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    #[default]
    FarthestInsertion,
    NearestNeighbor,
}

/// Settings for [`solve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TspOptions {
    /// Return to the warehouse after the last stop.
    pub roundtrip: bool,
    pub construction: Construction,
    /// Routes with at most this many stops are solved exactly.
    pub brute_force_limit: usize,
    /// Iterated local search rounds.
    pub perturbations: usize,
    pub seed: u64,
}

impl Default for TspOptions {
    fn default() -> Self {
        Self {
            roundtrip: true,
            construction: Construction::FarthestInsertion,
            brute_force_limit: 8,
            perturbations: 50,
            seed: 42,
        }
    }
}

/// A visiting order over matrix indices, warehouse excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Stop indices in visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Cost of the tour, without the return leg for open paths.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

/// Total cost of `warehouse → order[0] → … → order[n-1] → warehouse`.
pub fn tour_cost(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    let Some((&first, _)) = order.split_first() else {
        return 0.0;
    };
    let mut cost = matrix.get(WAREHOUSE, first);
    for w in order.windows(2) {
        cost += matrix.get(w[0], w[1]);
    }
    cost + matrix.get(order[order.len() - 1], WAREHOUSE)
}

/// Copy of `matrix` where returning to the warehouse is free.
fn open_path(matrix: &DistanceMatrix) -> DistanceMatrix {
    let mut open = matrix.clone();
    for i in 0..open.size() {
        open.set(i, WAREHOUSE, 0.0);
    }
    open
}

/// Orders the stops `1..matrix.size()` starting from the warehouse.
///
/// The result is always a permutation of the stop indices and depends only
/// on the matrix and `options`.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::DistanceMatrix;
/// use delivery_routes::tsp::{solve, TspOptions};
///
/// // Warehouse at 0, stops at 3, 1 and 2 on a line.
/// let points = [0.0_f64, 3.0, 1.0, 2.0];
/// let rows = points
///     .iter()
///     .map(|a| points.iter().map(|b| (a - b).abs()).collect())
///     .collect();
/// let m = DistanceMatrix::from_rows(rows).unwrap();
///
/// let tour = solve(&m, &TspOptions::default());
/// assert_eq!(tour.cost(), 6.0);
///
/// let open = TspOptions { roundtrip: false, ..TspOptions::default() };
/// let path = solve(&m, &open);
/// assert_eq!(path.order(), &[2, 3, 1]);
/// assert_eq!(path.cost(), 3.0);
/// ```
pub fn solve(matrix: &DistanceMatrix, options: &TspOptions) -> Tour {
    if matrix.size() <= 1 {
        return Tour {
            order: Vec::new(),
            cost: 0.0,
        };
    }

    let open;
    let matrix = if options.roundtrip {
        matrix
    } else {
        open = open_path(matrix);
        &open
    };

    let stops = matrix.size() - 1;
    let order = if stops <= options.brute_force_limit {
        brute_force(matrix)
    } else {
        let initial = match options.construction {
            Construction::FarthestInsertion => farthest_insertion(matrix),
            Construction::NearestNeighbor => nearest_neighbor(matrix),
        };
        let mut rng = StdRng::seed_from_u64(options.seed);
        iterated_local_search(initial, matrix, options.perturbations, &mut rng)
    };

    let cost = tour_cost(&order, matrix);
    debug!(stops, cost, "tour solved");
    Tour { order, cost }
}
