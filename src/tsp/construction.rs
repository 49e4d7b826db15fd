//! Initial tours for the local search.
//!
//! # Algorithm
//!
//! **Nearest neighbour**: from the warehouse, repeatedly visit the closest
//! unvisited stop.
//!
//! **Farthest insertion**: repeatedly pick the unvisited stop whose distance
//! to the partial tour is largest and insert it where it adds the least
//! cost. Tends to sketch the outline of the route first and fill in the
//! interior afterwards.
//!
//! # Complexity
//!
//! O(n²) for both heuristics.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use super::WAREHOUSE;
use crate::distance::DistanceMatrix;

/// Greedy nearest-neighbour order of the stops `1..matrix.size()`.
///
/// Ties go to the lower index.
pub fn nearest_neighbor(matrix: &DistanceMatrix) -> Vec<usize> {
    let mut remaining: Vec<usize> = (1..matrix.size()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = WAREHOUSE;
    while let Some(next) = matrix.nearest_neighbor(current, &remaining) {
        remaining.retain(|&s| s != next);
        order.push(next);
        current = next;
    }
    order
}

/// Farthest-insertion order of the stops `1..matrix.size()`.
///
/// The distance from a stop to the partial tour is its smallest distance
/// from any tour member. Ties go to the lower index. Gaps that do not
/// compare (NaN) still get inserted, so the result always holds every stop.
pub fn farthest_insertion(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.size();
    if n <= 1 {
        return Vec::new();
    }

    let mut in_tour = vec![false; n];
    in_tour[WAREHOUSE] = true;
    let mut gap: Vec<f64> = (0..n).map(|k| matrix.get(WAREHOUSE, k)).collect();
    let mut order: Vec<usize> = Vec::with_capacity(n - 1);

    for _ in 1..n {
        let mut pick = None;
        let mut pick_gap = f64::NEG_INFINITY;
        for k in 1..n {
            if !in_tour[k] && (pick.is_none() || gap[k] > pick_gap) {
                pick = Some(k);
                pick_gap = gap[k];
            }
        }
        let Some(k) = pick else { break };

        let mut best_pos = 0;
        let mut best_cost = f64::INFINITY;
        for pos in 0..=order.len() {
            let prev = if pos == 0 { WAREHOUSE } else { order[pos - 1] };
            let next = if pos == order.len() { WAREHOUSE } else { order[pos] };
            let cost = matrix.get(prev, k) + matrix.get(k, next) - matrix.get(prev, next);
            if cost < best_cost {
                best_cost = cost;
                best_pos = pos;
            }
        }
        order.insert(best_pos, k);
        in_tour[k] = true;

        for j in 1..n {
            if !in_tour[j] {
                gap[j] = gap[j].min(matrix.get(k, j));
            }
        }
    }
    order
}
