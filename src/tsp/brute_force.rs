//! Exhaustive search over stop permutations.
//!
//! Enumerates permutations in lexicographic order and keeps the first one
//! with the lowest cost, so ties resolve to the lexicographically smallest
//! order.
//!
//! # Complexity
//!
//! O(n · n!) for n stops. Only suitable for a handful of stops.

use super::tour_cost;
use crate::distance::DistanceMatrix;

/// Returns an optimal order of the stops `1..matrix.size()`.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::DistanceMatrix;
/// use delivery_routes::tsp::brute_force;
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 5.0, 9.0],
///     vec![9.0, 0.0, 1.0, 5.0],
///     vec![5.0, 9.0, 0.0, 1.0],
///     vec![1.0, 5.0, 9.0, 0.0],
/// ]).unwrap();
/// assert_eq!(brute_force(&m), vec![1, 2, 3]);
/// ```
pub fn brute_force(matrix: &DistanceMatrix) -> Vec<usize> {
    let mut perm: Vec<usize> = (1..matrix.size()).collect();
    let mut best = perm.clone();
    let mut best_cost = tour_cost(&perm, matrix);
    while next_permutation(&mut perm) {
        let cost = tour_cost(&perm, matrix);
        if cost < best_cost {
            best_cost = cost;
            best.copy_from_slice(&perm);
        }
    }
    best
}

/// Advances `items` to the next lexicographic permutation. Returns `false`
/// after the last one.
fn next_permutation(items: &mut [usize]) -> bool {
    let n = items.len();
    let Some(pivot) = (0..n.saturating_sub(1)).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let Some(swap) = (pivot + 1..n).rev().find(|&j| items[j] > items[pivot]) else {
        return false;
    };
    items.swap(pivot, swap);
    items[pivot + 1..].reverse();
    true
}
