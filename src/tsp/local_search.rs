//! Intra-route 2-opt and Or-opt improvement.
//!
//! # Algorithm
//!
//! **2-opt** reverses a segment `route[i..=j]` when that shortens the tour.
//! Travel costs may be asymmetric, so the delta includes the segment's
//! internal edges in both directions, accumulated while `j` grows:
//!
//! ```text
//! delta = d(p, r[j]) + Σ d(r[k+1], r[k]) + d(r[i], q)
//!       - d(p, r[i]) - Σ d(r[k], r[k+1]) - d(r[j], q)
//! ```
//!
//! **Or-opt** moves a run of 1, 2 or 3 consecutive stops to the best other
//! position, keeping its direction.
//!
//! [`local_search`] alternates both until neither finds an improving move.
//!
//! # Complexity
//!
//! O(n²) per pass for each operator.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{EPSILON, WAREHOUSE};
use crate::distance::DistanceMatrix;

/// Runs 2-opt and Or-opt to a joint local optimum. Returns `true` if the
/// route changed.
pub fn local_search(route: &mut Vec<usize>, matrix: &DistanceMatrix) -> bool {
    let mut changed = false;
    loop {
        let a = two_opt_improve(route, matrix);
        let b = or_opt_improve(route, matrix);
        if !(a || b) {
            return changed;
        }
        changed = true;
    }
}

/// First-improvement 2-opt. Returns `true` if any segment was reversed.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::DistanceMatrix;
/// use delivery_routes::tsp::{tour_cost, two_opt_improve};
///
/// // Square corners: warehouse (0,0), (1,0), (1,1), (0,1).
/// let s = 2.0_f64.sqrt();
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, s, 1.0],
///     vec![1.0, 0.0, 1.0, s],
///     vec![s, 1.0, 0.0, 1.0],
///     vec![1.0, s, 1.0, 0.0],
/// ]).unwrap();
///
/// let mut route = vec![2, 1, 3]; // crosses itself
/// assert!(two_opt_improve(&mut route, &m));
/// assert_eq!(tour_cost(&route, &m), 4.0);
/// ```
pub fn two_opt_improve(route: &mut [usize], matrix: &DistanceMatrix) -> bool {
    let n = route.len();
    if n < 2 {
        return false;
    }

    let mut any = false;
    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..n - 1 {
            let prev = if i == 0 { WAREHOUSE } else { route[i - 1] };
            let mut forward = 0.0;
            let mut backward = 0.0;
            for j in i + 1..n {
                forward += matrix.get(route[j - 1], route[j]);
                backward += matrix.get(route[j], route[j - 1]);
                let next = if j == n - 1 { WAREHOUSE } else { route[j + 1] };

                let old_cost = matrix.get(prev, route[i]) + forward + matrix.get(route[j], next);
                let new_cost = matrix.get(prev, route[j]) + backward + matrix.get(route[i], next);
                if new_cost - old_cost < -EPSILON {
                    route[i..=j].reverse();
                    improved = true;
                    any = true;
                    break;
                }
            }
        }
    }
    any
}

/// Best-improvement Or-opt over segment lengths 1 to 3. Returns `true` if
/// any segment was moved.
pub fn or_opt_improve(route: &mut Vec<usize>, matrix: &DistanceMatrix) -> bool {
    if route.len() < 2 {
        return false;
    }

    let mut any = false;
    let mut improved = true;
    while improved {
        improved = false;
        for seg_len in 1..=3.min(route.len() - 1) {
            if or_opt_pass(route, matrix, seg_len) {
                improved = true;
                any = true;
            }
        }
    }
    any
}

/// Applies the single best move of `seg_len` stops, if it improves.
fn or_opt_pass(route: &mut Vec<usize>, matrix: &DistanceMatrix, seg_len: usize) -> bool {
    let n = route.len();
    let at = |pos: usize| if pos == 0 || pos > n { WAREHOUSE } else { route[pos - 1] };

    let mut best_delta = -EPSILON;
    let mut best_move = None;

    for from in 0..=(n - seg_len) {
        // Neighbours of the segment, in 1-based positions where 0 and n + 1
        // are the warehouse.
        let prev = at(from);
        let after = at(from + seg_len + 1);
        let first = route[from];
        let last = route[from + seg_len - 1];
        let removal_gain =
            matrix.get(prev, first) + matrix.get(last, after) - matrix.get(prev, after);

        // Insert before original index `to`; `to == n` appends.
        for to in 0..=n {
            if to >= from && to <= from + seg_len {
                continue;
            }
            let ins_prev = at(to);
            let ins_next = at(to + 1);
            let insertion_cost = matrix.get(ins_prev, first) + matrix.get(last, ins_next)
                - matrix.get(ins_prev, ins_next);
            let delta = insertion_cost - removal_gain;
            if delta < best_delta {
                best_delta = delta;
                best_move = Some((from, to));
            }
        }
    }

    let Some((from, to)) = best_move else {
        return false;
    };
    let segment: Vec<usize> = route.drain(from..from + seg_len).collect();
    let insert_at = if to > from { to - seg_len } else { to };
    route.splice(insert_at..insert_at, segment);
    true
}
