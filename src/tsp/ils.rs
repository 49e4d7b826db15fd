//! Iterated local search with double-bridge kicks.
//!
//! # Algorithm
//!
//! 1. Descend from the initial tour with [`local_search`].
//! 2. For each round: cut the best tour into `A B C D`, reconnect it as
//!    `A C B D` (a move 2-opt and Or-opt cannot undo in one step), descend
//!    again, and keep the result only if it is strictly cheaper.
//!
//! # Reference
//!
//! Lourenço, H.R., Martin, O.C. & Stützle, T. (2003). "Iterated Local
//! Search", *Handbook of Metaheuristics*, 320-353.

use rand::Rng;

use super::local_search::local_search;
use super::{tour_cost, EPSILON};
use crate::distance::DistanceMatrix;

/// Improves `initial` for `rounds` perturbation rounds.
pub fn iterated_local_search<R: Rng>(
    initial: Vec<usize>,
    matrix: &DistanceMatrix,
    rounds: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut best = initial;
    local_search(&mut best, matrix);
    let mut best_cost = tour_cost(&best, matrix);

    if best.len() < 4 {
        return best;
    }
    for _ in 0..rounds {
        let mut candidate = double_bridge(&best, rng);
        local_search(&mut candidate, matrix);
        let cost = tour_cost(&candidate, matrix);
        if cost < best_cost - EPSILON {
            best = candidate;
            best_cost = cost;
        }
    }
    best
}

/// Reconnects `A B C D` as `A C B D` at three random cut points.
///
/// Routes shorter than four stops are returned unchanged.
pub fn double_bridge<R: Rng>(route: &[usize], rng: &mut R) -> Vec<usize> {
    let n = route.len();
    if n < 4 {
        return route.to_vec();
    }
    let p1 = rng.random_range(1..n - 2);
    let p2 = rng.random_range(p1 + 1..n - 1);
    let p3 = rng.random_range(p2 + 1..n);

    let mut kicked = Vec::with_capacity(n);
    kicked.extend_from_slice(&route[..p1]);
    kicked.extend_from_slice(&route[p2..p3]);
    kicked.extend_from_slice(&route[p1..p2]);
    kicked.extend_from_slice(&route[p3..]);
    kicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_double_bridge_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let route: Vec<usize> = (1..=10).collect();
        for _ in 0..100 {
            let kicked = double_bridge(&route, &mut rng);
            let mut sorted = kicked.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, route);
            assert_ne!(kicked, route);
            assert_eq!(kicked[0], 1);
        }
    }

    #[test]
    fn test_double_bridge_short_route() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(double_bridge(&[3, 1, 2], &mut rng), vec![3, 1, 2]);
    }

    #[test]
    fn test_ils_never_worsens() {
        let pts: Vec<(f64, f64)> = (0..12)
            .map(|i| {
                let x = (i * 37 % 11) as f64;
                let y = (i * 53 % 7) as f64;
                (x, y)
            })
            .collect();
        let rows = pts
            .iter()
            .map(|a| {
                pts.iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let m = DistanceMatrix::from_rows(rows).expect("square");
        let initial: Vec<usize> = (1..12).collect();
        let initial_cost = tour_cost(&initial, &m);

        let mut rng = StdRng::seed_from_u64(42);
        let tour = iterated_local_search(initial, &m, 20, &mut rng);
        assert_eq!(tour.len(), 11);
        assert!(tour_cost(&tour, &m) <= initial_cost + 1e-10);
    }
}
