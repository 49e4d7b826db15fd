//! Polar sweep clustering.
//!
//! # Algorithm
//!
//! Sorts stops by polar angle around the warehouse, then cuts the sorted
//! sequence into `k` contiguous groups of nearly equal size. Stops in the
//! same direction from the warehouse land on the same route.
//!
//! # Complexity
//!
//! O(n log n) where n = number of stops (dominated by angle sorting).
//!
//! # Reference
//!
//! Gillett, B.E. & Miller, L.R. (1974). "A Heuristic Algorithm for the
//! Vehicle-Dispatch Problem", *Operations Research* 22(2), 340-349.

use crate::error::{Error, Result};
use crate::models::Coordinate;

/// Groups stops into `n_routes` angular sectors around `warehouse`.
///
/// Angles are `atan2(Δlatitude, Δlongitude)`, swept upward from −π. Group
/// sizes differ by at most one, larger groups first. Label `g` is the
/// `g`-th sector in sweep order.
///
/// # Examples
///
/// ```
/// use delivery_routes::clustering::sweep_labels;
/// use delivery_routes::models::Coordinate;
///
/// let depot = Coordinate::new(0.0, 0.0);
/// let stops = [
///     Coordinate::new(1.0, 1.0),   // NE
///     Coordinate::new(-1.0, -1.0), // SW
///     Coordinate::new(1.5, 1.5),   // NE
///     Coordinate::new(-1.5, -1.5), // SW
/// ];
/// assert_eq!(sweep_labels(&stops, depot, 2).unwrap(), vec![1, 0, 1, 0]);
/// ```
pub fn sweep_labels(
    stops: &[Coordinate],
    warehouse: Coordinate,
    n_routes: usize,
) -> Result<Vec<usize>> {
    let n = stops.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n_routes == 0 || n_routes > n {
        return Err(Error::InvalidArgument(format!(
            "cannot form {n_routes} routes from {n} stops"
        )));
    }

    let mut angle_order: Vec<(usize, f64)> = stops
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let dy = c.latitude - warehouse.latitude;
            let dx = c.longitude - warehouse.longitude;
            (i, dy.atan2(dx))
        })
        .collect();
    angle_order.sort_by(|a, b| a.1.total_cmp(&b.1));

    let base = n / n_routes;
    let extra = n % n_routes;
    let mut labels = vec![0; n];
    let mut pos = 0;
    for group in 0..n_routes {
        let size = base + usize::from(group < extra);
        for &(stop, _) in &angle_order[pos..pos + size] {
            labels[stop] = group;
        }
        pos += size;
    }
    Ok(labels)
}
