//! Column-wise min-max scaling.

use crate::distance::DistanceMatrix;

/// Scales every column of `matrix` independently onto `[0, 1]`.
///
/// Column `j` maps `x` to `(x - min_j) / (max_j - min_j)`. A column whose
/// values are all equal is shifted to zero and left unscaled.
///
/// # Examples
///
/// ```
/// use delivery_routes::clustering::min_max_scale;
/// use delivery_routes::distance::DistanceMatrix;
///
/// let m = DistanceMatrix::from_rows(vec![vec![0.0, 10.0], vec![4.0, 30.0]]).unwrap();
/// let s = min_max_scale(&m);
/// assert_eq!(s.get(1, 0), 1.0);
/// assert_eq!(s.get(0, 1), 0.0);
/// ```
pub fn min_max_scale(matrix: &DistanceMatrix) -> DistanceMatrix {
    let n = matrix.size();
    let mut scaled = DistanceMatrix::new(n);
    for j in 0..n {
        let (min, max) = (0..n)
            .map(|i| matrix.get(i, j))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;
        let scale = if range > 0.0 { range } else { 1.0 };
        for i in 0..n {
            scaled.set(i, j, (matrix.get(i, j) - min) / scale);
        }
    }
    scaled
}
