//! Complete-linkage agglomerative clustering on a precomputed matrix.
//!
//! # Algorithm
//!
//! Builds the full dendrogram with the nearest-neighbour chain algorithm:
//! follow nearest neighbours from an arbitrary cluster until two clusters
//! are mutual nearest neighbours, merge them, and update dissimilarities
//! with the complete-linkage rule
//!
//! ```text
//! d(k, a ∪ b) = max(d(k, a), d(k, b))
//! ```
//!
//! Complete linkage is reducible, so the merges found this way, sorted by
//! height, form the same dendrogram as the naive closest-pair loop. The
//! tree is then cut by applying the lowest `n - k` merges.
//!
//! # Complexity
//!
//! O(n²) time and memory.
//!
//! # Reference
//!
//! Murtagh, F. (1983). "A survey of recent advances in hierarchical
//! clustering algorithms", *The Computer Journal* 26(4), 354-359.

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct Merge {
    a: usize,
    b: usize,
    height: f64,
}

/// Partitions the locations of `matrix` into `n_clusters` clusters.
///
/// The dissimilarity between `i` and `j` is read from the upper triangle,
/// `matrix.get(min(i, j), max(i, j))`. Labels are numbered by each
/// cluster's smallest member, so location 0 is always in cluster 0.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `n_clusters` is zero or exceeds the
/// number of locations. An empty matrix yields no labels.
///
/// # Examples
///
/// ```
/// use delivery_routes::clustering::agglomerative_labels;
/// use delivery_routes::distance::DistanceMatrix;
///
/// // Two tight pairs far apart.
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 9.0, 9.0],
///     vec![1.0, 0.0, 9.0, 9.0],
///     vec![9.0, 9.0, 0.0, 1.0],
///     vec![9.0, 9.0, 1.0, 0.0],
/// ]).unwrap();
/// assert_eq!(agglomerative_labels(&m, 2).unwrap(), vec![0, 0, 1, 1]);
/// ```
pub fn agglomerative_labels(matrix: &DistanceMatrix, n_clusters: usize) -> Result<Vec<usize>> {
    let n = matrix.size();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n_clusters == 0 || n_clusters > n {
        return Err(Error::InvalidArgument(format!(
            "cannot form {n_clusters} clusters from {n} locations"
        )));
    }

    let mut merges = nn_chain(matrix);
    merges.sort_by(|x, y| x.height.total_cmp(&y.height));

    let mut parent: Vec<usize> = (0..n).collect();
    for m in merges.iter().take(n - n_clusters) {
        let ra = find(&mut parent, m.a);
        let rb = find(&mut parent, m.b);
        parent[ra.max(rb)] = ra.min(rb);
    }

    let mut label_of_root = vec![usize::MAX; n];
    let mut next = 0;
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let root = find(&mut parent, i);
        if label_of_root[root] == usize::MAX {
            label_of_root[root] = next;
            next += 1;
        }
        labels.push(label_of_root[root]);
    }
    Ok(labels)
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Returns the n - 1 merges of the complete-linkage dendrogram, in the
/// order they were discovered. Each merge names one member of each side.
fn nn_chain(matrix: &DistanceMatrix) -> Vec<Merge> {
    let n = matrix.size();
    let mut d = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v = matrix.get(i, j);
            d[i * n + j] = v;
            d[j * n + i] = v;
        }
    }

    // Slot `s` always holds the cluster that contains location `s`.
    let mut active = vec![true; n];
    let mut remaining = n;
    let mut chain: Vec<usize> = Vec::with_capacity(n);
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    while remaining > 1 {
        if chain.is_empty() {
            match active.iter().position(|&a| a) {
                Some(first) => chain.push(first),
                None => break,
            }
        }
        let a = chain[chain.len() - 1];
        let prev = chain.len().checked_sub(2).map(|p| chain[p]);

        // Ties favour the previous chain element so the chain terminates.
        let mut best = prev;
        let mut best_d = prev.map_or(f64::INFINITY, |p| d[a * n + p]);
        for k in 0..n {
            if !active[k] || k == a {
                continue;
            }
            let dk = d[a * n + k];
            if best.is_none() || dk < best_d {
                best = Some(k);
                best_d = dk;
            }
        }
        let Some(b) = best else { break };

        if Some(b) == prev {
            chain.truncate(chain.len() - 2);
            merges.push(Merge { a, b, height: best_d });

            let (keep, drop) = (a.min(b), a.max(b));
            for k in 0..n {
                if !active[k] || k == keep || k == drop {
                    continue;
                }
                let v = d[a * n + k].max(d[b * n + k]);
                d[keep * n + k] = v;
                d[k * n + keep] = v;
            }
            active[drop] = false;
            remaining -= 1;
        } else {
            chain.push(b);
        }
    }
    merges
}
