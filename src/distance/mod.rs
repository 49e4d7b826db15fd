//! Travel duration and distance matrices.
//!
//! Provides a dense matrix type, paired duration/distance matrices, a
//! straight-line fallback builder, and the matrix CSV format.

mod io;
mod matrix;
mod travel;

pub use io::{load_matrix, read_matrix, save_matrix, write_matrix};
pub use matrix::DistanceMatrix;
pub use travel::{haversine_matrices, Metric, TravelMatrices};
