//! Geographic helpers: great-circle distance and encoded polylines.

mod haversine;
pub mod polyline;

pub use haversine::{haversine, EARTH_RADIUS_M};
