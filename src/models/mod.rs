//! Domain model types for delivery route planning.
//!
//! Provides the core abstractions: geocoded stops and the warehouse they
//! are served from, routes as ordered tours of stops, and the route plan
//! that ties assignments and leftover stops together.

mod plan;
mod route;
mod stop;

pub use plan::{RoutePlan, Unassigned, UnassignedReason, Violation, ViolationType};
pub use route::{Assignment, Route};
pub use stop::{Coordinate, Stop, Warehouse};
