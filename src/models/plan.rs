//! Route plan and violation types.

use super::{Assignment, Route};

/// Why a stop could not be placed on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedReason {
    /// The address has no coordinates and the geocoder found no match.
    NotGeocoded,
    /// The routing service could not reach the stop.
    Unroutable,
}

impl UnassignedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotGeocoded => "not_geocoded",
            Self::Unroutable => "unroutable",
        }
    }
}

/// A stop left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unassigned {
    pub stop_id: usize,
    pub reason: UnassignedReason,
}

/// A limit broken by a route of the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Route takes longer than the configured maximum.
    MaxDurationExceeded {
        /// Route id.
        route_id: usize,
        /// Actual duration in seconds.
        duration: f64,
        /// Maximum allowed duration in seconds.
        max_duration: f64,
    },
    /// Route serves more stops than the configured maximum.
    MaxStopsExceeded {
        /// Route id.
        route_id: usize,
        /// Number of stops on the route.
        stops: usize,
        /// Maximum allowed stops.
        max_stops: usize,
    },
}

/// A limit violation found by the plan evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// The result of planning: sequenced routes and leftover stops.
///
/// # Examples
///
/// ```
/// use delivery_routes::models::{Route, RoutePlan, UnassignedReason};
///
/// let mut plan = RoutePlan::new();
/// plan.add_route(Route::new(0, vec![0, 2]));
/// plan.add_unassigned(1, UnassignedReason::NotGeocoded);
/// assert_eq!(plan.num_routes(), 1);
/// assert_eq!(plan.num_served(), 2);
/// assert_eq!(plan.assignment_for(2).map(|a| a.waypoint_index), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutePlan {
    routes: Vec<Route>,
    unassigned: Vec<Unassigned>,
}

impl RoutePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn add_unassigned(&mut self, stop_id: usize, reason: UnassignedReason) {
        self.unassigned.push(Unassigned { stop_id, reason });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn unassigned(&self) -> &[Unassigned] {
        &self.unassigned
    }

    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Total number of stops served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.distance()).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.routes.iter().map(|r| r.duration()).sum()
    }

    /// All assignments, route by route in tour order.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.routes.iter().flat_map(|r| r.assignments()).collect()
    }

    /// The assignment of a single stop, if it was routed.
    pub fn assignment_for(&self, stop_id: usize) -> Option<Assignment> {
        self.routes
            .iter()
            .flat_map(|r| r.assignments())
            .find(|a| a.stop_id == stop_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_empty() {
        let plan = RoutePlan::new();
        assert_eq!(plan.num_routes(), 0);
        assert_eq!(plan.num_unassigned(), 0);
        assert_eq!(plan.num_served(), 0);
        assert!(plan.assignments().is_empty());
    }

    #[test]
    fn test_plan_with_routes() {
        let mut plan = RoutePlan::new();

        let mut r1 = Route::new(0, vec![1]);
        r1.set_distance(50.0);
        r1.set_duration(10.0);
        let mut r2 = Route::new(1, vec![2, 3]);
        r2.set_distance(80.0);
        r2.set_duration(20.0);

        plan.add_route(r1);
        plan.add_route(r2);
        plan.add_unassigned(4, UnassignedReason::Unroutable);

        assert_eq!(plan.num_routes(), 2);
        assert_eq!(plan.num_served(), 3);
        assert_eq!(plan.num_unassigned(), 1);
        assert!((plan.total_distance() - 130.0).abs() < 1e-10);
        assert!((plan.total_duration() - 30.0).abs() < 1e-10);
        let a = plan.assignment_for(3).expect("routed");
        assert_eq!((a.route_id, a.waypoint_index), (1, 2));
        assert!(plan.assignment_for(4).is_none());
    }

    #[test]
    fn test_violation_types() {
        let v = Violation::new(ViolationType::MaxStopsExceeded {
            route_id: 0,
            stops: 12,
            max_stops: 10,
        });
        assert_eq!(
            v.kind,
            ViolationType::MaxStopsExceeded {
                route_id: 0,
                stops: 12,
                max_stops: 10,
            }
        );
    }

    #[test]
    fn test_reason_names() {
        assert_eq!(UnassignedReason::NotGeocoded.as_str(), "not_geocoded");
        assert_eq!(UnassignedReason::Unroutable.as_str(), "unroutable");
    }
}
