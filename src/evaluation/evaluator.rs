//! Route totals and plan-level limits.

use serde::Serialize;

use crate::distance::TravelMatrices;
use crate::models::{RoutePlan, Violation, ViolationType};
use crate::tsp::WAREHOUSE;

/// Distance and duration of one route.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteTotals {
    /// Metres.
    pub distance: f64,
    /// Seconds, including service time at every stop.
    pub duration: f64,
}

/// Computes route totals from travel matrices.
///
/// Locations are matrix indices with the warehouse at index 0. Every
/// route leaves the warehouse; the return leg is counted only when
/// `roundtrip` is set.
///
/// # Examples
///
/// ```
/// use delivery_routes::distance::{DistanceMatrix, TravelMatrices};
/// use delivery_routes::evaluation::RouteEvaluator;
///
/// let durations = DistanceMatrix::from_rows(vec![
///     vec![0.0, 60.0, 90.0],
///     vec![60.0, 0.0, 30.0],
///     vec![90.0, 30.0, 0.0],
/// ]).unwrap();
/// let distances = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1000.0, 1500.0],
///     vec![1000.0, 0.0, 500.0],
///     vec![1500.0, 500.0, 0.0],
/// ]).unwrap();
/// let matrices = TravelMatrices::new(durations, distances).unwrap();
///
/// let eval = RouteEvaluator::new(&matrices, 120.0, true);
/// let totals = eval.totals(&[1, 2]);
/// assert_eq!(totals.distance, 3000.0);
/// assert_eq!(totals.duration, 180.0 + 2.0 * 120.0);
/// ```
pub struct RouteEvaluator<'a> {
    matrices: &'a TravelMatrices,
    service_time_secs: f64,
    roundtrip: bool,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(matrices: &'a TravelMatrices, service_time_secs: f64, roundtrip: bool) -> Self {
        Self {
            matrices,
            service_time_secs,
            roundtrip,
        }
    }

    /// Totals for visiting `locations` in order. An empty route is free.
    pub fn totals(&self, locations: &[usize]) -> RouteTotals {
        let Some(&last) = locations.last() else {
            return RouteTotals::default();
        };
        let durations = self.matrices.durations();
        let distances = self.matrices.distances();

        let mut totals = RouteTotals::default();
        let mut prev = WAREHOUSE;
        for &loc in locations {
            totals.distance += distances.get(prev, loc);
            totals.duration += durations.get(prev, loc) + self.service_time_secs;
            prev = loc;
        }
        if self.roundtrip {
            totals.distance += distances.get(last, WAREHOUSE);
            totals.duration += durations.get(last, WAREHOUSE);
        }
        totals
    }
}

/// Aggregate figures for a whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanSummary {
    pub routes: usize,
    pub stops_served: usize,
    pub unassigned: usize,
    pub total_distance: f64,
    pub total_duration: f64,
    pub longest_duration: f64,
    pub shortest_duration: f64,
    pub mean_stops: f64,
}

/// Summarizes plans and checks them against optional per-route limits.
///
/// # Examples
///
/// ```
/// use delivery_routes::evaluation::PlanEvaluator;
/// use delivery_routes::models::{Route, RoutePlan};
///
/// let mut route = Route::new(0, vec![0, 1, 2]);
/// route.set_duration(5400.0);
/// let mut plan = RoutePlan::new();
/// plan.add_route(route);
///
/// let eval = PlanEvaluator::new().with_max_stops_per_route(2);
/// let (summary, violations) = eval.evaluate(&plan);
/// assert_eq!(summary.stops_served, 3);
/// assert_eq!(violations.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEvaluator {
    max_route_duration: Option<f64>,
    max_stops_per_route: Option<usize>,
}

impl PlanEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags routes longer than `seconds`.
    pub fn with_max_route_duration(mut self, seconds: f64) -> Self {
        self.max_route_duration = Some(seconds);
        self
    }

    /// Flags routes with more than `stops` stops.
    pub fn with_max_stops_per_route(mut self, stops: usize) -> Self {
        self.max_stops_per_route = Some(stops);
        self
    }

    /// Summarizes `plan` and lists every broken limit, route by route.
    pub fn evaluate(&self, plan: &RoutePlan) -> (PlanSummary, Vec<Violation>) {
        let routes = plan.routes();
        let mut violations = Vec::new();

        for route in routes {
            if let Some(max_duration) = self.max_route_duration {
                if route.duration() > max_duration {
                    violations.push(Violation::new(ViolationType::MaxDurationExceeded {
                        route_id: route.route_id(),
                        duration: route.duration(),
                        max_duration,
                    }));
                }
            }
            if let Some(max_stops) = self.max_stops_per_route {
                if route.len() > max_stops {
                    violations.push(Violation::new(ViolationType::MaxStopsExceeded {
                        route_id: route.route_id(),
                        stops: route.len(),
                        max_stops,
                    }));
                }
            }
        }

        let durations = routes.iter().map(|r| r.duration());
        let summary = PlanSummary {
            routes: routes.len(),
            stops_served: plan.num_served(),
            unassigned: plan.num_unassigned(),
            total_distance: plan.total_distance(),
            total_duration: plan.total_duration(),
            longest_duration: durations.clone().fold(0.0, f64::max),
            shortest_duration: durations.reduce(f64::min).unwrap_or(0.0),
            mean_stops: if routes.is_empty() {
                0.0
            } else {
                plan.num_served() as f64 / routes.len() as f64
            },
        };
        (summary, violations)
    }
}
