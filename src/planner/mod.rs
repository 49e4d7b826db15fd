//! End-to-end route planning.
//!
//! # Pipeline
//!
//! 1. Geocode stops without coordinates; leftovers become unassigned.
//! 2. Build travel matrices over `[warehouse, located stops...]`.
//! 3. Cluster the stops into routes.
//! 4. Sequence every route, locally or with OSRM `/trip`.
//! 5. Fill in route totals and geometry.
//!
//! Written outputs live in [`output`].

pub mod output;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::clustering::{label_routes, sweep_labels, ClusterMethod};
use crate::config::{PlannerConfig, TravelSource};
use crate::distance::{haversine_matrices, TravelMatrices};
use crate::error::{Error, Result};
use crate::evaluation::{PlanEvaluator, PlanSummary, RouteEvaluator};
use crate::geo::polyline;
use crate::geocode::{geocode_stops, Geocoder};
use crate::models::{Coordinate, Route, RoutePlan, Stop, UnassignedReason, Violation};
use crate::osrm::{large_table, OsrmClient, TableService, TripOptions, TripService};
use crate::tsp::{self, WAREHOUSE};

/// Most coordinates a single `/trip` request may carry, warehouse included.
pub const MAX_TRIP_COORDINATES: usize = 100;

/// How each route is put in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sequencer {
    /// The in-process TSP solver.
    #[default]
    #[serde(rename = "local")]
    Local,
    /// OSRM's `/trip` service, with the local solver as fallback.
    #[serde(rename = "osrm")]
    OsrmTrip,
}

/// Travel matrices the planner works from.
#[derive(Debug, Clone)]
pub enum MatrixSource {
    /// OSRM `/table`.
    Osrm,
    /// Straight-line distances at a constant speed.
    Haversine { speed_kmh: f64 },
    /// Matrices over `[warehouse, every input stop...]`, in input order.
    Precomputed(TravelMatrices),
}

/// Plans delivery routes from one warehouse.
///
/// # Examples
///
/// ```
/// use delivery_routes::config::{PlannerConfig, TravelSource};
/// use delivery_routes::models::{Coordinate, Stop};
/// use delivery_routes::planner::Planner;
///
/// let mut config = PlannerConfig::default();
/// config.n_routes = 2;
/// config.matrix.source = TravelSource::Haversine;
///
/// let mut stops = vec![
///     Stop::new(0, "A", Coordinate::new(51.13, -114.03)),
///     Stop::new(1, "B", Coordinate::new(51.14, -114.03)),
///     Stop::new(2, "C", Coordinate::new(50.95, -114.10)),
///     Stop::new(3, "D", Coordinate::new(50.94, -114.11)),
/// ];
/// let plan = Planner::new(config).plan(&mut stops).unwrap();
/// assert_eq!(plan.num_routes(), 2);
/// assert_eq!(plan.num_served(), 4);
/// ```
pub struct Planner {
    config: PlannerConfig,
    source: MatrixSource,
    geocoder: Option<Box<dyn Geocoder>>,
    table_service: Option<Box<dyn TableService>>,
    trip_service: Option<Box<dyn TripService>>,
}

impl Planner {
    /// Creates a planner whose matrix source follows `config.matrix`.
    pub fn new(config: PlannerConfig) -> Self {
        let source = match config.matrix.source {
            TravelSource::Osrm => MatrixSource::Osrm,
            TravelSource::Haversine => MatrixSource::Haversine {
                speed_kmh: config.matrix.speed_kmh,
            },
        };
        Self {
            config,
            source,
            geocoder: None,
            table_service: None,
            trip_service: None,
        }
    }

    pub fn with_source(mut self, source: MatrixSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    /// Answers `/table` requests instead of an [`OsrmClient`] built from
    /// the config.
    pub fn with_table_service(mut self, service: impl TableService + 'static) -> Self {
        self.table_service = Some(Box::new(service));
        self
    }

    /// Answers `/trip` requests instead of an [`OsrmClient`] built from
    /// the config.
    pub fn with_trip_service(mut self, service: impl TripService + 'static) -> Self {
        self.trip_service = Some(Box::new(service));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans routes for `stops`, geocoding them in place where needed.
    ///
    /// Route ids are cluster labels. Each stop ends up either on exactly
    /// one route or in the unassigned list.
    pub fn plan(&self, stops: &mut [Stop]) -> Result<RoutePlan> {
        let _span = info_span!("plan", stops = stops.len()).entered();
        self.config.validate()?;
        let mut plan = RoutePlan::new();

        if let Some(geocoder) = &self.geocoder {
            geocode_stops(stops, geocoder.as_ref())?;
        }
        let mut located = Vec::with_capacity(stops.len());
        for (pos, stop) in stops.iter().enumerate() {
            if stop.coordinate().is_some() {
                located.push(pos);
            } else {
                plan.add_unassigned(stop.id(), UnassignedReason::NotGeocoded);
            }
        }
        info!(
            located = located.len(),
            not_geocoded = plan.num_unassigned(),
            "stops located"
        );

        let matrices = self.travel_matrices(stops, &mut located, &mut plan)?;
        if located.is_empty() {
            warn!("no routable stops");
            return Ok(plan);
        }

        let labels = self.cluster(stops, &located, &matrices)?;
        let n_routes = labels.iter().max().map_or(0, |&m| m + 1);
        let coords = self.locations(stops, &located);
        let evaluator = RouteEvaluator::new(
            &matrices,
            self.config.service_time_secs,
            self.config.sequencing.tsp.roundtrip,
        );

        for route_id in 0..n_routes {
            // Matrix indices of the cluster's stops, in input order.
            let members: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == route_id)
                .map(|(i, _)| i + 1)
                .collect();
            let (order, geometry) = self.sequence(route_id, &members, &matrices, &coords);

            let ids = order.iter().map(|&m| stops[located[m - 1]].id()).collect();
            let mut route = Route::new(route_id, ids);
            let totals = evaluator.totals(&order);
            route.set_distance(totals.distance);
            route.set_duration(totals.duration);
            route.set_geometry(match geometry {
                Some(g) => g,
                None => self.straight_line(&order, &coords),
            });
            plan.add_route(route);
        }

        let (summary, violations) = self.summarize(&plan);
        info!(
            routes = summary.routes,
            served = summary.stops_served,
            unassigned = summary.unassigned,
            total_distance_m = summary.total_distance,
            total_duration_s = summary.total_duration,
            "plan complete"
        );
        for v in &violations {
            warn!(violation = ?v.kind, "route limit exceeded");
        }
        Ok(plan)
    }

    /// Summary and limit violations of `plan` under this planner's config.
    pub fn summarize(&self, plan: &RoutePlan) -> (PlanSummary, Vec<Violation>) {
        let mut evaluator = PlanEvaluator::new();
        if let Some(max) = self.config.max_route_duration {
            evaluator = evaluator.with_max_route_duration(max);
        }
        if let Some(max) = self.config.max_stops_per_route {
            evaluator = evaluator.with_max_stops_per_route(max);
        }
        evaluator.evaluate(plan)
    }

    /// The warehouse followed by the positions of `located` stops.
    fn locations(&self, stops: &[Stop], located: &[usize]) -> Vec<Coordinate> {
        std::iter::once(self.config.warehouse.coordinate)
            .chain(located.iter().filter_map(|&p| stops[p].coordinate()))
            .collect()
    }

    /// Matrices over the warehouse and `located`. Stops OSRM cannot reach
    /// are moved from `located` to the plan's unassigned list.
    fn travel_matrices(
        &self,
        stops: &[Stop],
        located: &mut Vec<usize>,
        plan: &mut RoutePlan,
    ) -> Result<TravelMatrices> {
        match &self.source {
            MatrixSource::Haversine { speed_kmh } => {
                haversine_matrices(&self.locations(stops, located), *speed_kmh)
            }
            MatrixSource::Precomputed(all) => {
                if all.size() != stops.len() + 1 {
                    return Err(Error::Matrix(format!(
                        "precomputed matrices cover {} locations, expected {} (warehouse + stops)",
                        all.size(),
                        stops.len() + 1
                    )));
                }
                let indices: Vec<usize> = std::iter::once(WAREHOUSE)
                    .chain(located.iter().map(|&p| p + 1))
                    .collect();
                Ok(all.submatrices(&indices))
            }
            MatrixSource::Osrm => {
                let client;
                let service: &dyn TableService = match &self.table_service {
                    Some(s) => s.as_ref(),
                    None => {
                        client = OsrmClient::new(self.config.osrm.clone())?;
                        &client
                    }
                };
                loop {
                    let coords = self.locations(stops, located);
                    let osrm = &self.config.osrm;
                    match large_table(service, &coords, osrm.max_table_size, osrm.fallback_speed) {
                        Err(Error::Unroutable { from, to }) => {
                            let index = if to != WAREHOUSE { to } else { from };
                            if index == WAREHOUSE {
                                return Err(Error::Unroutable { from, to });
                            }
                            let stop = &stops[located.remove(index - 1)];
                            warn!(
                                stop_id = stop.id(),
                                address = stop.address(),
                                "stop is unroutable"
                            );
                            plan.add_unassigned(stop.id(), UnassignedReason::Unroutable);
                        }
                        result => return result,
                    }
                }
            }
        }
    }

    /// One label per located stop.
    fn cluster(
        &self,
        stops: &[Stop],
        located: &[usize],
        matrices: &TravelMatrices,
    ) -> Result<Vec<usize>> {
        let mut n_routes = self.config.n_routes;
        if n_routes > located.len() {
            warn!(
                requested = n_routes,
                stops = located.len(),
                "more routes than stops, capping"
            );
            n_routes = located.len();
        }

        let labels = match self.config.clustering.method {
            ClusterMethod::Agglomerative => {
                let stops_only: Vec<usize> = (1..=located.len()).collect();
                let metric = matrices.metric(self.config.clustering.metric);
                label_routes(&metric.submatrix(&stops_only), n_routes)?
            }
            ClusterMethod::Sweep => {
                let coords: Vec<Coordinate> =
                    located.iter().filter_map(|&p| stops[p].coordinate()).collect();
                sweep_labels(&coords, self.config.warehouse.coordinate, n_routes)?
            }
        };
        info!(
            method = ?self.config.clustering.method,
            routes = n_routes,
            "stops clustered"
        );
        Ok(labels)
    }

    /// Orders `members` (matrix indices). Returns the order and, when OSRM
    /// sequenced the route, its geometry.
    fn sequence(
        &self,
        route_id: usize,
        members: &[usize],
        matrices: &TravelMatrices,
        coords: &[Coordinate],
    ) -> (Vec<usize>, Option<String>) {
        if self.config.sequencing.sequencer == Sequencer::OsrmTrip {
            if members.len() + 1 > MAX_TRIP_COORDINATES {
                warn!(
                    route_id,
                    stops = members.len(),
                    "route too large for /trip, sequencing locally"
                );
            } else {
                match self.osrm_trip(members, coords) {
                    Ok(found) => return found,
                    Err(err) => {
                        warn!(route_id, error = %err, "/trip failed, sequencing locally")
                    }
                }
            }
        }
        (self.local_order(members, matrices), None)
    }

    fn local_order(&self, members: &[usize], matrices: &TravelMatrices) -> Vec<usize> {
        let indices: Vec<usize> =
            std::iter::once(WAREHOUSE).chain(members.iter().copied()).collect();
        let sub = matrices.metric(self.config.clustering.metric).submatrix(&indices);
        tsp::solve(&sub, &self.config.sequencing.tsp)
            .order()
            .iter()
            .map(|&i| indices[i])
            .collect()
    }

    fn osrm_trip(
        &self,
        members: &[usize],
        coords: &[Coordinate],
    ) -> Result<(Vec<usize>, Option<String>)> {
        let client;
        let service: &dyn TripService = match &self.trip_service {
            Some(s) => s.as_ref(),
            None => {
                client = OsrmClient::new(self.config.osrm.clone())?;
                &client
            }
        };
        let request: Vec<Coordinate> = std::iter::once(coords[WAREHOUSE])
            .chain(members.iter().map(|&m| coords[m]))
            .collect();
        let options = TripOptions {
            roundtrip: self.config.sequencing.tsp.roundtrip,
            ..TripOptions::from_warehouse()
        };
        let response = service.trip(&request, &options)?;

        if response.waypoints.len() != request.len() {
            return Err(Error::Http(format!(
                "/trip returned {} waypoints for {} coordinates",
                response.waypoints.len(),
                request.len()
            )));
        }
        if response.waypoints.iter().any(|w| w.trips_index != 0) {
            return Err(Error::Http("/trip split the route into several trips".to_string()));
        }
        let mut visits: Vec<(usize, usize)> = response.waypoints[1..]
            .iter()
            .zip(members)
            .map(|(w, &m)| (w.waypoint_index, m))
            .collect();
        visits.sort_unstable();
        let order = visits.into_iter().map(|(_, m)| m).collect();

        let geometry = match response.trips.first().and_then(|t| t.geometry.as_ref()) {
            Some(g) => Some(g.to_polyline(polyline::PRECISION_5)?),
            None => None,
        };
        Ok((order, geometry))
    }

    /// Precision-5 polyline through the warehouse and `order`.
    fn straight_line(&self, order: &[usize], coords: &[Coordinate]) -> String {
        let mut path: Vec<Coordinate> = std::iter::once(WAREHOUSE)
            .chain(order.iter().copied())
            .map(|i| coords[i])
            .collect();
        if self.config.sequencing.tsp.roundtrip {
            path.push(coords[WAREHOUSE]);
        }
        polyline::encode(&path, polyline::PRECISION_5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::geocode::ParcelGeocoder;
    use crate::osrm::params::Indices;
    use crate::osrm::response::{RouteSummary, TableResponse, TripResponse, TripWaypoint};
    use crate::osrm::TableOptions;
    use std::cell::Cell;
    use std::rc::Rc;

    fn config(n_routes: usize) -> PlannerConfig {
        let mut c = PlannerConfig::default();
        c.n_routes = n_routes;
        c.matrix.source = TravelSource::Haversine;
        c
    }

    /// Two neighbourhoods north and south of the warehouse.
    fn stops() -> Vec<Stop> {
        vec![
            Stop::new(0, "1 NORTH ST NE", Coordinate::new(51.200, -114.030)),
            Stop::new(1, "9 SOUTH AV SE", Coordinate::new(50.950, -114.040)),
            Stop::new(2, "2 NORTH ST NE", Coordinate::new(51.205, -114.020)),
            Stop::new(3, "8 SOUTH AV SE", Coordinate::new(50.945, -114.050)),
            Stop::new(4, "3 NORTH ST NE", Coordinate::new(51.210, -114.025)),
        ]
    }

    #[test]
    fn test_every_stop_assigned_once() {
        let mut s = stops();
        let plan = Planner::new(config(2)).plan(&mut s).expect("plan");
        assert_eq!(plan.num_routes(), 2);
        assert_eq!(plan.num_unassigned(), 0);
        let mut ids: Vec<usize> = plan.assignments().iter().map(|a| a.stop_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        // North stops share route 0 (stop 0 is always in cluster 0).
        for id in [0, 2, 4] {
            assert_eq!(plan.assignment_for(id).map(|a| a.route_id), Some(0));
        }
        for id in [1, 3] {
            assert_eq!(plan.assignment_for(id).map(|a| a.route_id), Some(1));
        }
        for route in plan.routes() {
            assert!(route.distance() > 0.0);
            assert!(route.geometry().is_some());
        }
    }

    #[test]
    fn test_routes_capped_at_stop_count() {
        let mut s = stops();
        let plan = Planner::new(config(9)).plan(&mut s).expect("plan");
        assert_eq!(plan.num_routes(), 5);
        assert!(plan.routes().iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_not_geocoded_and_geocoder() {
        let mut s = stops();
        s.push(Stop::unlocated(5, "4 NORTH ST NE"));
        s.push(Stop::unlocated(6, "NOWHERE"));
        let geocoder =
            ParcelGeocoder::from_entries([("4 NORTH ST NE", Coordinate::new(51.215, -114.02))]);
        let plan = Planner::new(config(2))
            .with_geocoder(geocoder)
            .plan(&mut s)
            .expect("plan");
        assert_eq!(plan.num_served(), 6);
        assert_eq!(plan.unassigned().len(), 1);
        assert_eq!(plan.unassigned()[0].stop_id, 6);
        assert_eq!(plan.unassigned()[0].reason, UnassignedReason::NotGeocoded);
        assert!(s[5].coordinate().is_some());
    }

    #[test]
    fn test_no_located_stops() {
        let mut s = vec![Stop::unlocated(0, "NOWHERE")];
        let plan = Planner::new(config(2)).plan(&mut s).expect("plan");
        assert_eq!(plan.num_routes(), 0);
        assert_eq!(plan.num_unassigned(), 1);
    }

    #[test]
    fn test_precomputed_skips_unlocated_rows() {
        // Warehouse + 3 stops on a line; stop 1 has no coordinate.
        let pts = [0.0_f64, 1.0, 50.0, 2.0];
        let rows: Vec<Vec<f64>> = pts
            .iter()
            .map(|a| pts.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let m = DistanceMatrix::from_rows(rows).expect("square");
        let matrices = TravelMatrices::new(m.clone(), m).expect("same size");
        let mut s = vec![
            Stop::new(0, "A", Coordinate::new(51.0, -114.0)),
            Stop::unlocated(1, "B"),
            Stop::new(2, "C", Coordinate::new(51.0, -114.1)),
        ];
        let plan = Planner::new(config(1))
            .with_source(MatrixSource::Precomputed(matrices))
            .plan(&mut s)
            .expect("plan");
        assert_eq!(plan.routes()[0].stops(), &[0, 2]);
        assert_eq!(plan.routes()[0].distance(), 4.0);
    }

    #[test]
    fn test_precomputed_wrong_size() {
        let matrices =
            TravelMatrices::new(DistanceMatrix::new(2), DistanceMatrix::new(2)).expect("same size");
        let mut s = stops();
        let err = Planner::new(config(2))
            .with_source(MatrixSource::Precomputed(matrices))
            .plan(&mut s);
        assert!(matches!(err, Err(Error::Matrix(_))));
    }

    /// Table service that cannot reach one location.
    struct HoleyTable {
        unreachable: Coordinate,
    }

    impl TableService for HoleyTable {
        fn table(&self, coords: &[Coordinate], options: &TableOptions) -> Result<TableResponse> {
            let all: Vec<usize> = (0..coords.len()).collect();
            let pick = |i: &Indices| match i {
                Indices::All => all.clone(),
                Indices::List(l) => l.clone(),
            };
            let (src, dst) = (pick(&options.sources), pick(&options.destinations));
            let cell = |s: usize, d: usize| {
                let hole = coords[s] == self.unreachable || coords[d] == self.unreachable;
                if hole && s != d {
                    None
                } else {
                    Some(crate::geo::haversine(coords[s], coords[d]))
                }
            };
            let grid: Vec<Vec<Option<f64>>> = src
                .iter()
                .map(|&s| dst.iter().map(|&d| cell(s, d)).collect())
                .collect();
            Ok(TableResponse {
                code: "Ok".to_string(),
                message: None,
                durations: Some(grid.clone()),
                distances: Some(grid),
                sources: Vec::new(),
                destinations: Vec::new(),
            })
        }
    }

    #[test]
    fn test_unroutable_stop_dropped() {
        let mut s = stops();
        let mut c = config(2);
        c.matrix.source = TravelSource::Osrm;
        let plan = Planner::new(c)
            .with_table_service(HoleyTable {
                unreachable: Coordinate::new(50.950, -114.040),
            })
            .plan(&mut s)
            .expect("plan");
        assert_eq!(plan.num_served(), 4);
        assert_eq!(plan.unassigned()[0].stop_id, 1);
        assert_eq!(plan.unassigned()[0].reason, UnassignedReason::Unroutable);
    }

    /// How [`ReverseTrip`] answers.
    #[derive(Clone, Copy, PartialEq)]
    enum TripReply {
        Reverse,
        Fail,
        /// Leaves out the last waypoint.
        MissingWaypoint,
        /// Puts the last waypoint on a second trip.
        SplitTrip,
    }

    /// Trip service that visits coordinates in reverse input order.
    struct ReverseTrip {
        calls: Rc<Cell<usize>>,
        reply: TripReply,
    }

    impl ReverseTrip {
        fn new(reply: TripReply) -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let service = Self {
                calls: Rc::clone(&calls),
                reply,
            };
            (service, calls)
        }
    }

    impl TripService for ReverseTrip {
        fn trip(&self, coords: &[Coordinate], options: &TripOptions) -> Result<TripResponse> {
            self.calls.set(self.calls.get() + 1);
            assert_eq!(options.source, crate::osrm::params::TripSource::First);
            if self.reply == TripReply::Fail {
                return Err(Error::Service {
                    code: "NoTrips".to_string(),
                    message: None,
                });
            }
            let n = coords.len();
            let mut waypoints: Vec<TripWaypoint> = (0..n)
                .map(|i| TripWaypoint {
                    name: String::new(),
                    location: [coords[i].longitude, coords[i].latitude],
                    trips_index: 0,
                    waypoint_index: if i == 0 { 0 } else { n - i },
                })
                .collect();
            match self.reply {
                TripReply::MissingWaypoint => {
                    waypoints.pop();
                }
                TripReply::SplitTrip => {
                    if let Some(last) = waypoints.last_mut() {
                        last.trips_index = 1;
                    }
                }
                TripReply::Reverse | TripReply::Fail => {}
            }
            Ok(TripResponse {
                code: "Ok".to_string(),
                message: None,
                trips: vec![RouteSummary {
                    distance: 1.0,
                    duration: 1.0,
                    weight: None,
                    weight_name: None,
                    geometry: Some(crate::osrm::response::Geometry::Encoded(
                        "_p~iF~ps|U_ulLnnqC".to_string(),
                    )),
                    confidence: None,
                }],
                waypoints,
            })
        }
    }

    fn trip_config(n_routes: usize) -> PlannerConfig {
        let mut c = config(n_routes);
        c.sequencing.sequencer = Sequencer::OsrmTrip;
        c
    }

    #[test]
    fn test_osrm_trip_order_and_geometry() {
        let (service, calls) = ReverseTrip::new(TripReply::Reverse);
        let mut s = stops();
        let plan = Planner::new(trip_config(1))
            .with_trip_service(service)
            .plan(&mut s)
            .expect("plan");
        assert_eq!(calls.get(), 1);
        assert_eq!(plan.routes()[0].stops(), &[4, 3, 2, 1, 0]);
        assert_eq!(plan.routes()[0].geometry(), Some("_p~iF~ps|U_ulLnnqC"));
    }

    #[test]
    fn test_osrm_trip_failure_falls_back() {
        let (service, calls) = ReverseTrip::new(TripReply::Fail);
        let mut s = stops();
        let plan = Planner::new(trip_config(2))
            .with_trip_service(service)
            .plan(&mut s)
            .expect("plan");
        assert_eq!(calls.get(), 2);
        assert_eq!(plan.num_served(), 5);
    }

    #[test]
    fn test_large_route_skips_trip() {
        let mut s: Vec<Stop> = (0..100)
            .map(|i| {
                let c = Coordinate::new(
                    51.0 + (i / 10) as f64 * 0.01,
                    -114.1 + (i % 10) as f64 * 0.01,
                );
                Stop::new(i, format!("{i} GRID ST NW"), c)
            })
            .collect();
        let (service, calls) = ReverseTrip::new(TripReply::Reverse);
        let plan = Planner::new(trip_config(1))
            .with_trip_service(service)
            .plan(&mut s)
            .expect("plan");
        assert_eq!(calls.get(), 0);
        assert_eq!(plan.num_routes(), 1);
        assert_eq!(plan.num_served(), 100);
        assert_eq!(plan.num_unassigned(), 0);
    }

    /// Runs one route through a trip service answering with `reply` and
    /// checks that the result matches local sequencing.
    fn assert_local_order_used(reply: TripReply) {
        let mut s = stops();
        let local = Planner::new(config(1)).plan(&mut s).expect("local plan");

        let (service, calls) = ReverseTrip::new(reply);
        let plan = Planner::new(trip_config(1))
            .with_trip_service(service)
            .plan(&mut s)
            .expect("plan");
        assert_eq!(calls.get(), 1);
        assert_eq!(plan.routes()[0].stops(), local.routes()[0].stops());
        assert_ne!(plan.routes()[0].stops(), &[4, 3, 2, 1, 0]);
        assert_ne!(plan.routes()[0].geometry(), Some("_p~iF~ps|U_ulLnnqC"));
    }

    #[test]
    fn test_trip_missing_waypoint_falls_back() {
        assert_local_order_used(TripReply::MissingWaypoint);
    }

    #[test]
    fn test_trip_split_into_several_trips_falls_back() {
        assert_local_order_used(TripReply::SplitTrip);
    }

    #[test]
    fn test_sequencer_serde() {
        let s: Sequencer = serde_json::from_str("\"osrm\"").expect("parse");
        assert_eq!(s, Sequencer::OsrmTrip);
        assert_eq!(serde_json::to_string(&Sequencer::Local).expect("json"), "\"local\"");
    }
}
