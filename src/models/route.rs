//! Route and assignment types.

/// Where a single stop landed in the plan.
///
/// `waypoint_index` is the 1-based position of the stop in its tour; the
/// warehouse occupies position 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Stop being served.
    pub stop_id: usize,
    /// Route (cluster label) serving the stop.
    pub route_id: usize,
    /// Position in the tour, starting at 1.
    pub waypoint_index: usize,
}

/// An ordered tour of stops served by one driver.
///
/// The tour starts at the warehouse, which is not stored in `stops`.
///
/// # Examples
///
/// ```
/// use delivery_routes::models::Route;
///
/// let route = Route::new(2, vec![7, 3, 5]);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.route_id(), 2);
/// let seq: Vec<_> = route.assignments().map(|a| (a.stop_id, a.waypoint_index)).collect();
/// assert_eq!(seq, vec![(7, 1), (3, 2), (5, 3)]);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    route_id: usize,
    stops: Vec<usize>,
    distance: f64,
    duration: f64,
    geometry: Option<String>,
}

impl Route {
    /// Creates a route visiting `stops` in the given order.
    pub fn new(route_id: usize, stops: Vec<usize>) -> Self {
        Self {
            route_id,
            stops,
            distance: 0.0,
            duration: 0.0,
            geometry: None,
        }
    }

    pub fn route_id(&self) -> usize {
        self.route_id
    }

    /// Stop ids in visit order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of stops (excluding the warehouse).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total driven distance in metres (set by the evaluator).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Total duration in seconds (set by the evaluator).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Encoded polyline (precision 5) of the driven path, if known.
    pub fn geometry(&self) -> Option<&str> {
        self.geometry.as_deref()
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn set_geometry(&mut self, geometry: String) {
        self.geometry = Some(geometry);
    }

    /// Yields one assignment per stop with its 1-based tour position.
    pub fn assignments(&self) -> impl Iterator<Item = Assignment> + '_ {
        self.stops
            .iter()
            .enumerate()
            .map(move |(pos, &stop_id)| Assignment {
                stop_id,
                route_id: self.route_id,
                waypoint_index: pos + 1,
            })
    }
}
