//! Typed OSRM v5 response bodies.
//!
//! Only the fields the planner reads are modelled; unknown fields are
//! ignored. Error bodies (`{"code": "...", "message": "..."}`) decode into
//! the same types thanks to defaulted collections.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geo::polyline;
use crate::models::Coordinate;

/// Common envelope shared by every service response.
pub trait OsrmResponse {
    fn code(&self) -> &str;
    fn message(&self) -> Option<&str>;
}

/// Turns a non-`Ok` response into [`Error::Service`].
pub fn check<T: OsrmResponse>(response: T) -> Result<T> {
    if response.code() == "Ok" {
        Ok(response)
    } else {
        Err(Error::Service {
            code: response.code().to_string(),
            message: response.message().map(str::to_string),
        })
    }
}

macro_rules! impl_envelope {
    ($($ty:ty),+) => {
        $(impl OsrmResponse for $ty {
            fn code(&self) -> &str {
                &self.code
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        })+
    };
}

impl_envelope!(TableResponse, RouteResponse, MatchResponse, TripResponse);

/// Input coordinate snapped to the street network.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Waypoint {
    #[serde(default)]
    pub name: String,
    /// `[longitude, latitude]` of the snapped location.
    pub location: [f64; 2],
    /// Distance in metres from the input coordinate to the snapped one.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Waypoint of a trip, carrying its position in the solved tour.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TripWaypoint {
    #[serde(default)]
    pub name: String,
    pub location: [f64; 2],
    /// Index of the trip this waypoint belongs to.
    pub trips_index: usize,
    /// Position of this waypoint within its trip.
    pub waypoint_index: usize,
}

/// Matched trace point; `null` entries in the response are unmatched.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Tracepoint {
    #[serde(default)]
    pub name: String,
    pub location: [f64; 2],
    pub matchings_index: usize,
    pub waypoint_index: usize,
    #[serde(default)]
    pub alternatives_count: usize,
}

/// Route geometry as returned by OSRM: an encoded polyline or a GeoJSON
/// LineString, depending on the `geometries` option.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Geometry {
    Encoded(String),
    GeoJson { coordinates: Vec<[f64; 2]> },
}

impl Geometry {
    /// Decodes the geometry; `precision` applies to encoded polylines only.
    pub fn coordinates(&self, precision: u32) -> Result<Vec<Coordinate>> {
        match self {
            Self::Encoded(s) => polyline::decode(s, precision),
            Self::GeoJson { coordinates } => Ok(coordinates
                .iter()
                .map(|&[lon, lat]| Coordinate::new(lat, lon))
                .collect()),
        }
    }

    /// The geometry as a precision-5 encoded polyline.
    pub fn to_polyline(&self, precision: u32) -> Result<String> {
        match self {
            Self::Encoded(s) if precision == polyline::PRECISION_5 => Ok(s.clone()),
            _ => Ok(polyline::encode(
                &self.coordinates(precision)?,
                polyline::PRECISION_5,
            )),
        }
    }
}

/// A route, trip, or matching: totals plus optional geometry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteSummary {
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_name: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Present on map-matching results only.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Response of the `table` service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds; `null` where no route exists.
    #[serde(default)]
    pub durations: Option<Vec<Vec<Option<f64>>>>,
    /// Metres; `null` where no route exists.
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default)]
    pub sources: Vec<Waypoint>,
    #[serde(default)]
    pub destinations: Vec<Waypoint>,
}

/// Response of the `route` service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

/// Response of the `match` service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MatchResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub matchings: Vec<RouteSummary>,
    #[serde(default)]
    pub tracepoints: Vec<Option<Tracepoint>>,
}

/// Response of the `trip` service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TripResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trips: Vec<RouteSummary>,
    #[serde(default)]
    pub waypoints: Vec<TripWaypoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_with_unroutable_cell() {
        let body = r#"{
            "code": "Ok",
            "durations": [[0.0, 120.5], [null, 0.0]],
            "sources": [{"name": "Aero Dr", "location": [-114.03, 51.12], "hint": "abc"}],
            "destinations": []
        }"#;
        let t: TableResponse = serde_json::from_str(body).expect("valid");
        let t = check(t).expect("ok code");
        let d = t.durations.expect("durations");
        assert_eq!(d[0][1], Some(120.5));
        assert_eq!(d[1][0], None);
        assert!(t.distances.is_none());
        assert_eq!(t.sources[0].name, "Aero Dr");
    }

    #[test]
    fn test_error_body() {
        let body = r#"{"code": "InvalidQuery", "message": "Query string malformed close to position 28"}"#;
        let r: RouteResponse = serde_json::from_str(body).expect("error bodies decode");
        match check(r) {
            Err(Error::Service { code, message }) => {
                assert_eq!(code, "InvalidQuery");
                assert!(message.expect("message").contains("malformed"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_trip_response() {
        let body = r#"{
            "code": "Ok",
            "trips": [{"geometry": "_p~iF~ps|U_ulLnnqC", "legs": [], "weight_name": "routability",
                       "weight": 301.2, "duration": 298.4, "distance": 2456.1}],
            "waypoints": [
                {"waypoint_index": 0, "trips_index": 0, "location": [-114.03, 51.12], "name": ""},
                {"waypoint_index": 2, "trips_index": 0, "location": [-114.07, 51.04], "name": ""},
                {"waypoint_index": 1, "trips_index": 0, "location": [-114.10, 51.08], "name": ""}
            ]
        }"#;
        let t: TripResponse = serde_json::from_str(body).expect("valid");
        assert_eq!(t.trips.len(), 1);
        assert_eq!(t.trips[0].distance, 2456.1);
        let order: Vec<usize> = t.waypoints.iter().map(|w| w.waypoint_index).collect();
        assert_eq!(order, vec![0, 2, 1]);
        assert_eq!(
            t.trips[0].geometry,
            Some(Geometry::Encoded("_p~iF~ps|U_ulLnnqC".to_string()))
        );
    }

    #[test]
    fn test_geojson_geometry() {
        let body = r#"{"type": "LineString", "coordinates": [[-120.2, 38.5], [-120.95, 40.7]]}"#;
        let g: Geometry = serde_json::from_str(body).expect("valid");
        let pts = g.coordinates(5).expect("coords");
        assert_eq!(pts[0], Coordinate::new(38.5, -120.2));
        assert_eq!(g.to_polyline(5).expect("encode"), "_p~iF~ps|U_ulLnnqC");
    }

    #[test]
    fn test_match_with_unmatched_tracepoint() {
        let body = r#"{
            "code": "Ok",
            "matchings": [{"distance": 10.0, "duration": 2.0, "confidence": 0.93}],
            "tracepoints": [null, {"location": [0.0, 0.0], "matchings_index": 0, "waypoint_index": 0, "alternatives_count": 1}]
        }"#;
        let m: MatchResponse = serde_json::from_str(body).expect("valid");
        assert!(m.tracepoints[0].is_none());
        assert_eq!(m.matchings[0].confidence, Some(0.93));
    }
}
