//! Plan outputs: per-stop CSV, per-route CSV and GeoJSON.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::polyline;
use crate::models::{Coordinate, RoutePlan, Stop, Warehouse};

pub const STOPS_FILE: &str = "stops.csv";
pub const ROUTES_FILE: &str = "routes.csv";
pub const GEOJSON_FILE: &str = "routes.geojson";

#[derive(Serialize)]
struct StopRow<'a> {
    stop_id: usize,
    address: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    route: Option<usize>,
    waypoint_index: Option<usize>,
}

#[derive(Serialize)]
struct RouteRow<'a> {
    route: usize,
    stops: usize,
    distance: f64,
    duration: f64,
    geometry: &'a str,
}

fn index_stops(stops: &[Stop]) -> HashMap<usize, &Stop> {
    stops.iter().map(|s| (s.id(), s)).collect()
}

fn lookup<'a>(by_id: &HashMap<usize, &'a Stop>, id: usize) -> Result<&'a Stop> {
    by_id
        .get(&id)
        .copied()
        .ok_or_else(|| Error::InvalidArgument(format!("plan refers to unknown stop {id}")))
}

/// Writes one row per stop: routed stops ordered by route then waypoint,
/// followed by unassigned stops with empty `route` and `waypoint_index`.
///
/// Columns: `stop_id,address,latitude,longitude,route,waypoint_index`.
pub fn write_stops_csv<W: Write>(writer: W, stops: &[Stop], plan: &RoutePlan) -> Result<()> {
    let by_id = index_stops(stops);
    let mut assignments = plan.assignments();
    assignments.sort_by_key(|a| (a.route_id, a.waypoint_index));

    let mut csv = csv::Writer::from_writer(writer);
    for a in &assignments {
        let stop = lookup(&by_id, a.stop_id)?;
        let c = stop.coordinate();
        csv.serialize(StopRow {
            stop_id: stop.id(),
            address: stop.address(),
            latitude: c.map(|c| c.latitude),
            longitude: c.map(|c| c.longitude),
            route: Some(a.route_id),
            waypoint_index: Some(a.waypoint_index),
        })?;
    }
    for u in plan.unassigned() {
        let stop = lookup(&by_id, u.stop_id)?;
        let c = stop.coordinate();
        csv.serialize(StopRow {
            stop_id: stop.id(),
            address: stop.address(),
            latitude: c.map(|c| c.latitude),
            longitude: c.map(|c| c.longitude),
            route: None,
            waypoint_index: None,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes one row per route: `route,stops,distance,duration,geometry`.
pub fn write_routes_csv<W: Write>(writer: W, plan: &RoutePlan) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for route in plan.routes() {
        csv.serialize(RouteRow {
            route: route.route_id(),
            stops: route.len(),
            distance: route.distance(),
            duration: route.duration(),
            geometry: route.geometry().unwrap_or(""),
        })?;
    }
    csv.flush()?;
    Ok(())
}

fn point(c: Coordinate) -> Value {
    json!({ "type": "Point", "coordinates": [c.longitude, c.latitude] })
}

/// Builds a GeoJSON `FeatureCollection` of the plan.
///
/// Each route contributes a `LineString` (its geometry, or straight
/// segments through its stops when it has none) and one `Point` per
/// stop. The warehouse is a final `Point` with `"kind": "warehouse"`.
pub fn routes_geojson(stops: &[Stop], plan: &RoutePlan, warehouse: &Warehouse) -> Result<Value> {
    let by_id = index_stops(stops);
    let mut features = Vec::new();

    for route in plan.routes() {
        let line = match route.geometry() {
            Some(encoded) => polyline::decode(encoded, polyline::PRECISION_5)?,
            None => {
                let mut path = vec![warehouse.coordinate];
                for &id in route.stops() {
                    path.extend(lookup(&by_id, id)?.coordinate());
                }
                path
            }
        };
        let coordinates: Vec<[f64; 2]> = line.iter().map(|c| [c.longitude, c.latitude]).collect();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": {
                "kind": "route",
                "route": route.route_id(),
                "stops": route.len(),
                "distance": route.distance(),
                "duration": route.duration(),
            },
        }));

        for a in route.assignments() {
            let stop = lookup(&by_id, a.stop_id)?;
            let Some(c) = stop.coordinate() else { continue };
            features.push(json!({
                "type": "Feature",
                "geometry": point(c),
                "properties": {
                    "kind": "stop",
                    "stop_id": stop.id(),
                    "address": stop.address(),
                    "route": a.route_id,
                    "waypoint_index": a.waypoint_index,
                },
            }));
        }
    }

    features.push(json!({
        "type": "Feature",
        "geometry": point(warehouse.coordinate),
        "properties": { "kind": "warehouse", "address": warehouse.address },
    }));
    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

/// Writes `stops.csv`, `routes.csv` and `routes.geojson` into `dir`,
/// creating it if needed.
pub fn save_outputs(
    dir: impl AsRef<Path>,
    stops: &[Stop],
    plan: &RoutePlan,
    warehouse: &Warehouse,
) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_stops_csv(File::create(dir.join(STOPS_FILE))?, stops, plan)?;
    write_routes_csv(File::create(dir.join(ROUTES_FILE))?, plan)?;

    let geojson = routes_geojson(stops, plan, warehouse)?;
    let mut out = BufWriter::new(File::create(dir.join(GEOJSON_FILE))?);
    serde_json::to_writer_pretty(&mut out, &geojson)?;
    out.flush()?;

    info!(dir = %dir.display(), routes = plan.num_routes(), "outputs written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Route, UnassignedReason};

    fn fixture() -> (Vec<Stop>, RoutePlan) {
        let stops = vec![
            Stop::new(0, "1 A ST NE", Coordinate::new(51.10, -114.00)),
            Stop::new(1, "2 B ST NE", Coordinate::new(51.20, -114.10)),
            Stop::unlocated(2, "NOWHERE"),
            Stop::new(3, "4 D ST NE", Coordinate::new(51.30, -114.20)),
        ];
        let mut plan = RoutePlan::new();
        let mut r1 = Route::new(1, vec![0]);
        r1.set_distance(1200.0);
        let mut r0 = Route::new(0, vec![3, 1]);
        r0.set_geometry(polyline::encode(
            &[Coordinate::new(51.0, -114.0), Coordinate::new(51.3, -114.2)],
            polyline::PRECISION_5,
        ));
        plan.add_route(r1);
        plan.add_route(r0);
        plan.add_unassigned(2, UnassignedReason::NotGeocoded);
        (stops, plan)
    }

    #[test]
    fn test_stops_csv_sorted_by_route_then_waypoint() {
        let (stops, plan) = fixture();
        let mut buf = Vec::new();
        write_stops_csv(&mut buf, &stops, &plan).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "stop_id,address,latitude,longitude,route,waypoint_index");
        assert_eq!(lines[1], "3,4 D ST NE,51.3,-114.2,0,1");
        assert_eq!(lines[2], "1,2 B ST NE,51.2,-114.1,0,2");
        assert_eq!(lines[3], "0,1 A ST NE,51.1,-114.0,1,1");
        assert_eq!(lines[4], "2,NOWHERE,,,,");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_routes_csv() {
        let (_, plan) = fixture();
        let mut buf = Vec::new();
        write_routes_csv(&mut buf, &plan).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "route,stops,distance,duration,geometry");
        assert_eq!(lines[1], "1,1,1200.0,0.0,");
        assert!(lines[2].starts_with("0,2,0.0,0.0,"));
    }

    #[test]
    fn test_unknown_stop_rejected() {
        let (stops, mut plan) = fixture();
        plan.add_route(Route::new(2, vec![99]));
        let err = write_stops_csv(Vec::new(), &stops, &plan);
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_geojson_features() {
        let (stops, plan) = fixture();
        let warehouse = Warehouse::default();
        let gj = routes_geojson(&stops, &plan, &warehouse).expect("geojson");
        assert_eq!(gj["type"], "FeatureCollection");
        let features = gj["features"].as_array().expect("array");
        // 2 lines + 3 routed stops + warehouse.
        assert_eq!(features.len(), 6);

        // Route 1 has no geometry: warehouse then its stop.
        let line = &features[0]["geometry"];
        assert_eq!(line["type"], "LineString");
        assert_eq!(line["coordinates"].as_array().map(Vec::len), Some(2));
        assert_eq!(line["coordinates"][1][0], -114.0);

        let stop = &features[1]["properties"];
        assert_eq!(stop["route"], 1);
        assert_eq!(stop["waypoint_index"], 1);

        let decoded = &features[2]["geometry"]["coordinates"];
        assert_eq!(decoded[0][1], 51.0);

        let last = features.last().expect("warehouse");
        assert_eq!(last["properties"]["kind"], "warehouse");
        assert_eq!(last["properties"]["address"], "24 AERO DR NE");
    }

    #[test]
    fn test_save_outputs() {
        let (stops, plan) = fixture();
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("plan");
        save_outputs(&out, &stops, &plan, &Warehouse::default()).expect("save");
        for name in [STOPS_FILE, ROUTES_FILE, GEOJSON_FILE] {
            assert!(out.join(name).is_file(), "{name}");
        }
        let text = fs::read_to_string(out.join(GEOJSON_FILE)).expect("read");
        let parsed: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(parsed["features"].as_array().map(Vec::len), Some(6));
    }
}
