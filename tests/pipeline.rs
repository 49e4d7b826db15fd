//! End-to-end runs over temp files, with straight-line travel matrices.

use std::fs;
use std::path::Path;

use delivery_routes::clustering::label_routes;
use delivery_routes::config::{PlannerConfig, TravelSource};
use delivery_routes::distance::{haversine_matrices, load_matrix, save_matrix};
use delivery_routes::geocode::ParcelGeocoder;
use delivery_routes::ingest::load_stops;
use delivery_routes::models::{Coordinate, UnassignedReason};
use delivery_routes::planner::{output, Planner};

const ADDRESSES: &str = "\
address,latitude,longitude
120 EDGEBROOK DR NW,51.1404,-114.1702
88 EDGEBROOK DRIVE NW,51.1412,-114.1688
15 EDGEBROOK CIRCLE NW,51.1398,-114.1725
340 MCKENZIE TOWNE AV SE,50.9217,-113.9604
12 MCKENZIE TOWNE AVENUE SE,50.9209,-113.9618
701 MCKENZIE LAKE BV SE,50.9123,-113.9741
9 COUNTRY HILLS VIEW NW,,
";

const PARCELS: &str = "\
address,latitude,longitude
9 COUNTRY HILLS VW NW,51.1512,-114.0850
";

fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn config(n_routes: usize) -> PlannerConfig {
    let mut c = PlannerConfig::default();
    c.n_routes = n_routes;
    c.matrix.source = TravelSource::Haversine;
    c.service_time_secs = 60.0;
    c
}

#[test]
fn plan_writes_all_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addresses = write(dir.path(), "addresses.csv", ADDRESSES);
    let mut stops = load_stops(&addresses).expect("stops");
    assert_eq!(stops.len(), 7);

    let planner = Planner::new(config(2));
    let plan = planner.plan(&mut stops).expect("plan");
    assert_eq!(plan.num_routes(), 2);
    assert_eq!(plan.num_served(), 6);
    assert_eq!(plan.unassigned()[0].stop_id, 6);
    assert_eq!(plan.unassigned()[0].reason, UnassignedReason::NotGeocoded);

    // Edgebrook (rows 0-2) and McKenzie (rows 3-5) land on separate routes.
    let route_of = |id| plan.assignment_for(id).map(|a| a.route_id);
    assert_eq!(route_of(0), route_of(1));
    assert_eq!(route_of(0), route_of(2));
    assert_eq!(route_of(3), route_of(4));
    assert_eq!(route_of(3), route_of(5));
    assert_ne!(route_of(0), route_of(3));

    let out = dir.path().join("out");
    output::save_outputs(&out, &stops, &plan, &planner.config().warehouse).expect("outputs");

    let stops_csv = fs::read_to_string(out.join(output::STOPS_FILE)).expect("stops.csv");
    let lines: Vec<&str> = stops_csv.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[7].starts_with("6,9 COUNTRY HILLS VIEW NW,,,"));

    let routes_csv = fs::read_to_string(out.join(output::ROUTES_FILE)).expect("routes.csv");
    assert_eq!(routes_csv.lines().count(), 3);

    let geojson: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join(output::GEOJSON_FILE)).expect("geojson"),
    )
    .expect("json");
    // 2 route lines + 6 stops + warehouse.
    assert_eq!(geojson["features"].as_array().map(Vec::len), Some(9));
}

#[test]
fn parcels_fill_missing_coordinates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut stops = load_stops(write(dir.path(), "a.csv", ADDRESSES)).expect("stops");
    let parcels = ParcelGeocoder::load(write(dir.path(), "p.csv", PARCELS)).expect("parcels");

    let plan = Planner::new(config(3))
        .with_geocoder(parcels)
        .plan(&mut stops)
        .expect("plan");
    assert_eq!(plan.num_served(), 7);
    assert_eq!(plan.num_unassigned(), 0);
    assert_eq!(stops[6].coordinate(), Some(Coordinate::new(51.1512, -114.0850)));
}

#[test]
fn matrix_files_round_trip_into_clustering() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stops = load_stops(write(dir.path(), "a.csv", ADDRESSES)).expect("stops");
    let coords: Vec<Coordinate> = stops.iter().filter_map(|s| s.coordinate()).collect();
    let matrices = haversine_matrices(&coords, 40.0).expect("matrices");

    let path = dir.path().join("duration_matrix.csv");
    save_matrix(matrices.durations(), &path).expect("save");
    let first = fs::read_to_string(&path).expect("read");
    // Fixed-width cells, one decimal.
    assert!(first.lines().next().expect("row").starts_with("       0.0,"));

    let loaded = load_matrix(&path).expect("load");
    assert_eq!(loaded.size(), 6);
    let labels = label_routes(&loaded, 2).expect("labels");
    assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
}

#[test]
fn summary_reports_limits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut stops = load_stops(write(dir.path(), "a.csv", ADDRESSES)).expect("stops");
    let mut c = config(1);
    c.max_stops_per_route = Some(4);
    c.max_route_duration = Some(60.0);
    let planner = Planner::new(c);
    let plan = planner.plan(&mut stops).expect("plan");

    let (summary, violations) = planner.summarize(&plan);
    assert_eq!(summary.routes, 1);
    assert_eq!(summary.stops_served, 6);
    assert_eq!(summary.mean_stops, 6.0);
    assert_eq!(violations.len(), 2);
}
