//! # delivery-routes
//!
//! Last-mile delivery route planning from a single warehouse: address
//! intake, geocoding, OSRM travel matrices, route clustering, and
//! per-route TSP sequencing.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Coordinate, Stop, Warehouse, Route, RoutePlan)
//! - [`ingest`] — Address CSV loading and street-type normalization
//! - [`geocode`] — Address lookup against a parcel table
//! - [`geo`] — Haversine distance and encoded polylines
//! - [`distance`] — Travel matrices, haversine fallback, matrix CSV
//! - [`osrm`] — OSRM HTTP client and block-wise `/table` fetching
//! - [`clustering`] — Agglomerative and sweep clustering into routes
//! - [`tsp`] — Single-route sequencing (exact, 2-opt/Or-opt, ILS)
//! - [`evaluation`] — Route totals, plan summary, limit checks
//! - [`planner`] — The end-to-end pipeline and its outputs
//! - [`config`] — Planner configuration
//! - [`logging`] — Tracing subscriber setup

pub mod clustering;
pub mod config;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod geo;
pub mod geocode;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod osrm;
pub mod planner;
pub mod tsp;

pub use error::{Error, Result};
