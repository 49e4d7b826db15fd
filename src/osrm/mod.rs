//! OSRM v5 HTTP interface.
//!
//! - [`OsrmClient`] — blocking client for `route`, `table`, `match`, and `trip`
//! - [`params`] — typed request options and their query encoding
//! - [`response`] — typed response bodies
//! - [`large_table`] — block-wise travel matrices beyond the server's table limit

mod client;
pub mod params;
pub mod response;
mod table;

pub use client::{OsrmClient, OsrmConfig, Service};
pub use params::{MatchOptions, Params, RouteOptions, TableOptions, TripOptions};
pub use response::{MatchResponse, RouteResponse, TableResponse, TripResponse};
pub use table::{large_table, TableService, TripService};
