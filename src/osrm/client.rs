//! Blocking OSRM HTTP client.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::params::{MatchOptions, Params, RouteOptions, TableOptions, TripOptions};
use super::response::{
    check, MatchResponse, OsrmResponse, RouteResponse, TableResponse, TripResponse,
};
use crate::error::{Error, Result};
use crate::models::Coordinate;

/// Connection settings for an OSRM server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    /// Server root, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Protocol version; `v1` for every OSRM 5.x installation.
    pub version: String,
    /// Profile the data was extracted with (`car`, `bike`, `foot`).
    pub profile: String,
    pub timeout_secs: u64,
    /// Largest sources×destinations block requested from `/table`.
    pub max_table_size: usize,
    /// Speed in m/s OSRM uses to estimate pairs it cannot route.
    pub fallback_speed: Option<f64>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            version: "v1".to_string(),
            profile: "car".to_string(),
            timeout_secs: 30,
            max_table_size: 100,
            fallback_speed: None,
        }
    }
}

/// OSRM HTTP services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Route,
    Table,
    Match,
    Trip,
}

impl Service {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Table => "table",
            Self::Match => "match",
            Self::Trip => "trip",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the `route`, `table`, `match`, and `trip` services.
///
/// # Examples
///
/// ```
/// use delivery_routes::models::Coordinate;
/// use delivery_routes::osrm::{OsrmClient, OsrmConfig, Params, Service};
///
/// let client = OsrmClient::new(OsrmConfig::default()).unwrap();
/// let coords = [Coordinate::new(51.1196913, -114.0316978), Coordinate::new(51.04, -114.07)];
/// let url = client.request_url(Service::Table, &coords, &Params::new()).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "http://127.0.0.1:8080/table/v1/car/-114.0316978,51.1196913;-114.07,51.04"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    http: Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Builds `{base}/{service}/{version}/{profile}/{lon,lat;...}?{params}`.
    pub fn request_url(
        &self,
        service: Service,
        coordinates: &[Coordinate],
        params: &Params,
    ) -> Result<Url> {
        if coordinates.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{service} request needs at least one coordinate"
            )));
        }
        let path: Vec<String> = coordinates.iter().map(Coordinate::to_osrm).collect();
        let raw = format!(
            "{}/{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            self.config.version,
            self.config.profile,
            path.join(";")
        );
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params.pairs())
        };
        url.map_err(|e| Error::InvalidArgument(format!("bad osrm url `{raw}`: {e}")))
    }

    fn get<T>(&self, service: Service, coordinates: &[Coordinate], params: Params) -> Result<T>
    where
        T: DeserializeOwned + OsrmResponse,
    {
        let url = self.request_url(service, coordinates, &params)?;
        let started = Instant::now();
        let response = self.http.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(
            service = service.as_str(),
            coordinates = coordinates.len(),
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "osrm request"
        );
        let parsed: T = serde_json::from_str(&body).map_err(|e| {
            Error::Http(format!(
                "{service} response (status {status}) is not a valid osrm body: {e}"
            ))
        })?;
        check(parsed)
    }

    /// Fastest route through the coordinates in the given order.
    pub fn route(
        &self,
        coordinates: &[Coordinate],
        options: &RouteOptions,
    ) -> Result<RouteResponse> {
        self.get(Service::Route, coordinates, options.params())
    }

    /// Durations and/or distances of the fastest routes between all pairs.
    pub fn table(
        &self,
        coordinates: &[Coordinate],
        options: &TableOptions,
    ) -> Result<TableResponse> {
        self.get(Service::Table, coordinates, options.params())
    }

    /// Snaps a GPS trace to the road network.
    pub fn match_trace(
        &self,
        coordinates: &[Coordinate],
        options: &MatchOptions,
    ) -> Result<MatchResponse> {
        if let Some(ts) = &options.timestamps {
            if ts.len() != coordinates.len() || ts.windows(2).any(|w| w[0] > w[1]) {
                return Err(Error::InvalidArgument(
                    "timestamps must match the coordinates and increase monotonically".to_string(),
                ));
            }
        }
        self.get(Service::Match, coordinates, options.params())
    }

    /// Solves a travelling-salesman tour over the coordinates.
    pub fn trip(&self, coordinates: &[Coordinate], options: &TripOptions) -> Result<TripResponse> {
        self.get(Service::Trip, coordinates, options.params())
    }
}
