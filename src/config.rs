//! Planner configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "n_routes": 6,
//!   "matrix": { "source": "haversine", "speed_kmh": 35.0 },
//!   "sequencing": { "sequencer": "osrm", "tsp": { "perturbations": 100 } },
//!   "service_time_secs": 120
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clustering::ClusterMethod;
use crate::distance::Metric;
use crate::error::{Error, Result};
use crate::models::Warehouse;
use crate::osrm::OsrmConfig;
use crate::planner::Sequencer;
use crate::tsp::TspOptions;

/// Where travel matrices come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelSource {
    /// OSRM `/table`, fetched in blocks.
    #[default]
    Osrm,
    /// Great-circle distances at a constant speed.
    Haversine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub source: TravelSource,
    /// Average speed for [`TravelSource::Haversine`], km/h.
    pub speed_kmh: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            source: TravelSource::Osrm,
            speed_kmh: 40.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub method: ClusterMethod,
    /// Matrix the clustering and local sequencing work on.
    pub metric: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencingConfig {
    pub sequencer: Sequencer,
    pub tsp: TspOptions,
}

/// Everything the planner needs besides the stops themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of routes (drivers).
    pub n_routes: usize,
    pub warehouse: Warehouse,
    pub matrix: MatrixConfig,
    pub osrm: OsrmConfig,
    pub clustering: ClusteringConfig,
    pub sequencing: SequencingConfig,
    /// Time spent at every stop, seconds.
    pub service_time_secs: f64,
    /// Routes longer than this are reported, seconds.
    pub max_route_duration: Option<f64>,
    /// Routes with more stops than this are reported.
    pub max_stops_per_route: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            n_routes: 4,
            warehouse: Warehouse::default(),
            matrix: MatrixConfig::default(),
            osrm: OsrmConfig::default(),
            clustering: ClusteringConfig::default(),
            sequencing: SequencingConfig::default(),
            service_time_secs: 0.0,
            max_route_duration: None,
            max_stops_per_route: None,
        }
    }
}

impl PlannerConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        info!(path = %path.display(), n_routes = config.n_routes, "config loaded");
        Ok(config)
    }

    /// Rejects settings no plan can be built from.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if self.n_routes == 0 {
            return Err(Error::Config("n_routes must be at least 1".to_string()));
        }
        if !positive(self.matrix.speed_kmh) {
            return Err(Error::Config(format!(
                "matrix.speed_kmh must be positive, got {}",
                self.matrix.speed_kmh
            )));
        }
        if self.osrm.max_table_size == 0 {
            return Err(Error::Config("osrm.max_table_size must be at least 1".to_string()));
        }
        if let Some(speed) = self.osrm.fallback_speed {
            if !positive(speed) {
                return Err(Error::Config(format!(
                    "osrm.fallback_speed must be positive, got {speed}"
                )));
            }
        }
        if !self.warehouse.coordinate.is_valid() {
            return Err(Error::Config(format!(
                "warehouse coordinate {:?} is out of range",
                self.warehouse.coordinate
            )));
        }
        if !(self.service_time_secs.is_finite() && self.service_time_secs >= 0.0) {
            return Err(Error::Config("service_time_secs must be non-negative".to_string()));
        }
        if let Some(max) = self.max_route_duration {
            if !positive(max) {
                return Err(Error::Config(format!(
                    "max_route_duration must be positive, got {max}"
                )));
            }
        }
        Ok(())
    }
}
