#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use delivery_routes::clustering::label_routes;
use delivery_routes::config::{PlannerConfig, TravelSource};
use delivery_routes::distance::{haversine_matrices, load_matrix, save_matrix, TravelMatrices};
use delivery_routes::geo::polyline;
use delivery_routes::geocode::{geocode_stops, ParcelGeocoder};
use delivery_routes::ingest::load_stops;
use delivery_routes::models::{Coordinate, Stop};
use delivery_routes::osrm::{large_table, OsrmClient, OsrmConfig};
use delivery_routes::planner::{output, Planner, Sequencer};

const DURATION_MATRIX_FILE: &str = "duration_matrix.csv";
const DISTANCE_MATRIX_FILE: &str = "distance_matrix.csv";

#[derive(Parser)]
#[command(name = "delivery-routes")]
#[command(about = "Plan last-mile delivery routes from a single warehouse")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON objects.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    /// OSRM server root; overrides the config file.
    #[arg(long, global = true, env = "OSRM_URL")]
    osrm_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute duration and distance matrices for an address file.
    Matrix {
        #[arg(long)]
        addresses: PathBuf,
        /// Put the warehouse at index 0, ahead of the addresses.
        #[arg(long, default_value_t = false)]
        warehouse_first: bool,
        #[arg(long, value_enum, default_value_t = SourceArg::Osrm)]
        source: SourceArg,
        /// Average speed for the haversine source, km/h.
        #[arg(long, default_value_t = 40.0)]
        speed_kmh: f64,
        /// Parcel table used to geocode addresses without coordinates.
        #[arg(long)]
        parcels: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Cluster the locations of a matrix file and print one label per line.
    Cluster {
        #[arg(long)]
        matrix: PathBuf,
        #[arg(long)]
        routes: usize,
        #[arg(long, value_enum, default_value_t = MethodArg::Agglomerative)]
        method: MethodArg,
        /// Row and column 0 hold the warehouse; leave it out.
        #[arg(long, default_value_t = false)]
        warehouse_first: bool,
    },
    /// Plan routes and write stops.csv, routes.csv and routes.geojson.
    Plan {
        #[arg(long)]
        addresses: PathBuf,
        #[arg(long)]
        routes: Option<usize>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
        #[arg(long, value_enum)]
        sequencer: Option<SequencerArg>,
        #[arg(long)]
        parcels: Option<PathBuf>,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Decode an encoded polyline into `lat,lon` lines.
    Decode {
        #[arg(long)]
        polyline: String,
        #[arg(long, default_value_t = 5)]
        precision: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    Osrm,
    Haversine,
}

impl From<SourceArg> for TravelSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Osrm => TravelSource::Osrm,
            SourceArg::Haversine => TravelSource::Haversine,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SequencerArg {
    Local,
    Osrm,
}

impl From<SequencerArg> for Sequencer {
    fn from(arg: SequencerArg) -> Self {
        match arg {
            SequencerArg::Local => Sequencer::Local,
            SequencerArg::Osrm => Sequencer::OsrmTrip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    Agglomerative,
}

fn load_config(path: Option<&Path>, osrm_url: Option<String>) -> Result<PlannerConfig> {
    let mut config = match path {
        Some(p) => PlannerConfig::from_path(p)
            .with_context(|| format!("failed to load config {}", p.display()))?,
        None => PlannerConfig::default(),
    };
    if let Some(url) = osrm_url {
        config.osrm.base_url = url;
    }
    Ok(config)
}

fn load_addresses(path: &Path, parcels: Option<&Path>) -> Result<Vec<Stop>> {
    let mut stops =
        load_stops(path).with_context(|| format!("failed to read addresses {}", path.display()))?;
    if let Some(p) = parcels {
        let geocoder = ParcelGeocoder::load(p)
            .with_context(|| format!("failed to read parcels {}", p.display()))?;
        geocode_stops(&mut stops, &geocoder)?;
    }
    Ok(stops)
}

fn run_matrix(
    config: &PlannerConfig,
    stops: &[Stop],
    warehouse_first: bool,
    source: TravelSource,
    speed_kmh: f64,
) -> Result<TravelMatrices> {
    let missing: Vec<usize> = stops
        .iter()
        .filter(|s| s.coordinate().is_none())
        .map(Stop::id)
        .collect();
    if !missing.is_empty() {
        bail!("{} addresses have no coordinates (rows {:?})", missing.len(), missing);
    }
    let mut coords: Vec<Coordinate> = Vec::with_capacity(stops.len() + 1);
    if warehouse_first {
        coords.push(config.warehouse.coordinate);
    }
    coords.extend(stops.iter().filter_map(Stop::coordinate));

    let matrices = match source {
        TravelSource::Haversine => haversine_matrices(&coords, speed_kmh)?,
        TravelSource::Osrm => {
            let osrm: &OsrmConfig = &config.osrm;
            let client = OsrmClient::new(osrm.clone())?;
            large_table(&client, &coords, osrm.max_table_size, osrm.fallback_speed)
                .with_context(|| format!("osrm table request to {} failed", osrm.base_url))?
        }
    };
    Ok(matrices)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    delivery_routes::logging::init(cli.log_json);

    match cli.command {
        Commands::Matrix {
            addresses,
            warehouse_first,
            source,
            speed_kmh,
            parcels,
            config,
            out_dir,
        } => {
            let config = load_config(config.as_deref(), cli.osrm_url)?;
            let stops = load_addresses(&addresses, parcels.as_deref())?;
            let matrices = run_matrix(&config, &stops, warehouse_first, source.into(), speed_kmh)?;
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;
            save_matrix(matrices.durations(), out_dir.join(DURATION_MATRIX_FILE))?;
            save_matrix(matrices.distances(), out_dir.join(DISTANCE_MATRIX_FILE))?;
        }
        Commands::Cluster {
            matrix,
            routes,
            method: MethodArg::Agglomerative,
            warehouse_first,
        } => {
            let mut m = load_matrix(&matrix)
                .with_context(|| format!("failed to read matrix {}", matrix.display()))?;
            if warehouse_first {
                let stops: Vec<usize> = (1..m.size()).collect();
                m = m.submatrix(&stops);
            }
            for label in label_routes(&m, routes)? {
                println!("{label}");
            }
        }
        Commands::Plan {
            addresses,
            routes,
            config,
            source,
            sequencer,
            parcels,
            out_dir,
        } => {
            let mut config = load_config(config.as_deref(), cli.osrm_url)?;
            if let Some(k) = routes {
                config.n_routes = k;
            }
            if let Some(s) = source {
                config.matrix.source = s.into();
            }
            if let Some(s) = sequencer {
                config.sequencing.sequencer = s.into();
            }

            let mut stops = load_addresses(&addresses, parcels.as_deref())?;
            let warehouse = config.warehouse.clone();
            let planner = Planner::new(config);
            let plan = planner.plan(&mut stops).context("planning failed")?;
            output::save_outputs(&out_dir, &stops, &plan, &warehouse)
                .with_context(|| format!("failed to write outputs to {}", out_dir.display()))?;

            let (summary, violations) = planner.summarize(&plan);
            info!(
                routes = summary.routes,
                served = summary.stops_served,
                unassigned = summary.unassigned,
                longest_duration_s = summary.longest_duration,
                shortest_duration_s = summary.shortest_duration,
                mean_stops = summary.mean_stops,
                violations = violations.len(),
                "summary"
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Decode {
            polyline: encoded,
            precision,
        } => {
            for c in polyline::decode(&encoded, precision)? {
                println!("{},{}", c.latitude, c.longitude);
            }
        }
    }
    Ok(())
}
