//! Travel matrices larger than a single `/table` request allows.
//!
//! OSRM servers cap the size of a table request (`--max-table-size`,
//! 100 by default). Larger matrices are fetched as a grid of
//! sources×destinations blocks, each request sending the full coordinate
//! list and selecting a block by index.

use std::ops::Range;
use std::time::Instant;

use tracing::{debug, info};

use super::client::OsrmClient;
use super::params::{Indices, TableAnnotation, TableOptions, TripOptions};
use super::response::{TableResponse, TripResponse};
use crate::distance::{DistanceMatrix, TravelMatrices};
use crate::error::{Error, Result};
use crate::models::Coordinate;

/// Anything that answers OSRM `/table` requests.
pub trait TableService {
    fn table(&self, coordinates: &[Coordinate], options: &TableOptions) -> Result<TableResponse>;
}

/// Anything that answers OSRM `/trip` requests.
pub trait TripService {
    fn trip(&self, coordinates: &[Coordinate], options: &TripOptions) -> Result<TripResponse>;
}

impl TableService for OsrmClient {
    fn table(&self, coordinates: &[Coordinate], options: &TableOptions) -> Result<TableResponse> {
        OsrmClient::table(self, coordinates, options)
    }
}

impl TripService for OsrmClient {
    fn trip(&self, coordinates: &[Coordinate], options: &TripOptions) -> Result<TripResponse> {
        OsrmClient::trip(self, coordinates, options)
    }
}

/// Fetches full duration and distance matrices in `block`-sized pieces.
///
/// Issues ⌈n/block⌉² requests. A `null` cell in any block fails with
/// [`Error::Unroutable`] naming the global location indices.
pub fn large_table<S>(
    service: &S,
    coordinates: &[Coordinate],
    block: usize,
    fallback_speed: Option<f64>,
) -> Result<TravelMatrices>
where
    S: TableService + ?Sized,
{
    if block == 0 {
        return Err(Error::InvalidArgument("table block size must be positive".to_string()));
    }
    let n = coordinates.len();
    let mut durations = DistanceMatrix::new(n);
    let mut distances = DistanceMatrix::new(n);
    if n == 0 {
        return TravelMatrices::new(durations, distances);
    }

    let started = Instant::now();
    let chunks = n.div_ceil(block);
    let span = |k: usize| k * block..((k + 1) * block).min(n);

    for i in 0..chunks {
        let rows = span(i);
        for j in 0..chunks {
            let cols = span(j);
            let options = TableOptions {
                sources: Indices::List(rows.clone().collect()),
                destinations: Indices::List(cols.clone().collect()),
                annotations: vec![TableAnnotation::Duration, TableAnnotation::Distance],
                fallback_speed,
                ..TableOptions::default()
            };
            let response = service.table(coordinates, &options)?;
            copy_block(response.durations.as_deref(), "durations", &rows, &cols, &mut durations)?;
            copy_block(response.distances.as_deref(), "distances", &rows, &cols, &mut distances)?;
            debug!(row_block = i, col_block = j, "table block fetched");
        }
    }

    info!(
        locations = n,
        requests = chunks * chunks,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "travel matrices fetched"
    );
    TravelMatrices::new(durations, distances)
}

fn copy_block(
    block: Option<&[Vec<Option<f64>>]>,
    name: &str,
    rows: &Range<usize>,
    cols: &Range<usize>,
    target: &mut DistanceMatrix,
) -> Result<()> {
    let block = block.ok_or_else(|| Error::Matrix(format!("table response has no {name}")))?;
    if block.len() != rows.len() || block.iter().any(|r| r.len() != cols.len()) {
        return Err(Error::Matrix(format!(
            "{name} block for sources {rows:?} x destinations {cols:?} has the wrong shape"
        )));
    }
    for (r, row) in block.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (from, to) = (rows.start + r, cols.start + c);
            let value = cell.ok_or(Error::Unroutable { from, to })?;
            target.set(from, to, value);
        }
    }
    Ok(())
}
