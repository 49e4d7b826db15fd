//! Address CSV intake.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Coordinate, Stop};

#[derive(Debug, Deserialize)]
struct AddressRow {
    address: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Reads stops from a headered CSV.
///
/// The `address` column is required; `latitude` and `longitude` are
/// optional and must either both be present or both be empty on a row.
/// Header names are matched case-insensitively and other columns are
/// ignored.
///
/// # Examples
///
/// ```
/// use delivery_routes::ingest::read_stops;
///
/// let data = "Address,Longitude,Latitude,Community\n\
///             24 AERO DR NE,-114.0316978,51.1196913,AIRPORT\n\
///             20 COUNTRY HILLS VW NW,,,\n";
/// let stops = read_stops(data.as_bytes()).unwrap();
/// assert_eq!(stops.len(), 2);
/// assert!(stops[0].coordinate().is_some());
/// assert!(stops[1].coordinate().is_none());
/// ```
pub fn read_stops<R: Read>(reader: R) -> Result<Vec<Stop>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    if !headers.iter().any(|h| h == "address") {
        return Err(Error::Csv("missing required column `address`".to_string()));
    }
    reader.set_headers(headers.clone());

    let mut stops = Vec::new();
    for (id, record) in reader.records().enumerate() {
        let line = id + 2;
        let row: AddressRow = record?
            .deserialize(Some(&headers))
            .map_err(|e| Error::Csv(format!("line {line}: {e}")))?;

        if row.address.is_empty() {
            return Err(Error::Csv(format!("line {line}: empty address")));
        }

        let stop = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => {
                let c = Coordinate::new(lat, lon);
                if !c.is_valid() {
                    return Err(Error::Csv(format!(
                        "line {line}: coordinate ({lat}, {lon}) out of range"
                    )));
                }
                Stop::new(id, row.address, c)
            }
            (None, None) => Stop::unlocated(id, row.address),
            _ => {
                return Err(Error::Csv(format!(
                    "line {line}: latitude and longitude must be given together"
                )))
            }
        };
        stops.push(stop);
    }

    debug!(rows = stops.len(), "read address rows");
    Ok(stops)
}

/// Loads stops from a CSV file. See [`read_stops`].
pub fn load_stops(path: impl AsRef<Path>) -> Result<Vec<Stop>> {
    let path = path.as_ref();
    let stops = read_stops(File::open(path)?)?;
    let located = stops.iter().filter(|s| s.coordinate().is_some()).count();
    info!(
        path = %path.display(),
        stops = stops.len(),
        located,
        "loaded addresses"
    );
    Ok(stops)
}
