//! Address geocoding.
//!
//! Geocoding sits behind the [`Geocoder`] trait. The bundled
//! [`ParcelGeocoder`] resolves addresses by exact match against a
//! reference parcel table, the way a municipal address registry lookup
//! works.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::ingest::{load_stops, normalize_address};
use crate::models::{Coordinate, Stop};

/// Resolves a free-text address to a coordinate.
pub trait Geocoder {
    /// Returns `Ok(None)` when the address is unknown.
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>>;
}

/// Exact-match geocoder over a table of known parcel addresses.
///
/// # Examples
///
/// ```
/// use delivery_routes::geocode::{Geocoder, ParcelGeocoder};
/// use delivery_routes::models::Coordinate;
///
/// let g = ParcelGeocoder::from_entries([
///     ("20 COUNTRY HILLS VW NW", Coordinate::new(51.152, -114.088)),
/// ]);
/// let hit = g.geocode("20 Country Hills View NW").unwrap();
/// assert_eq!(hit, Some(Coordinate::new(51.152, -114.088)));
/// assert_eq!(g.geocode("1 NOWHERE RD SE").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParcelGeocoder {
    parcels: HashMap<String, Coordinate>,
}

impl ParcelGeocoder {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        let parcels = entries
            .into_iter()
            .map(|(addr, c)| (normalize_address(addr.as_ref()), c))
            .collect();
        Self { parcels }
    }

    /// Builds the lookup table from an address CSV whose rows all carry
    /// coordinates.
    pub fn from_stops(stops: &[Stop]) -> Result<Self> {
        let mut parcels = HashMap::with_capacity(stops.len());
        for stop in stops {
            let c = stop.coordinate().ok_or_else(|| {
                Error::Csv(format!(
                    "parcel `{}` (row {}) has no coordinates",
                    stop.address(),
                    stop.id()
                ))
            })?;
            parcels.insert(normalize_address(stop.address()), c);
        }
        Ok(Self { parcels })
    }

    /// Loads a parcel table from CSV. See [`crate::ingest::read_stops`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let geocoder = Self::from_stops(&load_stops(path)?)?;
        info!(parcels = geocoder.len(), "parcel table ready");
        Ok(geocoder)
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}

impl Geocoder for ParcelGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        Ok(self.parcels.get(&normalize_address(address)).copied())
    }
}

/// Fills in coordinates for stops that lack them.
///
/// Returns the ids of stops that are still unlocated afterwards. Stops
/// that already have coordinates are left as they are.
pub fn geocode_stops(stops: &mut [Stop], geocoder: &dyn Geocoder) -> Result<Vec<usize>> {
    let mut missing = Vec::new();
    let mut resolved = 0usize;
    for stop in stops.iter_mut().filter(|s| s.coordinate().is_none()) {
        match geocoder.geocode(stop.address())? {
            Some(c) => {
                stop.set_coordinate(c);
                resolved += 1;
            }
            None => {
                warn!(stop = stop.id(), address = stop.address(), "address not found");
                missing.push(stop.id());
            }
        }
    }
    info!(resolved, missing = missing.len(), "geocoding finished");
    Ok(missing)
}
