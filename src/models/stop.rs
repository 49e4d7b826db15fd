//! Delivery stop, warehouse, and coordinate types.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
///
/// # Examples
///
/// ```
/// use delivery_routes::models::Coordinate;
///
/// let c = Coordinate::new(51.1196913, -114.0316978);
/// assert_eq!(c.to_osrm(), "-114.0316978,51.1196913");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Renders the coordinate as OSRM expects it: `longitude,latitude`.
    pub fn to_osrm(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }

    /// Returns `true` if both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A delivery address, optionally already geocoded.
///
/// `id` is the zero-based row of the address in its input file and is
/// the key used by route assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    id: usize,
    address: String,
    coordinate: Option<Coordinate>,
}

impl Stop {
    /// Creates a stop with a known position.
    pub fn new(id: usize, address: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            address: address.into(),
            coordinate: Some(coordinate),
        }
    }

    /// Creates a stop that still needs geocoding.
    pub fn unlocated(id: usize, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            coordinate: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Sets the position after geocoding.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
    }
}

/// The single depot every route starts from.
///
/// The default is the Calgary warehouse at `24 AERO DR NE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub address: String,
    pub coordinate: Coordinate,
}

impl Warehouse {
    pub fn new(address: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            address: address.into(),
            coordinate,
        }
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Self::new("24 AERO DR NE", Coordinate::new(51.1196913, -114.0316978))
    }
}
