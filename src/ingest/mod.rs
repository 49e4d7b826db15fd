//! Address intake: CSV loading and address normalization.

mod addresses;
mod street_types;

pub use addresses::{load_stops, read_stops};
pub use street_types::{
    normalize_address, street_type_abbreviation, street_type_name, STREET_TYPES,
};
