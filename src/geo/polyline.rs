//! Encoded polyline format.
//!
//! OSRM returns route geometry as Google encoded polylines, either with
//! five decimal places (`polyline`) or six (`polyline6`). Each point is
//! stored as the delta from the previous one, latitude first, zig-zag
//! encoded and split into 5-bit chunks offset by 63.

use crate::error::{Error, Result};
use crate::models::Coordinate;

/// Precision of OSRM `geometries=polyline`.
pub const PRECISION_5: u32 = 5;
/// Precision of OSRM `geometries=polyline6`.
pub const PRECISION_6: u32 = 6;

/// Encodes a sequence of coordinates.
///
/// # Examples
///
/// ```
/// use delivery_routes::geo::polyline;
/// use delivery_routes::models::Coordinate;
///
/// let pts = [
///     Coordinate::new(38.5, -120.2),
///     Coordinate::new(40.7, -120.95),
///     Coordinate::new(43.252, -126.453),
/// ];
/// assert_eq!(polyline::encode(&pts, 5), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// ```
pub fn encode(coordinates: &[Coordinate], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for c in coordinates {
        let lat = (c.latitude * factor).round() as i64;
        let lon = (c.longitude * factor).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}

fn encode_value(delta: i64, out: &mut String) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut v = zigzag as u64;
    while v >= 0x20 {
        out.push(char::from((((v & 0x1f) | 0x20) + 63) as u8));
        v >>= 5;
    }
    out.push(char::from((v + 63) as u8));
}

/// Decodes an encoded polyline.
///
/// Fails with [`Error::Polyline`] on characters outside the encoding
/// alphabet, when the input ends in the middle of a point, or when a
/// coordinate leaves the ±180° range.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>> {
    let factor = 10f64.powi(precision as i32);
    let limit = 10i64
        .checked_pow(precision)
        .and_then(|f| f.checked_mul(180))
        .unwrap_or(i64::MAX);
    let bytes = encoded.as_bytes();
    let mut pos = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;
    let mut points = Vec::new();

    while pos < bytes.len() {
        let start = pos;
        lat = accumulate(lat, decode_value(bytes, &mut pos)?, limit, start)?;
        if pos >= bytes.len() {
            return Err(Error::Polyline(format!(
                "missing longitude after latitude at byte {pos}"
            )));
        }
        let start = pos;
        lon = accumulate(lon, decode_value(bytes, &mut pos)?, limit, start)?;
        points.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
    }
    Ok(points)
}

fn accumulate(current: i64, delta: i64, limit: i64, pos: usize) -> Result<i64> {
    let value = current
        .checked_add(delta)
        .ok_or_else(|| Error::Polyline(format!("coordinate overflow at byte {pos}")))?;
    if value.unsigned_abs() > limit.unsigned_abs() {
        return Err(Error::Polyline(format!("coordinate out of range at byte {pos}")));
    }
    Ok(value)
}

fn decode_value(bytes: &[u8], pos: &mut usize) -> Result<i64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let Some(&b) = bytes.get(*pos) else {
            return Err(Error::Polyline(format!("truncated value at byte {}", *pos)));
        };
        if !(63..=126).contains(&b) {
            return Err(Error::Polyline(format!(
                "invalid character {:?} at byte {}",
                b as char, *pos
            )));
        }
        if shift > 60 {
            return Err(Error::Polyline(format!("value too long at byte {}", *pos)));
        }
        *pos += 1;
        let chunk = u64::from(b - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok(value)
}
