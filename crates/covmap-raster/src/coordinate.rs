//! WGS84 latitude/longitude pairs.

use crate::{RasterError, Result};
use std::fmt;
use std::str::FromStr;

/// A WGS84 (EPSG:4326) coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees (positive = north).
    pub lat: f64,
    /// Longitude in decimal degrees (negative = west).
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating that it lies on the globe.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let input = format!("{},{}", lat, lon);
        if !lat.is_finite() || !lon.is_finite() {
            return Err(RasterError::InvalidCoordinate {
                input,
                reason: "values must be finite numbers".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RasterError::InvalidCoordinate {
                input,
                reason: "latitude must be between -90 and 90".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RasterError::InvalidCoordinate {
                input,
                reason: "longitude must be between -180 and 180".to_string(),
            });
        }
        Ok(Self { lat, lon })
    }

    /// Parse separate latitude and longitude fields, e.g. two CSV columns.
    pub fn from_fields(lat: &str, lon: &str) -> Result<Self> {
        let invalid = |reason: &str| RasterError::InvalidCoordinate {
            input: format!("{},{}", lat.trim(), lon.trim()),
            reason: reason.to_string(),
        };
        let lat_value: f64 = lat
            .trim()
            .parse()
            .map_err(|_| invalid("latitude is not a number"))?;
        let lon_value: f64 = lon
            .trim()
            .parse()
            .map_err(|_| invalid("longitude is not a number"))?;
        Self::new(lat_value, lon_value)
    }
}

impl FromStr for Coordinate {
    type Err = RasterError;

    /// Parse `"lat,lon"`, e.g. `"53.2716088,-6.2073869"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => Self::from_fields(lat, lon),
            _ => Err(RasterError::InvalidCoordinate {
                input: s.to_string(),
                reason: "expected \"<latitude>,<longitude>\"".to_string(),
            }),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}
