//! Single-coordinate lookups.

use crate::error::Result;
use covmap_raster::{Coordinate, CoverageRaster, Interpolation, Palette};

/// Sample the raster at a `"lat,lon"` string.
pub fn lookup(
    raster: &CoverageRaster,
    coordinates: &str,
    palette: &Palette,
    interpolation: Option<Interpolation>,
) -> Result<Option<f64>> {
    let coordinate: Coordinate = coordinates.parse()?;
    Ok(raster.coverage_at(coordinate, palette, interpolation)?)
}

/// Human-readable result line for a single lookup.
pub fn format_result(coordinates: &str, level: Option<f64>) -> String {
    match level {
        Some(dbm) => format!("Coverage level at coordinates {}: {} dBm", coordinates, dbm),
        None => format!("No coverage at coordinates {}", coordinates),
    }
}
