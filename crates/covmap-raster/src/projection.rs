//! Coordinate reprojection using pure Rust (proj4rs + crs-definitions).

use crate::{RasterError, Result};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

/// EPSG code of WGS84 longitude/latitude.
pub const WGS84_EPSG: i32 = 4326;

/// Look up the PROJ.4 definition of an EPSG code.
pub fn proj_string(epsg: i32) -> Option<&'static str> {
    u16::try_from(epsg)
        .ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.proj4)
}

/// Whether an EPSG code is a geographic (degree-based) CRS.
pub fn is_geographic(epsg: i32) -> bool {
    match proj_string(epsg) {
        Some(def) => def.contains("+proj=longlat"),
        None => epsg == WGS84_EPSG,
    }
}

/// Project a point from one CRS to another.
///
/// Geographic coordinates are given and returned in degrees, x = longitude.
pub fn project_point(source_epsg: i32, target_epsg: i32, x: f64, y: f64) -> Result<(f64, f64)> {
    if source_epsg == target_epsg {
        return Ok((x, y));
    }

    let source = load_proj(source_epsg)?;
    let target = load_proj(target_epsg)?;

    // proj4rs works in radians for geographic systems
    let mut point = if is_geographic(source_epsg) {
        (x.to_radians(), y.to_radians(), 0.0)
    } else {
        (x, y, 0.0)
    };

    transform(&source, &target, &mut point).map_err(|e| {
        RasterError::Projection(format!(
            "EPSG:{} -> EPSG:{} failed for ({}, {}): {:?}",
            source_epsg, target_epsg, x, y, e
        ))
    })?;

    let (out_x, out_y) = if is_geographic(target_epsg) {
        (point.0.to_degrees(), point.1.to_degrees())
    } else {
        (point.0, point.1)
    };

    if !out_x.is_finite() || !out_y.is_finite() {
        return Err(RasterError::Projection(format!(
            "EPSG:{} -> EPSG:{} produced a non-finite result for ({}, {})",
            source_epsg, target_epsg, x, y
        )));
    }

    Ok((out_x, out_y))
}

/// Project a WGS84 latitude/longitude into `target_epsg` coordinates.
pub fn lonlat_to_crs(target_epsg: i32, lon: f64, lat: f64) -> Result<(f64, f64)> {
    project_point(WGS84_EPSG, target_epsg, lon, lat)
}

fn load_proj(epsg: i32) -> Result<Proj> {
    let def = proj_string(epsg).ok_or(RasterError::UnsupportedCrs(epsg))?;
    Proj::from_proj_string(def)
        .map_err(|e| RasterError::Projection(format!("invalid definition for EPSG:{}: {:?}", epsg, e)))
}
