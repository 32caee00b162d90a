//! Error types for the raster crate.

use thiserror::Error;

/// Errors that can occur when reading or sampling a coverage raster.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing or inconsistent georeferencing tags.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// The image layout (colour type / bands) cannot be turned into coverage values.
    #[error("Unsupported raster layout: {0}")]
    UnsupportedLayout(String),

    /// The raster CRS has no usable EPSG definition.
    #[error("Unsupported coordinate reference system: EPSG:{0}")]
    UnsupportedCrs(i32),

    /// Reprojection between two CRSs failed.
    #[error("Projection error: {0}")]
    Projection(String),

    /// A coordinate string or value could not be parsed or is out of range.
    #[error("Invalid coordinates '{input}': {reason}")]
    InvalidCoordinate {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Coordinate is outside the pixel grid of the raster.
    #[error(
        "Coordinate ({lat}, {lon}) is outside raster bounds \
         (x {min_x}..{max_x}, y {min_y}..{max_y} in EPSG:{epsg})"
    )]
    OutOfBounds {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
        /// Raster CRS.
        epsg: i32,
        /// Raster minimum x in raster CRS units.
        min_x: f64,
        /// Raster maximum x in raster CRS units.
        max_x: f64,
        /// Raster minimum y in raster CRS units.
        min_y: f64,
        /// Raster maximum y in raster CRS units.
        max_y: f64,
    },
}
