//! # covmap-raster
//!
//! Point sampling of cellular coverage maps stored as GeoTIFF files.
//!
//! Two kinds of rasters are supported:
//! - **Value rasters**: a single band whose pixel values are the coverage level
//!   (e.g. RSRP in dBm). Lookups return the exact pixel value.
//! - **Rendered maps**: RGB(A) images as published by operators, where each
//!   legend colour stands for a signal band. Colours are decoded through a
//!   [`Palette`], with white meaning no coverage.
//!
//! Query coordinates are WGS84 latitude/longitude. They are reprojected into the
//! raster CRS (read from the GeoKey directory) before the affine geotransform is
//! inverted to find the pixel.
//!
//! ## Example
//!
//! ```no_run
//! use covmap_raster::{Coordinate, CoverageRaster, Palette};
//!
//! let raster = CoverageRaster::from_file("coverage_4g.tif")?;
//! let dublin: Coordinate = "53.2716088,-6.2073869".parse()?;
//!
//! match raster.coverage_at(dublin, &Palette::default(), None)? {
//!     Some(dbm) => println!("Coverage: {} dBm", dbm),
//!     None => println!("No coverage"),
//! }
//! # Ok::<(), covmap_raster::RasterError>(())
//! ```

mod coordinate;
mod error;
pub mod georef;
pub mod palette;
pub mod projection;
mod raster;

pub use coordinate::Coordinate;
pub use error::RasterError;
pub use georef::{GeoKeys, GeoTransform};
pub use palette::{Interpolation, Palette, PaletteLevel};
pub use raster::{CoverageRaster, RasterBounds, RasterLayout};

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
