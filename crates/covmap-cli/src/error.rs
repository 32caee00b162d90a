//! Error types for the coverage CLI.

use covmap_raster::RasterError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a `covmap` run with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// Raster loading or sampling failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The GeoTIFF file could not be opened.
    #[error("Failed to open GeoTIFF file '{path}': {source}")]
    GeoTiff {
        path: PathBuf,
        #[source]
        source: RasterError,
    },

    /// An input file could not be read or an output file written.
    #[error("{action} '{path}': {source}")]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output path points at the input CSV.
    #[error("Output CSV '{path}' is the input CSV; choose a different --output path")]
    SameInputOutput { path: PathBuf },

    /// The CSV header does not start with latitude/longitude columns.
    #[error(
        "CSV file '{path}' must start with 'Latitude' and 'Longitude' header columns (found {found:?})"
    )]
    MissingColumns { path: PathBuf, found: Vec<String> },

    /// Palette configuration could not be parsed.
    #[error("Failed to parse palette file '{path}': {source}")]
    PaletteParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Palette configuration parsed but is unusable.
    #[error("Invalid palette file '{path}': {reason}")]
    InvalidPalette { path: PathBuf, reason: String },
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
