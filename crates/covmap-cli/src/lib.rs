//! # covmap-cli
//!
//! Command-line driver for coverage lookups: a single `lat,lon` pair with
//! `--coordinates`, or a whole CSV file with `--csv`.

pub mod args;
pub mod batch;
pub mod config;
mod error;
pub mod lookup;

pub use args::Args;
pub use batch::{process_csv, BatchSummary};
pub use error::{CliError, Result};

use covmap_raster::CoverageRaster;
use tracing::info;

/// Execute a parsed command line, printing results to stdout.
pub fn run(args: &Args) -> Result<()> {
    let palette = config::load_palette(args.palette.as_deref())?;

    let raster = CoverageRaster::from_file(&args.geotiff).map_err(|source| CliError::GeoTiff {
        path: args.geotiff.clone(),
        source,
    })?;
    let (width, height) = raster.dimensions();
    info!(
        path = %args.geotiff.display(),
        width,
        height,
        epsg = raster.epsg(),
        "opened coverage raster"
    );

    if let Some(coordinates) = &args.coordinates {
        let level = lookup::lookup(&raster, coordinates, &palette, args.interpolation)?;
        println!("{}", lookup::format_result(coordinates, level));
    } else if let Some(input) = &args.csv {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| batch::default_output_path(input));
        let summary = batch::process_csv(&raster, input, &output, &palette, args.interpolation)?;
        println!("Wrote {} rows to {}", summary.rows, output.display());
    }

    Ok(())
}
