use clap::{ArgGroup, Parser};
use covmap_raster::Interpolation;
use std::path::PathBuf;

/// Get the coverage level at specified coordinates in a GeoTIFF coverage map.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["coordinates", "csv"])))]
pub struct Args {
    /// Path to the GeoTIFF file.
    #[arg(short, long)]
    pub geotiff: PathBuf,

    /// Latitude and longitude separated by a comma (e.g. '53.2716088,-6.2073869').
    #[arg(short, long, allow_hyphen_values = true)]
    pub coordinates: Option<String>,

    /// CSV file whose first two columns are Latitude and Longitude.
    #[arg(short = 'f', long)]
    pub csv: Option<PathBuf>,

    /// Output CSV file (batch mode). Defaults to `<csv stem>_coverage_prediction.csv`.
    #[arg(short, long, requires = "csv")]
    pub output: Option<PathBuf>,

    /// Interpolate between legend levels of rendered (RGB) maps.
    #[arg(short, long, value_name = "linear|average")]
    pub interpolation: Option<Interpolation>,

    /// YAML file replacing the built-in RGB to dBm legend.
    #[arg(short, long)]
    pub palette: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "covmap_raster=debug").
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
