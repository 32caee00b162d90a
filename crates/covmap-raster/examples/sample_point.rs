//! Example: sample a coverage map at one coordinate.
//!
//! Usage: cargo run --example sample_point -- <geotiff> <lat> <lon>

use covmap_raster::{Coordinate, CoverageRaster, Palette};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <geotiff> <lat> <lon>", args[0]);
        eprintln!("Example: {} coverage_4g.tif 53.2716088 -6.2073869", args[0]);
        std::process::exit(1);
    }

    let coordinate = match Coordinate::from_fields(&args[2], &args[3]) {
        Ok(coordinate) => coordinate,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Loading {}...", args[1]);
    let start = Instant::now();
    let raster = match CoverageRaster::from_file(&args[1]) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (width, height) = raster.dimensions();
    let bounds = raster.bounds();
    println!(
        "Loaded {}x{} {:?} raster in {:.3}s",
        width,
        height,
        raster.layout(),
        start.elapsed().as_secs_f64()
    );
    println!(
        "Extent (EPSG:{}): x {:.2} to {:.2}, y {:.2} to {:.2}",
        raster.epsg(),
        bounds.min_x,
        bounds.max_x,
        bounds.min_y,
        bounds.max_y
    );

    match raster.pixel_index(coordinate) {
        Ok((col, row)) => println!("\n{} falls in pixel ({}, {})", coordinate, col, row),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    match raster.coverage_at(coordinate, &Palette::default(), None) {
        Ok(Some(dbm)) => println!("Coverage: {} dBm", dbm),
        Ok(None) => println!("No coverage"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
