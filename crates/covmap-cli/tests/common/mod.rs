//! Shared fixtures for the CLI integration tests.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// WGS84 GeoKey directory.
const WGS84_KEYS: [u16; 16] = [1, 1, 0, 3, 1024, 0, 1, 2, 1025, 0, 1, 1, 2048, 0, 1, 4326];

/// Per-pixel RSRP values of the value fixture, row-major.
pub const RSRP_VALUES: [f32; 16] = [
    -75.0, -80.0, -85.0, -90.0, //
    -95.0, -100.0, -105.0, -110.0, //
    -9999.0, -81.5, -92.25, -103.0, //
    -70.0, -71.0, -72.0, -73.0,
];

fn write_georef(image: &mut tiff::encoder::DirectoryEncoder<'_, File, tiff::encoder::TiffKindStandard>) {
    image
        .write_tag(Tag::ModelPixelScaleTag, &[0.25f64, 0.25, 0.0][..])
        .unwrap();
    image
        .write_tag(Tag::ModelTiepointTag, &[0.0f64, 0.0, 0.0, -6.5, 53.5, 0.0][..])
        .unwrap();
    image.write_tag(Tag::GeoKeyDirectoryTag, &WGS84_KEYS[..]).unwrap();
}

/// 4x4 single-band RSRP raster over lon -6.5..-5.5, lat 52.5..53.5.
pub fn write_value_raster(dir: &Path) -> PathBuf {
    let path = dir.join("rsrp.tif");
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    let mut image = encoder.new_image::<colortype::Gray32Float>(4, 4).unwrap();
    write_georef(image.encoder());
    image.encoder().write_tag(Tag::GdalNodata, "-9999").unwrap();
    image.write_data(&RSRP_VALUES).unwrap();
    path
}

/// 4x4 rendered map with the same extent: one legend colour per row, last row white.
pub fn write_rgb_raster(dir: &Path) -> PathBuf {
    let path = dir.join("coverage.tif");
    let mut data = Vec::new();
    for colour in [[207u8, 99, 103], [234, 104, 102], [243, 172, 103], [255, 255, 255]] {
        for _ in 0..4 {
            data.extend_from_slice(&colour);
        }
    }
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    let mut image = encoder.new_image::<colortype::RGB8>(4, 4).unwrap();
    write_georef(image.encoder());
    image.write_data(&data).unwrap();
    path
}

/// Latitude/longitude of the centre of pixel `(col, row)` in the fixtures.
pub fn pixel_centre(col: u32, row: u32) -> (f64, f64) {
    (53.5 - 0.25 * (row as f64 + 0.5), -6.5 + 0.25 * (col as f64 + 0.5))
}

/// Run the `covmap` binary with `args`.
pub fn covmap(args: &[&str]) -> Output {
    // CARGO_BIN_EXE_covmap is set by cargo when running tests for this crate
    Command::new(env!("CARGO_BIN_EXE_covmap"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute covmap")
}
