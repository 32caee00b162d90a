//! Integration tests reading GeoTIFF files written with the `tiff` encoder.

use approx::assert_abs_diff_eq;
use covmap_raster::{
    projection, Coordinate, CoverageRaster, Interpolation, Palette, RasterError, RasterLayout,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

const STRONG: [u8; 3] = [207, 99, 103];
const WEAK: [u8; 3] = [248, 209, 191];
const MID: [u8; 3] = [243, 172, 103];
const WHITE: [u8; 3] = [255, 255, 255];

/// GeoKey directory declaring a geographic or projected EPSG code.
fn geokeys(epsg: u16, pixel_is_point: bool) -> Vec<u16> {
    let geographic = epsg == 4326;
    vec![
        1,
        1,
        0,
        3,
        1024,
        0,
        1,
        if geographic { 2 } else { 1 },
        1025,
        0,
        1,
        if pixel_is_point { 2 } else { 1 },
        if geographic { 2048 } else { 3072 },
        0,
        1,
        epsg,
    ]
}

/// Write a 4x4 RGB coverage map: row 0 strong, row 1 mid, row 2 weak, row 3 white.
fn write_rgb_map(path: &Path, tiepoint: [f64; 6], scale: [f64; 3], keys: &[u16]) {
    let mut data = Vec::new();
    for colour in [STRONG, MID, WEAK, WHITE] {
        for _ in 0..4 {
            data.extend_from_slice(&colour);
        }
    }

    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    let mut image = encoder.new_image::<colortype::RGB8>(4, 4).unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &scale[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, keys)
        .unwrap();
    image.write_data(&data).unwrap();
}

fn wgs84_map(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("coverage.tif");
    write_rgb_map(
        &path,
        [0.0, 0.0, 0.0, -6.5, 53.5, 0.0],
        [0.25, 0.25, 0.0],
        &geokeys(4326, false),
    );
    path
}

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

#[test]
fn test_load_rgb_map() {
    let dir = TempDir::new().unwrap();
    let raster = CoverageRaster::from_file(wgs84_map(&dir)).expect("Failed to load raster");

    assert_eq!(raster.dimensions(), (4, 4));
    assert_eq!(raster.layout(), RasterLayout::Rgb);
    assert_eq!(raster.epsg(), 4326);

    let bounds = raster.bounds();
    assert_abs_diff_eq!(bounds.min_x, -6.5);
    assert_abs_diff_eq!(bounds.max_x, -5.5);
    assert_abs_diff_eq!(bounds.min_y, 52.5);
    assert_abs_diff_eq!(bounds.max_y, 53.5);
}

#[test]
fn test_rgb_lookup_per_row() {
    let dir = TempDir::new().unwrap();
    let raster = CoverageRaster::from_file(wgs84_map(&dir)).unwrap();
    let palette = Palette::default();

    let lookup = |lat| raster.coverage_at(coord(lat, -6.0), &palette, None).unwrap();
    assert_eq!(lookup(53.4), Some(-80.0));
    assert_eq!(lookup(53.2), Some(-100.0));
    assert_eq!(lookup(52.9), Some(-108.0));
    assert_eq!(lookup(52.6), None);

    let average = raster
        .coverage_at(coord(53.2, -6.0), &palette, Some(Interpolation::Average))
        .unwrap();
    assert_eq!(average, Some(-95.0));
}

#[test]
fn test_out_of_extent_is_an_error() {
    let dir = TempDir::new().unwrap();
    let raster = CoverageRaster::from_file(wgs84_map(&dir)).unwrap();

    let err = raster
        .coverage_at(coord(51.9, -8.5), &Palette::default(), None)
        .unwrap_err();
    assert!(matches!(err, RasterError::OutOfBounds { .. }));
    assert!(err.to_string().contains("outside raster bounds"));
}

#[test]
fn test_value_raster_with_nodata() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rsrp.tif");

    let data: Vec<f32> = vec![
        -75.5, -82.0, -9999.0, -101.25, //
        -90.0, -95.0, -99.0, -110.0,
    ];
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    let mut image = encoder.new_image::<colortype::Gray32Float>(4, 2).unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &[0.5f64, 0.5, 0.0][..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &[0.0f64, 0.0, 0.0, 10.0, 50.0, 0.0][..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, &geokeys(4326, false)[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::GdalNodata, "-9999")
        .unwrap();
    image.write_data(&data).unwrap();

    let raster = CoverageRaster::from_file(&path).unwrap();
    assert_eq!(raster.layout(), RasterLayout::Value);
    assert_eq!(raster.no_data_value(), Some(-9999.0));

    let palette = Palette::default();
    let lookup = |lat, lon| raster.coverage_at(coord(lat, lon), &palette, None).unwrap();
    assert_eq!(lookup(49.9, 10.1), Some(-75.5));
    assert_eq!(lookup(49.9, 11.8), Some(-101.25));
    assert_eq!(lookup(49.4, 10.6), Some(-95.0));
    assert_eq!(lookup(49.9, 11.2), None);
}

#[test]
fn test_rgba_map_transparency() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rgba.tif");

    // Opaque strong pixel next to a transparent one with the same colour
    let data = [207u8, 99, 103, 255, 207, 99, 103, 0];
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    let mut image = encoder.new_image::<colortype::RGBA8>(2, 1).unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &[1.0f64, 1.0, 0.0][..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &[0.0f64, 0.0, 0.0, 0.0, 1.0, 0.0][..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, &geokeys(4326, false)[..])
        .unwrap();
    image.write_data(&data).unwrap();

    let raster = CoverageRaster::from_file(&path).unwrap();
    assert_eq!(raster.layout(), RasterLayout::Rgba);

    let palette = Palette::default();
    assert_eq!(raster.coverage_at(coord(0.5, 0.5), &palette, None).unwrap(), Some(-80.0));
    assert_eq!(raster.coverage_at(coord(0.5, 1.5), &palette, None).unwrap(), None);
}

#[test]
fn test_web_mercator_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mercator.tif");

    // 1 km pixels with the top-left corner 1.5 km north-west of Dublin
    let (x, y) = projection::lonlat_to_crs(3857, -6.2603, 53.3498).unwrap();
    write_rgb_map(
        &path,
        [0.0, 0.0, 0.0, x - 1500.0, y + 1500.0, 0.0],
        [1000.0, 1000.0, 0.0],
        &geokeys(3857, false),
    );

    let raster = CoverageRaster::from_file(&path).unwrap();
    assert_eq!(raster.epsg(), 3857);

    // Dublin falls into pixel (1, 1): the mid row
    let dublin = coord(53.3498, -6.2603);
    assert_eq!(raster.pixel_index(dublin).unwrap(), (1, 1));
    assert_eq!(
        raster.coverage_at(dublin, &Palette::default(), None).unwrap(),
        Some(-100.0)
    );

    // Cork is far outside the 4 km map
    assert!(raster.pixel_index(coord(51.8985, -8.4756)).is_err());
}

#[test]
fn test_pixel_is_point_shifts_origin() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("point.tif");
    write_rgb_map(
        &path,
        [0.0, 0.0, 0.0, 0.5, 4.5, 0.0],
        [1.0, 1.0, 0.0],
        &geokeys(4326, true),
    );

    let raster = CoverageRaster::from_file(&path).unwrap();
    // Tie point is the centre of pixel (0, 0), so the grid starts at (0, 5)
    let transform = raster.geo_transform();
    assert_abs_diff_eq!(transform.origin_x, 0.0);
    assert_abs_diff_eq!(transform.origin_y, 5.0);
    let bounds = raster.bounds();
    assert_abs_diff_eq!(bounds.min_x, 0.0);
    assert_abs_diff_eq!(bounds.max_y, 5.0);
    assert_eq!(raster.pixel_index(coord(4.9, 0.1)).unwrap(), (0, 0));
    assert_eq!(raster.pixel_index(coord(1.1, 3.9)).unwrap(), (3, 3));
}

#[test]
fn test_missing_georeferencing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.tif");
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray8>(2, 2, &[0, 1, 2, 3])
        .unwrap();

    let err = CoverageRaster::from_file(&path).unwrap_err();
    assert!(matches!(err, RasterError::InvalidGeoTiff(_)), "{:?}", err);
}

#[test]
fn test_missing_file() {
    let err = CoverageRaster::from_file("/nonexistent/coverage.tif").unwrap_err();
    assert!(matches!(err, RasterError::Io(_)));
}
