//! In-memory GeoTIFF coverage raster.

use crate::georef::{self, GeoTransform};
use crate::palette::{Interpolation, Palette};
use crate::projection;
use crate::{Coordinate, RasterError, Result};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;
use tracing::debug;

/// How pixel samples translate into coverage levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterLayout {
    /// One band holding the coverage value itself.
    Value,
    /// Gray plus alpha; the gray band holds the value.
    ValueAlpha,
    /// Rendered map: colours are decoded through a [`Palette`].
    Rgb,
    /// Rendered map with an alpha band.
    Rgba,
}

impl RasterLayout {
    fn from_color_type(color_type: ColorType) -> Result<Self> {
        match color_type {
            ColorType::Gray(_) => Ok(RasterLayout::Value),
            ColorType::GrayA(_) => Ok(RasterLayout::ValueAlpha),
            ColorType::RGB(_) => Ok(RasterLayout::Rgb),
            ColorType::RGBA(_) => Ok(RasterLayout::Rgba),
            other => Err(RasterError::UnsupportedLayout(format!("{:?}", other))),
        }
    }

    /// Number of interleaved samples per pixel.
    pub fn samples_per_pixel(self) -> usize {
        match self {
            RasterLayout::Value => 1,
            RasterLayout::ValueAlpha => 2,
            RasterLayout::Rgb => 3,
            RasterLayout::Rgba => 4,
        }
    }
}

/// World-space extent of a raster in its own CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterBounds {
    /// Western edge.
    pub min_x: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Northern edge.
    pub max_y: f64,
}

/// A coverage map loaded from a GeoTIFF file.
///
/// The whole first image is decoded into memory, so the file handle is
/// released as soon as [`CoverageRaster::from_file`] returns.
#[derive(Debug)]
pub struct CoverageRaster {
    /// Samples in row-major order (north to south, west to east), interleaved by band.
    data: Vec<f64>,
    width: u32,
    height: u32,
    layout: RasterLayout,
    transform: GeoTransform,
    epsg: i32,
    /// Values equal to this are treated as missing; on RGB(A) maps all colour bands must match.
    no_data_value: Option<f64>,
}

impl CoverageRaster {
    /// Load a coverage raster from a GeoTIFF file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(std::io::BufReader::new(file))?;

        // National coverage maps can be very large
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let layout = RasterLayout::from_color_type(decoder.colortype()?)?;

        let keys = georef::read_geokeys(&mut decoder);
        let epsg = keys.epsg()?;
        let mut transform = georef::read_geotransform(&mut decoder)?;
        if keys.pixel_is_point() {
            // Tie points refer to pixel centres; move the origin to the pixel corner
            transform = transform.shifted(-0.5, -0.5);
        }
        let no_data_value = georef::read_nodata_value(&mut decoder);

        let data = Self::decode_samples(&mut decoder)?;
        let expected = width as usize * height as usize * layout.samples_per_pixel();
        if data.len() < expected {
            return Err(RasterError::UnsupportedLayout(format!(
                "expected {} interleaved samples, decoded {} (planar or tiled layout?)",
                expected,
                data.len()
            )));
        }

        debug!(
            path = %path.display(),
            width,
            height,
            ?layout,
            epsg,
            ?no_data_value,
            "loaded coverage raster"
        );

        Self::from_parts(data, width, height, layout, transform, epsg, no_data_value)
    }

    /// Build a raster from already decoded samples.
    pub fn from_parts(
        data: Vec<f64>,
        width: u32,
        height: u32,
        layout: RasterLayout,
        transform: GeoTransform,
        epsg: i32,
        no_data_value: Option<f64>,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * layout.samples_per_pixel();
        if width == 0 || height == 0 || data.len() < expected {
            return Err(RasterError::InvalidGeoTiff(format!(
                "{}x{} {:?} raster needs {} samples, got {}",
                width,
                height,
                layout,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
            transform,
            epsg,
            no_data_value,
        })
    }

    fn decode_samples<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Result<Vec<f64>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::U8(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
            DecodingResult::F32(data) => Ok(data.into_iter().map(f64::from).collect()),
            DecodingResult::F64(data) => Ok(data),
        }
    }

    /// Pixel `(col, row)` containing a WGS84 coordinate.
    pub fn pixel_index(&self, coordinate: Coordinate) -> Result<(u32, u32)> {
        let (x, y) = projection::lonlat_to_crs(self.epsg, coordinate.lon, coordinate.lat)?;
        let (col, row) = self.transform.world_to_pixel(x, y);

        let col = col.floor();
        let row = row.floor();
        if col < 0.0 || row < 0.0 || col >= f64::from(self.width) || row >= f64::from(self.height) {
            let bounds = self.bounds();
            return Err(RasterError::OutOfBounds {
                lat: coordinate.lat,
                lon: coordinate.lon,
                epsg: self.epsg,
                min_x: bounds.min_x,
                max_x: bounds.max_x,
                min_y: bounds.min_y,
                max_y: bounds.max_y,
            });
        }
        Ok((col as u32, row as u32))
    }

    /// Raw band values of the pixel under a coordinate.
    pub fn sample(&self, coordinate: Coordinate) -> Result<&[f64]> {
        let (col, row) = self.pixel_index(coordinate)?;
        Ok(self.pixel(col, row))
    }

    /// Coverage level at a coordinate, `None` meaning no coverage.
    ///
    /// Single-band rasters return the pixel value; rendered RGB maps are decoded
    /// through `palette`, optionally interpolated. Transparent pixels and pixels
    /// whose colour bands all equal the no-data value have no coverage.
    pub fn coverage_at(
        &self,
        coordinate: Coordinate,
        palette: &Palette,
        interpolation: Option<Interpolation>,
    ) -> Result<Option<f64>> {
        let samples = self.sample(coordinate)?;
        let level = match self.layout {
            RasterLayout::Value | RasterLayout::ValueAlpha => self.value_level(samples[0]),
            RasterLayout::Rgba if samples[3] == 0.0 => None,
            RasterLayout::Rgb | RasterLayout::Rgba => {
                let rgb = [samples[0], samples[1], samples[2]];
                if self.is_no_data_colour(rgb) {
                    None
                } else {
                    palette.resolve(rgb, interpolation)
                }
            }
        };
        debug!(%coordinate, ?samples, ?level, "sampled coverage");
        Ok(level)
    }

    fn value_level(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        match self.no_data_value {
            Some(nodata) if (value - nodata).abs() < 1e-9 => None,
            _ => Some(value),
        }
    }

    fn is_no_data_colour(&self, rgb: [f64; 3]) -> bool {
        match self.no_data_value {
            Some(nodata) => rgb.iter().all(|band| (band - nodata).abs() < 1e-9),
            None => false,
        }
    }

    fn pixel(&self, col: u32, row: u32) -> &[f64] {
        let spp = self.layout.samples_per_pixel();
        let start = (row as usize * self.width as usize + col as usize) * spp;
        &self.data[start..start + spp]
    }

    /// Dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// How pixel samples are interpreted.
    pub fn layout(&self) -> RasterLayout {
        self.layout
    }

    /// EPSG code of the raster CRS.
    pub fn epsg(&self) -> i32 {
        self.epsg
    }

    /// Pixel-to-world transform, already corrected for PixelIsPoint rasters.
    pub fn geo_transform(&self) -> GeoTransform {
        self.transform
    }

    /// The GDAL_NODATA value, if the file declares one.
    pub fn no_data_value(&self) -> Option<f64> {
        self.no_data_value
    }

    /// Extent of the pixel grid in raster CRS units.
    pub fn bounds(&self) -> RasterBounds {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let corners = [
            self.transform.pixel_to_world(0.0, 0.0),
            self.transform.pixel_to_world(w, 0.0),
            self.transform.pixel_to_world(0.0, h),
            self.transform.pixel_to_world(w, h),
        ];
        corners.iter().fold(
            RasterBounds {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, &(x, y)| RasterBounds {
                min_x: b.min_x.min(x),
                max_x: b.max_x.max(x),
                min_y: b.min_y.min(y),
                max_y: b.max_y.max(y),
            },
        )
    }
}
