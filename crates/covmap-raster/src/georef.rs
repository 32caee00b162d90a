//! GeoTIFF georeferencing: affine transform and GeoKey directory.

use crate::{RasterError, Result};
use std::io::{Read, Seek};
use tiff::decoder::Decoder;
use tiff::tags::Tag;

const GEO_KEY_MODEL_TYPE: u16 = 1024;
const GEO_KEY_RASTER_TYPE: u16 = 1025;
const GEO_KEY_GEOGRAPHIC_TYPE: u16 = 2048;
const GEO_KEY_PROJECTED_CRS: u16 = 3072;

const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_POINT: u16 = 2;
const USER_DEFINED: u16 = 32767;

/// Affine pixel-to-world transform in GDAL coefficient order.
///
/// `x = origin_x + col * pixel_width + row * row_rotation`
/// `y = origin_y + col * col_rotation + row * pixel_height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// World x of the top-left corner of pixel (0, 0).
    pub origin_x: f64,
    /// x change per column.
    pub pixel_width: f64,
    /// x change per row.
    pub row_rotation: f64,
    /// World y of the top-left corner of pixel (0, 0).
    pub origin_y: f64,
    /// y change per column.
    pub col_rotation: f64,
    /// y change per row (negative for north-up rasters).
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform from a tie point and pixel scale.
    ///
    /// The tie point maps raster position `(i, j)` to world `(x, y)`.
    pub fn from_tiepoint(tiepoint: &[f64], scale: &[f64]) -> Result<Self> {
        if tiepoint.len() < 6 || scale.len() < 2 {
            return Err(RasterError::InvalidGeoTiff(format!(
                "ModelTiepoint needs 6 values and ModelPixelScale 2 (got {} and {})",
                tiepoint.len(),
                scale.len()
            )));
        }
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (scale_x, scale_y) = (scale[0], scale[1]);
        if scale_x == 0.0 || scale_y == 0.0 {
            return Err(RasterError::InvalidGeoTiff("ModelPixelScale is zero".to_string()));
        }

        Ok(Self {
            origin_x: x - i * scale_x,
            pixel_width: scale_x,
            row_rotation: 0.0,
            origin_y: y + j * scale_y,
            col_rotation: 0.0,
            pixel_height: -scale_y,
        })
    }

    /// Transform from the 4x4 row-major ModelTransformation matrix.
    pub fn from_matrix(matrix: &[f64]) -> Result<Self> {
        if matrix.len() < 16 {
            return Err(RasterError::InvalidGeoTiff(format!(
                "ModelTransformation needs 16 values (got {})",
                matrix.len()
            )));
        }
        let transform = Self {
            origin_x: matrix[3],
            pixel_width: matrix[0],
            row_rotation: matrix[1],
            origin_y: matrix[7],
            col_rotation: matrix[4],
            pixel_height: matrix[5],
        };
        if transform.determinant() == 0.0 {
            return Err(RasterError::InvalidGeoTiff(
                "ModelTransformation is not invertible".to_string(),
            ));
        }
        Ok(transform)
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    /// Shift the transform by a fraction of a pixel along both axes.
    pub(crate) fn shifted(&self, cols: f64, rows: f64) -> Self {
        let (x, y) = self.pixel_to_world(cols, rows);
        Self {
            origin_x: x,
            origin_y: y,
            ..*self
        }
    }

    /// World coordinates of a (fractional) pixel position.
    pub fn pixel_to_world(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Fractional pixel position of a world coordinate.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.determinant();
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (dx * self.pixel_height - dy * self.row_rotation) / det;
        let row = (dy * self.pixel_width - dx * self.col_rotation) / det;
        (col, row)
    }
}

/// The subset of GeoKeys needed to place the raster on the globe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_type: Option<u16>,
}

impl GeoKeys {
    /// Parse the GeoKeyDirectory SHORT array.
    ///
    /// Layout: a 4-value header (version, revision, minor, key count) followed by
    /// `(key id, tag location, count, value)` quadruples. Only keys stored inline
    /// (tag location 0) are read.
    pub fn parse(directory: &[u16]) -> Self {
        let mut keys = Self::default();
        if directory.len() < 4 {
            return keys;
        }

        let count = directory[3] as usize;
        for entry in directory[4..].chunks_exact(4).take(count) {
            let (key_id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                continue;
            }
            match key_id {
                GEO_KEY_MODEL_TYPE => keys.model_type = Some(value),
                GEO_KEY_RASTER_TYPE => keys.raster_type = Some(value),
                GEO_KEY_GEOGRAPHIC_TYPE => keys.geographic_type = Some(value),
                GEO_KEY_PROJECTED_CRS => keys.projected_type = Some(value),
                _ => {}
            }
        }
        keys
    }

    /// EPSG code of the raster CRS; rasters with no CRS keys are treated as WGS84.
    pub fn epsg(&self) -> Result<i32> {
        let code = match (self.projected_type, self.geographic_type, self.model_type) {
            (Some(projected), _, _) if projected != 0 => projected,
            (_, Some(geographic), _) if geographic != 0 => geographic,
            (_, _, Some(model)) if model != MODEL_TYPE_GEOGRAPHIC => {
                return Err(RasterError::InvalidGeoTiff(
                    "projected raster without ProjectedCSTypeGeoKey".to_string(),
                ))
            }
            _ => return Ok(crate::projection::WGS84_EPSG),
        };
        if code == USER_DEFINED {
            return Err(RasterError::UnsupportedCrs(i32::from(code)));
        }
        Ok(i32::from(code))
    }

    /// Whether pixel values refer to pixel centres rather than areas.
    pub fn pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }
}

/// Read the affine transform of the current image.
pub(crate) fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoTransform> {
    if let Ok(matrix) = decoder.get_tag_f64_vec(Tag::ModelTransformationTag) {
        return GeoTransform::from_matrix(&matrix);
    }

    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
    let pixel_scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);
    match (tiepoint, pixel_scale) {
        (Ok(tiepoint), Ok(scale)) => GeoTransform::from_tiepoint(&tiepoint, &scale),
        _ => Err(RasterError::InvalidGeoTiff(
            "missing ModelTiepoint/ModelPixelScale or ModelTransformation tags".to_string(),
        )),
    }
}

/// Read the GeoKey directory; a raster without one yields empty keys.
pub(crate) fn read_geokeys<R: Read + Seek>(decoder: &mut Decoder<R>) -> GeoKeys {
    decoder
        .get_tag_u16_vec(Tag::GeoKeyDirectoryTag)
        .map(|directory| GeoKeys::parse(&directory))
        .unwrap_or_default()
}

/// Read the GDAL_NODATA value, stored as an ASCII string.
pub(crate) fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()
        .and_then(|value| value.trim_matches(char::from(0)).trim().parse().ok())
}
