//! CSV batch lookups.
//!
//! The input CSV must start with `Latitude` and `Longitude` columns. Every
//! input row is copied to the output with an `RSRP` column appended; rows that
//! cannot be sampled get `Null` and a warning in the log.

use crate::error::{CliError, Result};
use covmap_raster::{Coordinate, CoverageRaster, Interpolation, Palette, RasterError};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rows processed between output flushes and progress reports.
pub const BATCH_SIZE: usize = 20;

/// Name of the appended coverage column.
pub const COVERAGE_COLUMN: &str = "RSRP";

/// Value written when a row has no coverage or could not be sampled.
pub const NULL_VALUE: &str = "Null";

/// Counts from a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data rows written (header excluded).
    pub rows: usize,
    /// Rows with a coverage value.
    pub covered: usize,
    /// Rows inside the raster without coverage.
    pub no_coverage: usize,
    /// Rows with malformed or out-of-bounds coordinates.
    pub failed: usize,
}

/// Default output path: `<dir>/<stem>_coverage_prediction.csv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "coordinates".to_string());
    input.with_file_name(format!("{}_coverage_prediction.csv", stem))
}

/// Annotate every row of `input` with its coverage level and write `output`.
///
/// The header is validated before `output` is created, so a rejected input
/// leaves no output file behind. Writing over the input itself is refused.
pub fn process_csv(
    raster: &CoverageRaster,
    input: &Path,
    output: &Path,
    palette: &Palette,
    interpolation: Option<Interpolation>,
) -> Result<BatchSummary> {
    let file = File::open(input).map_err(|source| CliError::File {
        action: "Failed to open CSV file",
        path: input.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers()?.clone();
    check_headers(&headers).map_err(|found| CliError::MissingColumns {
        path: input.to_path_buf(),
        found,
    })?;

    if is_same_file(input, output) {
        return Err(CliError::SameInputOutput {
            path: output.to_path_buf(),
        });
    }
    let out = File::create(output).map_err(|source| CliError::File {
        action: "Failed to create output CSV",
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(out);

    info!(
        input = %input.display(),
        output = %output.display(),
        "processing coordinates"
    );
    let summary = annotate_rows(raster, &mut reader, &headers, &mut writer, palette, interpolation)?;
    info!(
        rows = summary.rows,
        covered = summary.covered,
        no_coverage = summary.no_coverage,
        failed = summary.failed,
        "batch complete"
    );
    Ok(summary)
}

/// Whether `output` names the already existing `input` file, through any path spelling.
fn is_same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

/// Check that the first two header columns are latitude and longitude.
///
/// Returns the header fields on mismatch, for the error message.
fn check_headers(headers: &StringRecord) -> std::result::Result<(), Vec<String>> {
    let normalized: Vec<String> = headers
        .iter()
        .take(2)
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();
    if normalized == ["latitude", "longitude"] {
        Ok(())
    } else {
        Err(headers.iter().map(str::to_string).collect())
    }
}

/// Copy rows from `reader` to `writer`, appending the coverage column.
pub fn annotate_rows<R: Read, W: Write>(
    raster: &CoverageRaster,
    reader: &mut csv::Reader<R>,
    headers: &StringRecord,
    writer: &mut csv::Writer<W>,
    palette: &Palette,
    interpolation: Option<Interpolation>,
) -> Result<BatchSummary> {
    let mut header_out = headers.clone();
    header_out.push_field(COVERAGE_COLUMN);
    writer.write_record(&header_out)?;

    let mut summary = BatchSummary::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Line 1 is the header
        let line = index + 2;

        let coverage = match sample_row(raster, &record, palette, interpolation) {
            Ok(Some(dbm)) => {
                summary.covered += 1;
                dbm.to_string()
            }
            Ok(None) => {
                summary.no_coverage += 1;
                debug!(line, "no coverage");
                NULL_VALUE.to_string()
            }
            Err(e) => {
                summary.failed += 1;
                warn!(line, "{}", e);
                NULL_VALUE.to_string()
            }
        };

        let mut row = record.clone();
        while row.len() < headers.len() {
            row.push_field("");
        }
        row.push_field(&coverage);
        writer.write_record(&row)?;
        summary.rows += 1;

        if summary.rows % BATCH_SIZE == 0 {
            writer.flush().map_err(csv::Error::from)?;
            info!(rows = summary.rows, "processed rows");
        }
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(summary)
}

fn sample_row(
    raster: &CoverageRaster,
    record: &StringRecord,
    palette: &Palette,
    interpolation: Option<Interpolation>,
) -> covmap_raster::Result<Option<f64>> {
    let (Some(lat), Some(lon)) = (record.get(0), record.get(1)) else {
        return Err(RasterError::InvalidCoordinate {
            input: record.iter().collect::<Vec<_>>().join(","),
            reason: "row needs latitude and longitude values".to_string(),
        });
    };
    let coordinate = Coordinate::from_fields(lat, lon)?;
    raster.coverage_at(coordinate, palette, interpolation)
}
