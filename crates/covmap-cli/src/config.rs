//! Palette configuration loaded from YAML.
//!
//! ```yaml
//! levels:
//!   - rgb: [207, 99, 103]
//!     dbm: -80
//!   - rgb: [248, 209, 191]
//!     dbm: -108
//! no_coverage: [255, 255, 255]
//! ```

use crate::error::{CliError, Result};
use covmap_raster::Palette;
use std::path::Path;
use tracing::info;

/// Load the palette from `path`, or the built-in legend when no file is given.
pub fn load_palette(path: Option<&Path>) -> Result<Palette> {
    let Some(path) = path else {
        return Ok(Palette::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| CliError::File {
        action: "Failed to read palette file",
        path: path.to_path_buf(),
        source,
    })?;
    let palette = parse_palette(&contents, path)?;
    info!(
        path = %path.display(),
        levels = palette.levels.len(),
        "loaded palette"
    );
    Ok(palette)
}

fn parse_palette(contents: &str, path: &Path) -> Result<Palette> {
    let palette: Palette =
        serde_yaml::from_str(contents).map_err(|source| CliError::PaletteParse {
            path: path.to_path_buf(),
            source,
        })?;
    palette.validate().map_err(|reason| CliError::InvalidPalette {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(palette)
}
