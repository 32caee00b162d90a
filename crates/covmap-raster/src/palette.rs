//! Colour legend of rendered coverage maps.
//!
//! Coverage maps are often published as RGB images where each colour stands
//! for an RSRP band. A [`Palette`] maps pixel colours back to dBm values by
//! nearest-colour matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strongest signal level of the default legend (dBm).
pub const MAX_COVERAGE_DBM: f64 = -80.0;
/// Weakest signal level of the default legend (dBm).
pub const MIN_COVERAGE_DBM: f64 = -108.0;

/// Pixel colour meaning "no coverage".
pub const WHITE: [u8; 3] = [255, 255, 255];

/// One legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteLevel {
    pub rgb: [u8; 3],
    pub dbm: f64,
}

/// How to refine a matched legend level towards the next stronger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Place the pixel colour on the segment between the two legend colours.
    Linear,
    /// Midpoint of the two legend levels.
    Average,
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "average" => Ok(Interpolation::Average),
            other => Err(format!(
                "invalid interpolation method '{}', supported methods are 'linear' and 'average'",
                other
            )),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "linear"),
            Interpolation::Average => write!(f, "average"),
        }
    }
}

/// RGB to dBm legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Legend entries; order does not matter.
    pub levels: Vec<PaletteLevel>,
    /// Colour meaning "no coverage".
    #[serde(default = "default_no_coverage")]
    pub no_coverage: [u8; 3],
}

fn default_no_coverage() -> [u8; 3] {
    WHITE
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            levels: vec![
                PaletteLevel { rgb: [207, 99, 103], dbm: MAX_COVERAGE_DBM },
                PaletteLevel { rgb: [234, 104, 102], dbm: -90.0 },
                PaletteLevel { rgb: [243, 172, 103], dbm: -100.0 },
                PaletteLevel { rgb: [248, 209, 191], dbm: MIN_COVERAGE_DBM },
            ],
            no_coverage: WHITE,
        }
    }
}

impl Palette {
    /// Check that the palette can classify anything.
    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("palette has no levels".to_string());
        }
        if let Some(level) = self.levels.iter().find(|level| !level.dbm.is_finite()) {
            return Err(format!("palette level {:?} has a non-finite dBm value", level.rgb));
        }
        if self.levels.iter().any(|level| level.rgb == self.no_coverage) {
            return Err(format!(
                "no-coverage colour {:?} is also used by a level",
                self.no_coverage
            ));
        }
        Ok(())
    }

    /// Nearest legend level by squared RGB distance, or `None` for the no-coverage colour.
    pub fn classify(&self, rgb: [f64; 3]) -> Option<&PaletteLevel> {
        if rgb == self.no_coverage.map(f64::from) {
            return None;
        }
        // Ties go to the first listed level
        self.levels.iter().fold(None, |best: Option<&PaletteLevel>, level| match best {
            Some(b) if distance_sq(b.rgb, rgb) <= distance_sq(level.rgb, rgb) => Some(b),
            _ => Some(level),
        })
    }

    /// Coverage level for a pixel colour.
    ///
    /// The strongest level is returned as-is. With interpolation, the matched
    /// level is moved towards the next stronger level and truncated to whole dBm.
    pub fn resolve(&self, rgb: [f64; 3], interpolation: Option<Interpolation>) -> Option<f64> {
        let matched = self.classify(rgb)?;
        let Some(method) = interpolation else {
            return Some(matched.dbm);
        };
        let Some(stronger) = self.next_stronger(matched) else {
            return Some(matched.dbm);
        };

        let value = match method {
            Interpolation::Average => (matched.dbm + stronger.dbm) / 2.0,
            Interpolation::Linear => {
                let t = segment_position(matched.rgb, stronger.rgb, rgb);
                matched.dbm + (stronger.dbm - matched.dbm) * t
            }
        };
        Some(value.trunc())
    }

    fn next_stronger(&self, level: &PaletteLevel) -> Option<&PaletteLevel> {
        self.levels
            .iter()
            .filter(|candidate| candidate.dbm > level.dbm)
            .min_by(|a, b| a.dbm.total_cmp(&b.dbm))
    }
}

fn distance_sq(a: [u8; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (f64::from(x) - y).powi(2))
        .sum()
}

/// Projection of `p` onto the segment `from -> to`, clamped to [0, 1].
fn segment_position(from: [u8; 3], to: [u8; 3], p: [f64; 3]) -> f64 {
    let mut dot = 0.0;
    let mut len_sq = 0.0;
    for i in 0..3 {
        let d = f64::from(to[i]) - f64::from(from[i]);
        dot += (p[i] - f64::from(from[i])) * d;
        len_sq += d * d;
    }
    if len_sq == 0.0 {
        return 0.0;
    }
    (dot / len_sq).clamp(0.0, 1.0)
}
