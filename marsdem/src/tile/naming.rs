//! Regional tile filename parsing.
//!
//! Medium-resolution MOLA products carry their geographic extent in the
//! filename, e.g. `megt44n000hb.img`:
//!
//! - `megt` - product prefix
//! - `44` - latitude band in degrees (characters 4-6, digits only)
//! - `n` - hemisphere marker (`n` or `s`)
//! - `000` - starting east longitude of a 90° slice
//!
//! The extent is reached through the [`TileNaming`] trait so the loader does
//! not depend on this layout.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// First character position of the latitude band digits.
pub const LAT_DIGITS_START: usize = 4;

/// One past the last character position of the latitude band digits.
pub const LAT_DIGITS_END: usize = 7;

/// Latitude band assumed when the filename carries none.
pub const DEFAULT_LAT_BAND: f64 = 44.0;

/// Longitude width of one regional slice.
pub const SLICE_WIDTH_DEG: f64 = 90.0;

/// Hemisphere a regional tile lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

/// Geographic extent decoded from a regional filename.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalName {
    pub hemisphere: Hemisphere,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Source of regional tile metadata.
pub trait TileNaming: Send + Sync {
    /// Whether the file belongs to the regional product.
    fn matches(&self, file_name: &str) -> bool;

    /// Geographic extent for the file. Always yields an extent, falling back
    /// to documented defaults for parts it cannot read.
    fn extent(&self, file_name: &str) -> RegionalName;
}

/// The fixed-offset MOLA naming convention.
#[derive(Debug, Clone)]
pub struct FixedOffsetNaming {
    prefix: String,
}

impl FixedOffsetNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for FixedOffsetNaming {
    fn default() -> Self {
        Self::new("megt")
    }
}

/// Hemisphere marker followed by an optional three-digit longitude.
///
/// The leftmost `n`/`s` in the name is the marker.
fn hemisphere_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([ns])(\d{3})?").unwrap())
}

/// Reads the latitude band from the fixed digit window, stopping at the
/// first non-digit.
fn parse_lat_band(file_name: &str) -> Option<u32> {
    let digits: String = file_name
        .bytes()
        .take(LAT_DIGITS_END)
        .skip(LAT_DIGITS_START)
        .take_while(|b| b.is_ascii_digit())
        .map(char::from)
        .collect();
    digits.parse().ok()
}

impl TileNaming for FixedOffsetNaming {
    fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix)
    }

    fn extent(&self, file_name: &str) -> RegionalName {
        let captures = hemisphere_pattern().captures(file_name);

        let hemisphere = match captures.as_ref().and_then(|c| c.get(1)) {
            Some(m) if m.as_str() == "n" => Hemisphere::North,
            _ => Hemisphere::South,
        };

        let band = match parse_lat_band(file_name) {
            Some(band) => band as f64,
            None => {
                warn!(
                    file = file_name,
                    default_band = DEFAULT_LAT_BAND,
                    "Could not parse latitude from filename, using default band"
                );
                DEFAULT_LAT_BAND
            }
        };
        let (min_lat, max_lat) = match hemisphere {
            Hemisphere::North => (0.0, band),
            Hemisphere::South => (-band, 0.0),
        };

        let start_lon = match captures.as_ref() {
            None => {
                warn!(
                    file = file_name,
                    "Could not locate longitude in filename, using 0°"
                );
                0.0
            }
            Some(c) => match c.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) {
                Some(lon) => lon as f64,
                None => {
                    warn!(
                        file = file_name,
                        "Could not parse longitude from filename, using 0°"
                    );
                    0.0
                }
            },
        };

        RegionalName {
            hemisphere,
            min_lat,
            max_lat,
            min_lon: start_lon,
            max_lon: start_lon + SLICE_WIDTH_DEG,
        }
    }
}
