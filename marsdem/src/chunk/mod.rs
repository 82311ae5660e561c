//! Rendered elevation chunks.
//!
//! A chunk is a resampled row-major grid of elevations over a query region,
//! independent of tile boundaries. Row 0 is the region's southern edge and
//! column 0 its western edge.

mod render;
mod wrap;

pub use render::render;
pub use wrap::{merge, split, split_column};

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::ChunkKey;
use crate::coord;
use crate::error::StoreError;
use crate::tile::ResolutionTier;

/// Output width used when the caller does not choose one.
pub const DEFAULT_RESOLUTION: u32 = 64;

/// Upper bound on cells in one chunk (256 MiB of samples).
pub const MAX_CHUNK_CELLS: u64 = 1 << 26;

/// Provenance label for cells no tile could serve.
pub const NO_DATA_LABEL: &str = "no data";

/// Provenance label for chunks served from the cache.
pub const CACHED_LABEL: &str = "cached";

/// A validated region query with longitudes folded into `[0, 360]`.
///
/// `max_lon < min_lon` marks a region crossing the 0°/360° seam. An eastern
/// edge that lands exactly on the seam is kept as 360. Requests only come
/// from [`ChunkRequest::new`]:
///
/// ```compile_fail
/// let request = marsdem::ChunkRequest {
///     min_lat: 0.0,
///     max_lat: 10.0,
///     min_lon: 0.0,
///     max_lon: 20.0,
///     resolution: 0,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkRequest {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    resolution: u32,
}

impl ChunkRequest {
    /// Validates and normalizes a region query.
    ///
    /// A longitude range spanning 360° or more covers the whole circle and
    /// becomes `[0, 360]`.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        resolution: u32,
    ) -> Result<Self, StoreError> {
        if ![min_lat, max_lat, min_lon, max_lon].iter().all(|v| v.is_finite()) {
            return Err(StoreError::InvalidRegion(
                "coordinates must be finite".to_string(),
            ));
        }
        if resolution == 0 {
            return Err(StoreError::InvalidRegion(
                "resolution must be positive".to_string(),
            ));
        }
        if max_lat <= min_lat {
            return Err(StoreError::InvalidRegion(format!(
                "latitude range [{}, {}] is empty",
                min_lat, max_lat
            )));
        }

        let (west, east) = if max_lon - min_lon >= coord::FULL_CIRCLE {
            (0.0, coord::FULL_CIRCLE)
        } else {
            let west = coord::normalize_lon(min_lon);
            let east = coord::normalize_lon(max_lon);
            if east == 0.0 && max_lon > min_lon {
                (west, coord::FULL_CIRCLE)
            } else {
                (west, east)
            }
        };
        if east == west {
            return Err(StoreError::InvalidRegion(format!(
                "longitude range [{}, {}] is empty",
                min_lon, max_lon
            )));
        }

        let request = Self::span(min_lat, max_lat, west, east, resolution);
        if request.cells() > MAX_CHUNK_CELLS {
            return Err(StoreError::InvalidRegion(format!(
                "{}×{} chunk exceeds {} cells",
                request.width(),
                request.height(),
                MAX_CHUNK_CELLS
            )));
        }
        Ok(request)
    }

    /// Builds a request from already-normalized bounds.
    pub(crate) fn span(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        resolution: u32,
    ) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            resolution,
        }
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Western edge in `[0, 360)`.
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Eastern edge in `(0, 360]`.
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Whether the region crosses the 0°/360° seam.
    pub fn crosses_seam(&self) -> bool {
        self.max_lon < self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Eastward longitude extent, seam-aware.
    pub fn lon_span(&self) -> f64 {
        coord::lon_span(self.min_lon, self.max_lon)
    }

    /// Output width in cells.
    pub fn width(&self) -> u32 {
        self.resolution
    }

    /// Output height: the resolution scaled by the region's aspect, at least 1.
    pub fn height(&self) -> u32 {
        let height = (self.resolution as f64 * self.lat_span() / self.lon_span()).round();
        height.clamp(1.0, u32::MAX as f64) as u32
    }

    pub(crate) fn cells(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Exact-match cache key for this request.
    pub fn key(&self) -> ChunkKey {
        ChunkKey::new(
            self.min_lat,
            self.max_lat,
            self.min_lon,
            self.max_lon,
            self.resolution,
        )
    }
}

/// Per-source cell counts for one chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceTally {
    pub high: u64,
    pub medium: u64,
    pub no_data: u64,
    /// Cells that found a tile but failed to decode; also counted in `no_data`.
    pub decode_failures: u64,
}

impl SourceTally {
    /// Count one cell served by `tier`, or a no-data cell.
    pub fn record(&mut self, tier: Option<ResolutionTier>) {
        match tier {
            Some(ResolutionTier::High) => self.high += 1,
            Some(ResolutionTier::Medium) => self.medium += 1,
            None => self.no_data += 1,
        }
    }

    /// Count a cell whose tile failed to decode.
    pub fn record_decode_failure(&mut self) {
        self.decode_failures += 1;
        self.no_data += 1;
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            high: self.high + other.high,
            medium: self.medium + other.medium,
            no_data: self.no_data + other.no_data,
            decode_failures: self.decode_failures + other.decode_failures,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.medium + self.no_data
    }

    fn buckets(&self) -> impl Iterator<Item = (&'static str, u64)> {
        [
            (ResolutionTier::High.label(), self.high),
            (ResolutionTier::Medium.label(), self.medium),
            (NO_DATA_LABEL, self.no_data),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
    }
}

impl fmt::Display for SourceTally {
    /// A strict majority source is reported alone; otherwise every source
    /// is listed with its share.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        if total == 0 {
            return f.write_str(NO_DATA_LABEL);
        }
        let percent = |count: u64| count as f64 / total as f64 * 100.0;

        if let Some((label, count)) = self.buckets().find(|(_, count)| count * 2 > total) {
            return write!(f, "{} ({:.1}%)", label, percent(count));
        }

        let parts: Vec<String> = self
            .buckets()
            .map(|(label, count)| format!("{} ({:.1}%)", label, percent(count)))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A rendered elevation grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub width: u32,
    pub height: u32,
    /// Row-major elevations in meters, `width * height` long. Shared with
    /// the cache.
    pub elevation: Arc<Vec<f32>>,
    pub resolution: u32,
    /// Which sources supplied the cells.
    pub data_source: String,
}

impl Chunk {
    /// Wraps an elevation buffer in the header for `request`.
    pub fn from_request(
        request: &ChunkRequest,
        elevation: impl Into<Arc<Vec<f32>>>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            min_lat: request.min_lat,
            max_lat: request.max_lat,
            min_lon: request.min_lon,
            max_lon: request.max_lon,
            width: request.width(),
            height: request.height(),
            elevation: elevation.into(),
            resolution: request.resolution,
            data_source: data_source.into(),
        }
    }

    /// Raw size of the elevation buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.elevation.len() * std::mem::size_of::<f32>()
    }

    /// Elevation at cell `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.elevation
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Whether this chunk was served from the cache.
    pub fn is_cached(&self) -> bool {
        self.data_source == CACHED_LABEL
    }
}
