//! Tile descriptor: the immutable metadata and handle for one raster file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{TileError, TileFile};

/// Resolution tier of a tile. Locator search order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    /// High-density polar caps.
    High,
    /// Lower-density regional slices.
    Medium,
}

impl ResolutionTier {
    /// Human-readable label, also used as a provenance bucket.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionTier::High => "high-resolution polar",
            ResolutionTier::Medium => "medium-resolution regional",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the 16-bit big-endian samples are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    /// `MSB_UNSIGNED_INTEGER`, scaled and offset into meters.
    UnsignedScaled,
    /// `MSB_INTEGER`, raw meters.
    SignedMeters,
}

impl SampleEncoding {
    /// Interprets two big-endian bytes as a raw sample value.
    #[inline]
    pub fn raw_value(&self, bytes: [u8; 2]) -> f32 {
        match self {
            SampleEncoding::UnsignedScaled => u16::from_be_bytes(bytes) as f32,
            SampleEncoding::SignedMeters => i16::from_be_bytes(bytes) as f32,
        }
    }
}

/// Geographic extent of a tile. Longitudes are 0-360.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileExtent {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Metadata and open handle for one raster file.
///
/// Descriptors are built once by the loader and never mutated. The handle is
/// released when the descriptor is dropped.
#[derive(Debug)]
pub struct TileDescriptor {
    path: PathBuf,
    file: TileFile,
    tier: ResolutionTier,
    pixels_per_degree: f64,
    extent: TileExtent,
    width: u32,
    height: u32,
    is_polar: bool,
    encoding: SampleEncoding,
    scale: f32,
    offset: f32,
}

impl TileDescriptor {
    /// Builds a descriptor, checking the grid and extent invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        path: impl Into<PathBuf>,
        file: TileFile,
        tier: ResolutionTier,
        pixels_per_degree: f64,
        extent: TileExtent,
        width: u32,
        height: u32,
        encoding: SampleEncoding,
        scale: f32,
        offset: f32,
    ) -> Result<Self, TileError> {
        if width == 0 || height == 0 {
            return Err(TileError::InvalidDimensions {
                width,
                height,
                reason: "tile grid must be non-empty".to_string(),
            });
        }
        if !(extent.min_lat <= extent.max_lat) {
            return Err(TileError::InvalidExtent {
                min_lat: extent.min_lat,
                max_lat: extent.max_lat,
            });
        }

        Ok(Self {
            path: path.into(),
            file,
            tier,
            pixels_per_degree,
            extent,
            width,
            height,
            is_polar: tier == ResolutionTier::High,
            encoding,
            scale,
            offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &TileFile {
        &self.file
    }

    pub fn tier(&self) -> ResolutionTier {
        self.tier
    }

    pub fn pixels_per_degree(&self) -> f64 {
        self.pixels_per_degree
    }

    pub fn extent(&self) -> &TileExtent {
        &self.extent
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True only for the two full-longitude polar caps.
    pub fn is_polar(&self) -> bool {
        self.is_polar
    }

    pub fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Size of the underlying file in bytes.
    pub fn byte_len(&self) -> u64 {
        self.file.len()
    }

    /// Whether this tile covers the point. `lon` must already be in `[0, 360)`.
    pub fn covers(&self, lat: f64, lon: f64) -> bool {
        if lat < self.extent.min_lat || lat > self.extent.max_lat {
            return false;
        }
        crate::coord::lon_in_interval(lon, self.extent.min_lon, self.extent.max_lon)
    }
}
