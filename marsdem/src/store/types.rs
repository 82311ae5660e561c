//! Query result types.

use std::path::PathBuf;

use serde::Serialize;

use crate::tile::{ResolutionTier, TileDescriptor};

/// Elevation at a single coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointElevation {
    /// Latitude as requested.
    pub latitude: f64,
    /// Longitude as requested, not normalized.
    pub longitude: f64,
    /// Meters relative to the MOLA datum.
    pub elevation: f32,
    /// Tier of the tile that answered.
    #[serde(skip)]
    pub tier: ResolutionTier,
    /// Human-readable description of where the value came from.
    pub source: String,
}

/// Metadata of one loaded tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSummary {
    pub path: PathBuf,
    pub tier: ResolutionTier,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub width: u32,
    pub height: u32,
    pub pixels_per_degree: f64,
}

impl From<&TileDescriptor> for TileSummary {
    fn from(tile: &TileDescriptor) -> Self {
        let extent = tile.extent();
        Self {
            path: tile.path().to_path_buf(),
            tier: tile.tier(),
            min_lat: extent.min_lat,
            max_lat: extent.max_lat,
            min_lon: extent.min_lon,
            max_lon: extent.max_lon,
            width: tile.width(),
            height: tile.height(),
            pixels_per_degree: tile.pixels_per_degree(),
        }
    }
}

/// Which tile serves a coordinate and where in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub tile: TileSummary,
    pub pixel_x: u32,
    pub pixel_y: u32,
}
