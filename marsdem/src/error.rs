//! Store-level error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileError;

/// Errors returned by the elevation store's query and lifecycle operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No loaded tile covers the coordinate. This is an expected outcome for
    /// gaps in coverage, not a fault.
    #[error("No terrain data available for location ({lat:.4}, {lon:.4})")]
    NoDataAvailable { lat: f64, lon: f64 },

    /// A point coordinate was not a finite number.
    #[error("Invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A region query was non-finite or degenerate.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Not a single tile of either tier could be loaded.
    #[error("Failed to load any terrain data files from {}", base_dir.display())]
    LoadFailure { base_dir: PathBuf },

    /// The store has been closed.
    #[error("Elevation store is closed")]
    Closed,

    /// A sample could not be decoded from its tile.
    #[error("Failed to decode elevation: {0}")]
    Decode(#[from] TileError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true for the coverage-miss signal.
    pub fn is_no_data(&self) -> bool {
        matches!(self, StoreError::NoDataAvailable { .. })
    }
}
