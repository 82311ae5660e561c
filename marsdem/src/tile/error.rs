//! Error types for tile loading and sample decoding.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening a tile or decoding one of its samples.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile file could not be opened or inspected.
    #[error("Failed to open tile {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is too small or the geometry yields an empty grid.
    #[error("Invalid tile dimensions {width}×{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// The declared latitude range is inverted.
    #[error("Invalid latitude range [{min_lat}, {max_lat}]")]
    InvalidExtent { min_lat: f64, max_lat: f64 },

    /// A sample offset falls outside the file.
    #[error("Offset {offset} is outside file bounds (size: {len})")]
    OutOfBounds { offset: u64, len: u64 },

    /// The positional read failed.
    #[error("Failed to read elevation data: {0}")]
    Io(#[from] io::Error),
}
