//! Raster tiles: descriptors, file access and sample decoding.
//!
//! A tile is one MOLA `.img` raster: a headerless grid of big-endian 16-bit
//! samples, row-major, covering a rectangular (or polar-cap) extent at one
//! pixel density.

mod descriptor;
mod error;
mod file;
mod naming;
mod sample;

pub use descriptor::{ResolutionTier, SampleEncoding, TileDescriptor, TileExtent};
pub use error::TileError;
pub use file::TileFile;
pub use naming::{FixedOffsetNaming, Hemisphere, RegionalName, TileNaming};
