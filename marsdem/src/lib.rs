//! marsdem - Mixed-resolution Mars elevation store
//!
//! This library loads MOLA topography rasters at two resolution tiers and
//! answers point and region queries against the best tile available:
//!
//! - [`catalog`]: tile discovery and the spatial locator
//! - [`tile`]: tile descriptors, positional file access and sample decoding
//! - [`chunk`]: resampled region rendering and seam merging
//! - [`cache`]: memoization of rendered chunks
//! - [`store`]: the concurrent query surface tying it all together
//!
//! # Example
//!
//! ```ignore
//! use marsdem::{ElevationStore, StoreConfig};
//!
//! let store = ElevationStore::open(StoreConfig::new("assets/mars_data"))?;
//! let point = store.point_elevation(18.4446, 77.4509)?;
//! println!("{} m ({})", point.elevation, point.source);
//!
//! let chunk = store.region_chunk(18.0, 19.0, 350.0, 10.0, 64)?;
//! println!("{}x{} from {}", chunk.width, chunk.height, chunk.data_source);
//!
//! store.close()?;
//! ```

pub mod cache;
pub mod catalog;
pub mod chunk;
pub mod config;
pub mod coord;
pub mod error;
pub mod logging;
pub mod store;
pub mod tile;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStats, ChunkCache, ChunkKey};
pub use catalog::{Catalog, CatalogLoader};
pub use chunk::{Chunk, ChunkRequest, SourceTally, DEFAULT_RESOLUTION};
pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{Coverage, ElevationStore, PointElevation, TileSummary};
pub use tile::{ResolutionTier, SampleEncoding, TileDescriptor, TileError};

/// Library version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
