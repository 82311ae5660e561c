//! Cache of rendered chunks keyed by exact request bounds.

mod memory;
mod types;

pub use memory::ChunkCache;
pub use types::{CacheStats, ChunkKey};
