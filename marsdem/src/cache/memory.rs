//! Rendered chunk cache backed by `moka::sync::Cache`.
//!
//! Entries are weighted by their elevation buffer size. Chunks larger than
//! the per-entry cap are never stored. When a total byte budget is set, moka
//! evicts least-recently-used entries to stay under it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::types::{CacheStats, ChunkKey};
use crate::chunk::Chunk;

/// Concurrent cache of rendered chunks.
pub struct ChunkCache {
    cache: Cache<ChunkKey, Arc<Chunk>>,
    max_chunk_bytes: usize,
    capacity_bytes: Option<u64>,
    hits: AtomicU64,
    misses: AtomicU64,
    rejected: AtomicU64,
}

impl ChunkCache {
    /// Creates a cache that refuses chunks over `max_chunk_bytes` and, when
    /// `capacity_bytes` is set, holds at most that many bytes in total.
    pub fn new(max_chunk_bytes: usize, capacity_bytes: Option<u64>) -> Self {
        let builder = Cache::builder().weigher(|_key: &ChunkKey, chunk: &Arc<Chunk>| -> u32 {
            chunk.byte_size().min(u32::MAX as usize) as u32
        });
        let cache = match capacity_bytes {
            Some(capacity) => builder.max_capacity(capacity).build(),
            None => builder.build(),
        };

        Self {
            cache,
            max_chunk_bytes,
            capacity_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &ChunkKey) -> Option<Arc<Chunk>> {
        match self.cache.get(key) {
            Some(chunk) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(chunk)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores a chunk unless it exceeds the per-entry cap.
    ///
    /// Returns whether the chunk was stored.
    pub fn insert(&self, key: ChunkKey, chunk: Arc<Chunk>) -> bool {
        let size = chunk.byte_size();
        if size > self.max_chunk_bytes {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            debug!(
                size_bytes = size,
                max_bytes = self.max_chunk_bytes,
                "Chunk too large to cache"
            );
            return false;
        }
        self.cache.insert(key, chunk);
        true
    }

    pub fn contains(&self, key: &ChunkKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of cached chunks. Call [`run_pending_tasks`](Self::run_pending_tasks)
    /// first for an exact figure.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Total weight of cached chunks in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    pub fn max_chunk_bytes(&self) -> usize {
        self.max_chunk_bytes
    }

    pub fn capacity_bytes(&self) -> Option<u64> {
        self.capacity_bytes
    }

    /// Flushes moka's pending housekeeping so counts and evictions are current.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    pub fn stats(&self) -> CacheStats {
        self.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            entry_count: self.entry_count(),
            size_bytes: self.size_bytes(),
            capacity_bytes: self.capacity_bytes,
        }
    }

    /// Drops every cached chunk. Counters are kept.
    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

impl std::fmt::Debug for ChunkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkCache")
            .field("entry_count", &self.cache.entry_count())
            .field("max_chunk_bytes", &self.max_chunk_bytes)
            .field("capacity_bytes", &self.capacity_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkRequest;

    fn chunk(resolution: u32) -> (ChunkKey, Arc<Chunk>) {
        let request = ChunkRequest::new(0.0, 1.0, 0.0, 1.0, resolution).unwrap();
        let cells = (request.width() * request.height()) as usize;
        let chunk = Chunk::from_request(&request, vec![1.0; cells], "test");
        (request.key(), Arc::new(chunk))
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ChunkCache::new(1 << 20, None);
        let (key, value) = chunk(8);

        assert!(cache.insert(key, value.clone()));
        assert_eq!(cache.get(&key).as_deref(), Some(value.as_ref()));
        assert!(cache.contains(&key));
    }

    #[test]
    fn test_miss() {
        let cache = ChunkCache::new(1 << 20, None);
        let (key, _) = chunk(8);
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        // 8×8 cells of f32 is 256 bytes
        let cache = ChunkCache::new(255, None);
        let (key, value) = chunk(8);

        assert!(!cache.insert(key, value));
        assert!(!cache.contains(&key));
        assert_eq!(cache.stats().rejected, 1);
    }

    #[test]
    fn test_chunk_at_cap_is_stored() {
        let cache = ChunkCache::new(256, None);
        let (key, value) = chunk(8);
        assert!(cache.insert(key, value));
    }

    #[test]
    fn test_size_tracking() {
        let cache = ChunkCache::new(1 << 20, None);
        let (k1, v1) = chunk(8);
        let (k2, v2) = chunk(16);
        cache.insert(k1, v1);
        cache.insert(k2, v2);

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.size_bytes, 256 + 1024);
    }

    #[test]
    fn test_capacity_bound_evicts() {
        let cache = ChunkCache::new(1 << 20, Some(2048));
        for resolution in [16, 17, 18, 19] {
            let (key, value) = chunk(resolution);
            cache.insert(key, value);
            cache.run_pending_tasks();
        }

        assert!(
            cache.size_bytes() <= 2048,
            "Cache should be under limit, got {} bytes",
            cache.size_bytes()
        );
    }

    #[test]
    fn test_hit_statistics() {
        let cache = ChunkCache::new(1 << 20, None);
        let (key, value) = chunk(4);
        cache.insert(key, value);

        cache.get(&key);
        cache.get(&key);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_clear() {
        let cache = ChunkCache::new(1 << 20, Some(1 << 20));
        let (key, value) = chunk(4);
        cache.insert(key, value);

        cache.clear();
        assert!(!cache.contains(&key));
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = ChunkCache::new(1 << 20, None);
        std::thread::scope(|scope| {
            for resolution in 1..=8 {
                let cache = &cache;
                scope.spawn(move || {
                    let (key, value) = chunk(resolution);
                    cache.insert(key, value);
                    assert!(cache.get(&key).is_some());
                });
            }
        });
        assert_eq!(cache.stats().entry_count, 8);
    }
}
