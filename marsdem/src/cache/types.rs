//! Cache key and statistics types.

use serde::Serialize;

/// Exact-match key for a rendered chunk.
///
/// Bounds are compared bit-for-bit after normalization, so two requests
/// share an entry only when every bound and the resolution are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    min_lat: u64,
    max_lat: u64,
    min_lon: u64,
    max_lon: u64,
    resolution: u32,
}

impl ChunkKey {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64, resolution: u32) -> Self {
        Self {
            min_lat: bits(min_lat),
            max_lat: bits(max_lat),
            min_lon: bits(min_lon),
            max_lon: bits(max_lon),
            resolution,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

/// Bit pattern with -0.0 folded into 0.0.
#[inline]
fn bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Chunk cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Inserts refused for exceeding the per-chunk size cap.
    pub rejected: u64,
    pub entry_count: u64,
    pub size_bytes: u64,
    /// Total byte budget, `None` when unbounded.
    pub capacity_bytes: Option<u64>,
}

impl CacheStats {
    /// Fraction of lookups that hit, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_key_equality_is_exact() {
        let a = ChunkKey::new(0.0, 10.0, 350.0, 10.0, 64);
        let b = ChunkKey::new(0.0, 10.0, 350.0, 10.0, 64);
        let c = ChunkKey::new(0.0, 10.0, 350.0, 10.000001, 64);
        let d = ChunkKey::new(0.0, 10.0, 350.0, 10.0, 32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let set: HashSet<_> = [
            ChunkKey::new(-0.0, 1.0, 0.0, 1.0, 8),
            ChunkKey::new(0.0, 1.0, 0.0, 1.0, 8),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        stats.hits = 3;
        stats.misses = 1;
        assert_eq!(stats.hit_rate(), 0.75);
    }
}
