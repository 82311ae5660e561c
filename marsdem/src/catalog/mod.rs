//! Tile catalog and spatial locator.
//!
//! The catalog holds every loaded tile in load order plus one search list per
//! resolution tier. Lookups scan the high tier first and fall back to the
//! medium tier; the first covering tile wins.

mod loader;

pub use loader::CatalogLoader;

use crate::coord;
use crate::tile::{ResolutionTier, TileDescriptor};

/// Loaded tiles partitioned by resolution tier.
#[derive(Debug, Default)]
pub struct Catalog {
    tiles: Vec<TileDescriptor>,
    high: Vec<usize>,
    medium: Vec<usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tile to the global list and to its tier's search list.
    pub fn push(&mut self, tile: TileDescriptor) {
        let index = self.tiles.len();
        match tile.tier() {
            ResolutionTier::High => self.high.push(index),
            ResolutionTier::Medium => self.medium.push(index),
        }
        self.tiles.push(tile);
    }

    /// Every tile in load order.
    pub fn tiles(&self) -> &[TileDescriptor] {
        &self.tiles
    }

    /// Tiles of one tier in search order.
    pub fn tier(&self, tier: ResolutionTier) -> impl Iterator<Item = &TileDescriptor> {
        let indices = match tier {
            ResolutionTier::High => &self.high,
            ResolutionTier::Medium => &self.medium,
        };
        indices.iter().map(move |&i| &self.tiles[i])
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn high_count(&self) -> usize {
        self.high.len()
    }

    pub fn medium_count(&self) -> usize {
        self.medium.len()
    }

    /// Finds the best tile covering a point, preferring the high tier.
    ///
    /// `lon` may be any finite value. `None` is an ordinary coverage gap.
    pub fn find_tile(&self, lat: f64, lon: f64) -> Option<&TileDescriptor> {
        let lon = coord::normalize_lon(lon);
        self.tier(ResolutionTier::High)
            .chain(self.tier(ResolutionTier::Medium))
            .find(|tile| tile.covers(lat, lon))
    }
}
