//! The elevation store: concurrent point and region queries over a catalog.
//!
//! Queries hold a shared lock on the catalog for their whole duration,
//! including any render work. `close` takes the lock exclusively, so it waits
//! for in-flight queries and no query can observe a half-closed store. The
//! chunk cache is concurrency-safe on its own and is filled under the shared
//! lock.

mod types;

pub use types::{Coverage, PointElevation, TileSummary};

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::cache::{CacheStats, ChunkCache};
use crate::catalog::{Catalog, CatalogLoader};
use crate::chunk::{self, Chunk, ChunkRequest, CACHED_LABEL};
use crate::config::StoreConfig;
use crate::coord;
use crate::error::StoreError;
use crate::tile::TileNaming;

/// Probe distances in degrees for [`ElevationStore::point_elevation_near`].
pub const NEAR_OFFSETS: [f64; 4] = [0.1, 0.2, 0.5, 1.0];

/// Probe directions as (name, lat sign, lon sign), in probe order.
pub const NEAR_DIRECTIONS: [(&str, f64, f64); 8] = [
    ("north", 1.0, 0.0),
    ("south", -1.0, 0.0),
    ("east", 0.0, 1.0),
    ("west", 0.0, -1.0),
    ("northeast", 1.0, 1.0),
    ("northwest", 1.0, -1.0),
    ("southeast", -1.0, 1.0),
    ("southwest", -1.0, -1.0),
];

/// A loaded, read-only elevation store.
pub struct ElevationStore {
    base_dir: PathBuf,
    catalog: RwLock<Option<Catalog>>,
    cache: ChunkCache,
}

impl ElevationStore {
    /// Loads every tile under `config.base_dir`.
    ///
    /// Fails with [`StoreError::LoadFailure`] when no tile of either tier loads.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let catalog = CatalogLoader::new(config.clone()).load()?;
        Ok(Self::with_catalog(catalog, &config))
    }

    /// Opens a data directory with default settings.
    pub fn open_dir(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open(StoreConfig::new(base_dir))
    }

    /// Loads with a custom regional naming source.
    pub fn open_with_naming(
        config: StoreConfig,
        naming: Arc<dyn TileNaming>,
    ) -> Result<Self, StoreError> {
        let catalog = CatalogLoader::new(config.clone())
            .with_naming(naming)
            .load()?;
        Ok(Self::with_catalog(catalog, &config))
    }

    /// Wraps an already-built catalog.
    pub fn with_catalog(catalog: Catalog, config: &StoreConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            catalog: RwLock::new(Some(catalog)),
            cache: ChunkCache::new(config.max_chunk_bytes, config.cache_capacity_bytes),
        }
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    pub fn is_open(&self) -> bool {
        self.catalog.read().is_some()
    }

    /// Runs `f` against the catalog under the shared lock.
    fn with_open<T>(
        &self,
        f: impl FnOnce(&Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let guard = self.catalog.read();
        let catalog = guard.as_ref().ok_or(StoreError::Closed)?;
        f(catalog)
    }

    /// Elevation at a point from the best covering tile.
    ///
    /// Returns [`StoreError::NoDataAvailable`] when no tile covers the point.
    pub fn point_elevation(&self, lat: f64, lon: f64) -> Result<PointElevation, StoreError> {
        if !coord::is_valid_coordinate(lat, lon) {
            return Err(StoreError::InvalidCoordinate { lat, lon });
        }
        self.with_open(|catalog| lookup(catalog, lat, lon))
    }

    /// Like [`point_elevation`](Self::point_elevation), but on a miss probes
    /// nearby points at growing offsets before giving up.
    pub fn point_elevation_near(&self, lat: f64, lon: f64) -> Result<PointElevation, StoreError> {
        if !coord::is_valid_coordinate(lat, lon) {
            return Err(StoreError::InvalidCoordinate { lat, lon });
        }
        self.with_open(|catalog| {
            let miss = match lookup(catalog, lat, lon) {
                Ok(point) => return Ok(point),
                Err(e) => e,
            };

            for offset in NEAR_OFFSETS {
                for (name, lat_sign, lon_sign) in NEAR_DIRECTIONS {
                    let probe_lat = coord::clamp_lat(lat + lat_sign * offset);
                    let probe_lon = lon + lon_sign * offset;
                    if let Ok(found) = lookup(catalog, probe_lat, probe_lon) {
                        debug!(
                            lat = lat,
                            lon = lon,
                            direction = name,
                            offset = offset,
                            "Resolved point from a nearby probe"
                        );
                        return Ok(PointElevation {
                            latitude: lat,
                            longitude: lon,
                            elevation: found.elevation,
                            tier: found.tier,
                            source: format!("interpolated from {} ({}° offset)", name, offset),
                        });
                    }
                }
            }
            Err(miss)
        })
    }

    /// Resampled elevation grid over a region.
    ///
    /// Cells without data are 0 and reported in the chunk's `data_source`.
    /// Regions crossing the 0°/360° seam are rendered in two halves and
    /// merged. A longitude range of 360° or more covers the whole planet.
    /// Fails only on invalid input or a closed store.
    pub fn region_chunk(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        resolution: u32,
    ) -> Result<Chunk, StoreError> {
        let request = ChunkRequest::new(min_lat, max_lat, min_lon, max_lon, resolution)?;
        self.chunk(&request)
    }

    /// Renders a request built by [`ChunkRequest::new`].
    pub fn chunk(&self, request: &ChunkRequest) -> Result<Chunk, StoreError> {
        self.with_open(|catalog| {
            if request.crosses_seam() {
                let (left, right) = chunk::split(request);
                let left = left.map(|half| self.cached_render(catalog, &half));
                let right = right.map(|half| self.cached_render(catalog, &half));
                Ok(chunk::merge(request, left.as_ref(), right.as_ref()))
            } else {
                Ok(self.cached_render(catalog, request))
            }
        })
    }

    fn cached_render(&self, catalog: &Catalog, request: &ChunkRequest) -> Chunk {
        let key = request.key();
        if let Some(cached) = self.cache.get(&key) {
            trace!(resolution = request.resolution(), "Chunk cache hit");
            return Chunk::from_request(request, Arc::clone(&cached.elevation), CACHED_LABEL);
        }

        // The clone shares the elevation buffer with the cached entry
        let rendered = chunk::render(catalog, request);
        self.cache.insert(key, Arc::new(rendered.clone()));
        rendered
    }

    /// Summaries of every loaded tile in load order.
    pub fn tiles(&self) -> Result<Vec<TileSummary>, StoreError> {
        self.with_open(|catalog| Ok(catalog.tiles().iter().map(TileSummary::from).collect()))
    }

    /// Which tile would serve a point, without decoding.
    pub fn coverage(&self, lat: f64, lon: f64) -> Result<Option<Coverage>, StoreError> {
        if !coord::is_valid_coordinate(lat, lon) {
            return Err(StoreError::InvalidCoordinate { lat, lon });
        }
        self.with_open(|catalog| {
            let lon = coord::normalize_lon(lon);
            Ok(catalog.find_tile(lat, lon).map(|tile| {
                let (pixel_x, pixel_y) = tile.pixel_index(lat, lon);
                Coverage {
                    tile: TileSummary::from(tile),
                    pixel_x,
                    pixel_y,
                }
            }))
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Releases every tile file and drops cached chunks.
    ///
    /// Waits for in-flight queries. Closing an already-closed store is a
    /// no-op.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.catalog.write();
        let Some(catalog) = guard.take() else {
            debug!("Elevation store already closed");
            return Ok(());
        };
        let released = catalog.len();
        drop(catalog);
        self.cache.clear();
        info!(
            base_dir = %self.base_dir.display(),
            tiles = released,
            "Closed elevation store"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ElevationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationStore")
            .field("base_dir", &self.base_dir)
            .field("open", &self.is_open())
            .field("cache", &self.cache)
            .finish()
    }
}

/// Resolves and decodes one point.
fn lookup(catalog: &Catalog, lat: f64, lon: f64) -> Result<PointElevation, StoreError> {
    let normalized = coord::normalize_lon(lon);
    let tile = catalog
        .find_tile(lat, normalized)
        .ok_or(StoreError::NoDataAvailable { lat, lon })?;
    let elevation = tile.elevation_at(lat, normalized)?;
    Ok(PointElevation {
        latitude: lat,
        longitude: lon,
        elevation,
        tier: tile.tier(),
        source: format!("{} data", tile.tier().label()),
    })
}
