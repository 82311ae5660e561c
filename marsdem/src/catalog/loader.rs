//! Catalog loading from a MOLA data directory.
//!
//! Expected layout under the base directory:
//!
//! ```text
//! <base>/meg512/megt_n_512_1.img   north polar cap, u16, full longitude
//! <base>/meg512/megt_s_512_1.img   south polar cap
//! <base>/meg128/megt44n000hb.img   regional slices, i16 meters
//! ```
//!
//! A tile that cannot be read is logged and skipped. Loading fails only when
//! no tile of either tier was loaded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Catalog;
use crate::config::StoreConfig;
use crate::coord::FULL_CIRCLE;
use crate::error::StoreError;
use crate::tile::{
    FixedOffsetNaming, ResolutionTier, SampleEncoding, TileDescriptor, TileError, TileExtent,
    TileFile, TileNaming,
};

/// Which polar cap a high-resolution file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pole {
    North,
    South,
}

/// Builds a [`Catalog`] from the configured data directory.
pub struct CatalogLoader {
    config: StoreConfig,
    naming: Arc<dyn TileNaming>,
}

impl CatalogLoader {
    /// Create a loader using the fixed-offset regional naming convention.
    pub fn new(config: StoreConfig) -> Self {
        let naming = FixedOffsetNaming::new(config.regional_prefix.clone());
        Self {
            config,
            naming: Arc::new(naming),
        }
    }

    /// Replace the regional naming source.
    pub fn with_naming(mut self, naming: Arc<dyn TileNaming>) -> Self {
        self.naming = naming;
        self
    }

    /// Load both tiers.
    pub fn load(&self) -> Result<Catalog, StoreError> {
        let mut catalog = Catalog::new();

        self.load_polar_tier(&mut catalog);
        self.load_regional_tier(&mut catalog);

        if catalog.is_empty() {
            return Err(StoreError::LoadFailure {
                base_dir: self.config.base_dir.clone(),
            });
        }

        info!(
            total = catalog.len(),
            high_res = catalog.high_count(),
            medium_res = catalog.medium_count(),
            "Terrain catalog loaded"
        );
        Ok(catalog)
    }

    fn load_polar_tier(&self, catalog: &mut Catalog) {
        let dir = self.config.polar_path();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "High-resolution directory not found");
            return;
        }

        let caps = [
            (Pole::North, &self.config.north_file),
            (Pole::South, &self.config.south_file),
        ];
        for (pole, name) in caps {
            let path = dir.join(name);
            match self.load_polar_file(&path, pole) {
                Ok(tile) => {
                    info!(
                        path = %path.display(),
                        width = tile.width(),
                        height = tile.height(),
                        "Loaded high-resolution {:?} polar data",
                        pole
                    );
                    catalog.push(tile);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load polar file");
                }
            }
        }
    }

    fn load_polar_file(&self, path: &Path, pole: Pole) -> Result<TileDescriptor, TileError> {
        let file = TileFile::open(path)?;
        let ppd = self.config.polar_pixels_per_degree;

        let width = (FULL_CIRCLE * ppd).round() as u32;
        if width == 0 {
            return Err(TileError::InvalidDimensions {
                width,
                height: 0,
                reason: format!("{} pixels per degree gives an empty row", ppd),
            });
        }
        let total_pixels = file.len() / 2;
        let height = (total_pixels / width as u64) as u32;
        if height == 0 {
            return Err(TileError::InvalidDimensions {
                width,
                height,
                reason: format!("file holds {} samples, less than one row", total_pixels),
            });
        }

        let (min_lat, max_lat) = match pole {
            Pole::North => (self.config.north_min_lat, 90.0),
            Pole::South => (-90.0, self.config.south_max_lat),
        };
        let extent = TileExtent {
            min_lat,
            max_lat,
            min_lon: 0.0,
            max_lon: FULL_CIRCLE,
        };

        TileDescriptor::new(
            path,
            file,
            ResolutionTier::High,
            ppd,
            extent,
            width,
            height,
            SampleEncoding::UnsignedScaled,
            self.config.polar_scale,
            self.config.polar_offset,
        )
    }

    fn load_regional_tier(&self, catalog: &mut Catalog) {
        let dir = self.config.regional_path();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Medium-resolution directory not found");
            return;
        }

        for path in self.regional_candidates(&dir) {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.naming.matches(file_name) {
                continue;
            }

            match self.load_regional_file(&path, file_name) {
                Ok(tile) => {
                    debug!(
                        path = %path.display(),
                        extent = ?tile.extent(),
                        width = tile.width(),
                        height = tile.height(),
                        "Loaded medium-resolution tile"
                    );
                    catalog.push(tile);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load medium resolution file"
                    );
                }
            }
        }
    }

    /// Raster files in the regional directory, sorted by name.
    fn regional_candidates(&self, dir: &Path) -> Vec<PathBuf> {
        let pattern = dir.join(format!("*.{}", self.config.extension));
        let pattern = pattern.to_string_lossy();

        match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!(error = %e, "Unreadable entry in medium resolution directory");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Error looking for medium resolution files");
                Vec::new()
            }
        }
    }

    fn load_regional_file(&self, path: &Path, file_name: &str) -> Result<TileDescriptor, TileError> {
        let file = TileFile::open(path)?;
        let name = self.naming.extent(file_name);
        let ppd = self.config.regional_pixels_per_degree;

        let lat_range = (name.max_lat - name.min_lat).abs();
        let lon_range = (name.max_lon - name.min_lon).abs();
        let width = (lon_range * ppd).round() as u32;
        let mut height = (lat_range * ppd).round() as u32;
        if width == 0 {
            return Err(TileError::InvalidDimensions {
                width,
                height,
                reason: format!("{}° of longitude gives an empty row", lon_range),
            });
        }

        let total_pixels = file.len() / 2;
        let expected = width as u64 * height as u64;
        if total_pixels != expected {
            warn!(
                file = file_name,
                expected_pixels = expected,
                actual_pixels = total_pixels,
                "File size mismatch, deriving height from file size"
            );
            height = (total_pixels / width as u64) as u32;
        }

        let extent = TileExtent {
            min_lat: name.min_lat,
            max_lat: name.max_lat,
            min_lon: name.min_lon,
            max_lon: name.max_lon,
        };

        TileDescriptor::new(
            path,
            file,
            ResolutionTier::Medium,
            ppd,
            extent,
            width,
            height,
            SampleEncoding::SignedMeters,
            1.0,
            0.0,
        )
    }
}
