//! Store configuration.
//!
//! `StoreConfig` carries the data layout and decode constants for both tile
//! tiers plus the chunk cache limits. Defaults describe the MOLA MEGDR
//! distribution; an INI file can override any of them:
//!
//! ```ini
//! [data]
//! base_dir = /srv/mars_data
//!
//! [polar]
//! directory = meg512
//! north_file = megt_n_512_1.img
//! south_file = megt_s_512_1.img
//! pixels_per_degree = 512
//! north_min_lat = 73.15
//! south_max_lat = -73.15
//! scale = 0.25
//! offset = -8000
//!
//! [regional]
//! directory = meg128
//! prefix = megt
//! extension = img
//! pixels_per_degree = 128
//!
//! [cache]
//! max_chunk_bytes = 1048576
//! capacity_bytes = 268435456
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;

use crate::error::StoreError;

/// High-resolution subdirectory.
pub const DEFAULT_POLAR_DIR: &str = "meg512";

/// Medium-resolution subdirectory.
pub const DEFAULT_REGIONAL_DIR: &str = "meg128";

/// North polar cap file.
pub const DEFAULT_NORTH_FILE: &str = "megt_n_512_1.img";

/// South polar cap file.
pub const DEFAULT_SOUTH_FILE: &str = "megt_s_512_1.img";

/// Polar pixel density.
pub const DEFAULT_POLAR_PPD: f64 = 512.0;

/// Regional pixel density.
pub const DEFAULT_REGIONAL_PPD: f64 = 128.0;

/// Equator-ward edge of the north polar cap.
pub const DEFAULT_NORTH_MIN_LAT: f64 = 73.15;

/// Equator-ward edge of the south polar cap.
pub const DEFAULT_SOUTH_MAX_LAT: f64 = -73.15;

/// Polar decode: `elevation = raw * scale + offset`.
pub const DEFAULT_POLAR_SCALE: f32 = 0.25;

/// Polar decode offset in meters.
pub const DEFAULT_POLAR_OFFSET: f32 = -8000.0;

/// Regional filename prefix.
pub const DEFAULT_REGIONAL_PREFIX: &str = "megt";

/// Raster file extension.
pub const DEFAULT_EXTENSION: &str = "img";

/// Largest chunk, in bytes of `f32` samples, that is cached (1 MiB).
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 1024 * 1024;

/// Total chunk cache budget (256 MiB).
pub const DEFAULT_CACHE_CAPACITY_BYTES: u64 = 256 * 1024 * 1024;

/// Configuration for loading and serving the elevation store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Root directory holding the tier subdirectories.
    pub base_dir: PathBuf,

    /// High-resolution subdirectory name.
    pub polar_dir: String,
    /// North polar file name.
    pub north_file: String,
    /// South polar file name.
    pub south_file: String,
    /// Polar pixels per degree. Tile width is `360 * ppd`.
    pub polar_pixels_per_degree: f64,
    /// Equator-ward edge of the north cap; the cap runs to 90°.
    pub north_min_lat: f64,
    /// Equator-ward edge of the south cap; the cap runs to -90°.
    pub south_max_lat: f64,
    /// Polar sample scale.
    pub polar_scale: f32,
    /// Polar sample offset.
    pub polar_offset: f32,

    /// Medium-resolution subdirectory name.
    pub regional_dir: String,
    /// Filename prefix selecting regional tiles.
    pub regional_prefix: String,
    /// Regional pixels per degree.
    pub regional_pixels_per_degree: f64,

    /// Extension of raster files.
    pub extension: String,

    /// Chunks larger than this are never cached.
    pub max_chunk_bytes: usize,
    /// Total cache budget; `None` leaves the cache unbounded.
    pub cache_capacity_bytes: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("assets/mars_data"),
            polar_dir: DEFAULT_POLAR_DIR.to_string(),
            north_file: DEFAULT_NORTH_FILE.to_string(),
            south_file: DEFAULT_SOUTH_FILE.to_string(),
            polar_pixels_per_degree: DEFAULT_POLAR_PPD,
            north_min_lat: DEFAULT_NORTH_MIN_LAT,
            south_max_lat: DEFAULT_SOUTH_MAX_LAT,
            polar_scale: DEFAULT_POLAR_SCALE,
            polar_offset: DEFAULT_POLAR_OFFSET,
            regional_dir: DEFAULT_REGIONAL_DIR.to_string(),
            regional_prefix: DEFAULT_REGIONAL_PREFIX.to_string(),
            regional_pixels_per_degree: DEFAULT_REGIONAL_PPD,
            extension: DEFAULT_EXTENSION.to_string(),
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            cache_capacity_bytes: Some(DEFAULT_CACHE_CAPACITY_BYTES),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with default layout rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Set the base directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the polar pixel density.
    pub fn with_polar_pixels_per_degree(mut self, ppd: f64) -> Self {
        self.polar_pixels_per_degree = ppd;
        self
    }

    /// Set the regional pixel density.
    pub fn with_regional_pixels_per_degree(mut self, ppd: f64) -> Self {
        self.regional_pixels_per_degree = ppd;
        self
    }

    /// Set the polar cap latitude bands.
    pub fn with_polar_bands(mut self, north_min_lat: f64, south_max_lat: f64) -> Self {
        self.north_min_lat = north_min_lat;
        self.south_max_lat = south_max_lat;
        self
    }

    /// Set the per-chunk cache cap.
    pub fn with_max_chunk_bytes(mut self, bytes: usize) -> Self {
        self.max_chunk_bytes = bytes;
        self
    }

    /// Set the total cache budget (`None` for unbounded).
    pub fn with_cache_capacity(mut self, bytes: Option<u64>) -> Self {
        self.cache_capacity_bytes = bytes;
        self
    }

    /// Directory holding the polar pair.
    pub fn polar_path(&self) -> PathBuf {
        self.base_dir.join(&self.polar_dir)
    }

    /// Directory holding regional tiles.
    pub fn regional_path(&self) -> PathBuf {
        self.base_dir.join(&self.regional_dir)
    }

    /// Load a configuration from an INI file, starting from defaults.
    pub fn from_ini_file(path: &Path) -> Result<Self, StoreError> {
        let ini = Ini::load_from_file(path).map_err(|e| {
            StoreError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::default().merge_ini(&ini)
    }

    /// Parse a configuration from INI text, starting from defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, StoreError> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| StoreError::Config(format!("Failed to parse config: {}", e)))?;
        Self::default().merge_ini(&ini)
    }

    fn merge_ini(mut self, ini: &Ini) -> Result<Self, StoreError> {
        if let Some(section) = ini.section(Some("data")) {
            if let Some(dir) = section.get("base_dir") {
                self.base_dir = PathBuf::from(dir);
            }
            if let Some(ext) = section.get("extension") {
                self.extension = ext.to_string();
            }
        }

        if let Some(section) = ini.section(Some("polar")) {
            set_string(&mut self.polar_dir, section.get("directory"));
            set_string(&mut self.north_file, section.get("north_file"));
            set_string(&mut self.south_file, section.get("south_file"));
            set_parsed(
                &mut self.polar_pixels_per_degree,
                "polar.pixels_per_degree",
                section.get("pixels_per_degree"),
            )?;
            set_parsed(
                &mut self.north_min_lat,
                "polar.north_min_lat",
                section.get("north_min_lat"),
            )?;
            set_parsed(
                &mut self.south_max_lat,
                "polar.south_max_lat",
                section.get("south_max_lat"),
            )?;
            set_parsed(&mut self.polar_scale, "polar.scale", section.get("scale"))?;
            set_parsed(&mut self.polar_offset, "polar.offset", section.get("offset"))?;
        }

        if let Some(section) = ini.section(Some("regional")) {
            set_string(&mut self.regional_dir, section.get("directory"));
            set_string(&mut self.regional_prefix, section.get("prefix"));
            set_string(&mut self.extension, section.get("extension"));
            set_parsed(
                &mut self.regional_pixels_per_degree,
                "regional.pixels_per_degree",
                section.get("pixels_per_degree"),
            )?;
        }

        if let Some(section) = ini.section(Some("cache")) {
            set_parsed(
                &mut self.max_chunk_bytes,
                "cache.max_chunk_bytes",
                section.get("max_chunk_bytes"),
            )?;
            match section.get("capacity_bytes").map(str::trim) {
                None => {}
                Some("") | Some("unbounded") => self.cache_capacity_bytes = None,
                Some(value) => {
                    let bytes = parse_value("cache.capacity_bytes", value)?;
                    self.cache_capacity_bytes = Some(bytes);
                }
            }
        }

        Ok(self)
    }
}

fn set_string(target: &mut String, value: Option<&str>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

fn set_parsed<T: FromStr>(target: &mut T, key: &str, value: Option<&str>) -> Result<(), StoreError> {
    if let Some(value) = value {
        *target = parse_value(key, value)?;
    }
    Ok(())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value
        .trim()
        .parse()
        .map_err(|_| StoreError::Config(format!("Invalid value '{}' for {}", value, key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.polar_pixels_per_degree, 512.0);
        assert_eq!(config.regional_pixels_per_degree, 128.0);
        assert_eq!(config.polar_scale, 0.25);
        assert_eq!(config.polar_offset, -8000.0);
        assert_eq!(config.max_chunk_bytes, 1024 * 1024);
        assert_eq!(config.polar_path(), PathBuf::from("assets/mars_data/meg512"));
        assert_eq!(
            config.regional_path(),
            PathBuf::from("assets/mars_data/meg128")
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = StoreConfig::new("/data")
            .with_polar_pixels_per_degree(4.0 / 360.0)
            .with_regional_pixels_per_degree(4.0 / 90.0)
            .with_polar_bands(80.0, -80.0)
            .with_max_chunk_bytes(64)
            .with_cache_capacity(None);

        assert_eq!(config.base_dir, PathBuf::from("/data"));
        assert_eq!(config.north_min_lat, 80.0);
        assert_eq!(config.south_max_lat, -80.0);
        assert_eq!(config.max_chunk_bytes, 64);
        assert_eq!(config.cache_capacity_bytes, None);
    }

    #[test]
    fn test_ini_overrides() {
        let config = StoreConfig::from_ini_str(
            "[data]\nbase_dir = /srv/mars\n\n\
             [polar]\npixels_per_degree = 256\nnorth_min_lat = 75.0\n\n\
             [regional]\nprefix = megr\n\n\
             [cache]\nmax_chunk_bytes = 4096\ncapacity_bytes = unbounded\n",
        )
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/srv/mars"));
        assert_eq!(config.polar_pixels_per_degree, 256.0);
        assert_eq!(config.north_min_lat, 75.0);
        assert_eq!(config.south_max_lat, DEFAULT_SOUTH_MAX_LAT);
        assert_eq!(config.regional_prefix, "megr");
        assert_eq!(config.max_chunk_bytes, 4096);
        assert_eq!(config.cache_capacity_bytes, None);
    }

    #[test]
    fn test_ini_invalid_number() {
        let result = StoreConfig::from_ini_str("[polar]\nscale = quarter\n");
        match result {
            Err(StoreError::Config(msg)) => assert!(msg.contains("polar.scale")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_ini_file_missing() {
        let result = StoreConfig::from_ini_file(Path::new("/nonexistent/marsdem.ini"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_ini_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\ncapacity_bytes = 1024\n").unwrap();

        let config = StoreConfig::from_ini_file(&path).unwrap();
        assert_eq!(config.cache_capacity_bytes, Some(1024));
    }
}
