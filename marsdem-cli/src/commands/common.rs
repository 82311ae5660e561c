//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use marsdem::{ElevationStore, StoreConfig};
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;

/// Default configuration file location: `<config dir>/marsdem/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marsdem").join("config.ini"))
}

/// Resolve the store configuration.
///
/// An explicit `--config` file must exist. Otherwise the default file is
/// used when present, and built-in defaults when not. `--data-dir` overrides
/// the base directory from either source.
pub fn resolve_config(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<StoreConfig, CliError> {
    let mut config = match config_path {
        Some(path) => StoreConfig::from_ini_file(path)
            .map_err(|e| CliError::Config(e.to_string()))?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "Using default config file");
                StoreConfig::from_ini_file(&path)
                    .map_err(|e| CliError::Config(e.to_string()))?
            }
            None => StoreConfig::default(),
        },
    };

    if let Some(dir) = data_dir {
        config = config.with_base_dir(dir);
    }
    Ok(config)
}

/// Open the store described by the global CLI options.
pub fn open_store(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<ElevationStore, CliError> {
    let config = resolve_config(config_path, data_dir)?;
    Ok(ElevationStore::open(config)?)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope.ini");
        let err = resolve_config(Some(&missing), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_data_dir_overrides_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let ini = temp.path().join("config.ini");
        std::fs::write(&ini, "[data]\nbase_dir = /srv/mars\n").unwrap();

        let config = resolve_config(Some(&ini), None).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/mars"));

        let config = resolve_config(Some(&ini), Some(Path::new("/tmp/mola"))).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/tmp/mola"));
    }

    #[test]
    fn test_default_config_path_is_namespaced() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("marsdem/config.ini"));
        }
    }
}
