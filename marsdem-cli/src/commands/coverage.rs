//! Coverage lookup command.

use marsdem::ElevationStore;

use super::common::print_json;
use crate::error::CliError;

/// Print which tile serves `(lat, lon)` and the pixel it maps to.
pub fn run(store: &ElevationStore, lat: f64, lon: f64) -> Result<(), CliError> {
    match store.coverage(lat, lon)? {
        Some(coverage) => print_json(&coverage),
        None => {
            println!("No tile covers ({}, {})", lat, lon);
            Ok(())
        }
    }
}
