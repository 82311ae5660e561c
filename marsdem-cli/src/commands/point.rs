//! Point elevation command.

use marsdem::ElevationStore;

use super::common::print_json;
use crate::error::CliError;

/// Print the elevation at `(lat, lon)`, probing nearby points when `near`.
pub fn run(store: &ElevationStore, lat: f64, lon: f64, near: bool) -> Result<(), CliError> {
    let point = if near {
        store.point_elevation_near(lat, lon)?
    } else {
        store.point_elevation(lat, lon)?
    };
    print_json(&point)
}
