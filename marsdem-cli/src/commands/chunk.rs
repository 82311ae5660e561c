//! Region chunk command.

use marsdem::ElevationStore;
use tracing::info;

use super::common::print_json;
use crate::error::CliError;

/// Bounds of a region query as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Render a region and print it as JSON.
pub fn run(store: &ElevationStore, region: Region, resolution: u32) -> Result<(), CliError> {
    let chunk = store.region_chunk(
        region.min_lat,
        region.max_lat,
        region.min_lon,
        region.max_lon,
        resolution,
    )?;
    info!(
        width = chunk.width,
        height = chunk.height,
        source = %chunk.data_source,
        "Rendered chunk"
    );
    print_json(&chunk)
}
