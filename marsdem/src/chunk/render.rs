//! Grid resampling over the tile catalog.

use rayon::prelude::*;
use tracing::debug;

use super::{Chunk, ChunkRequest, SourceTally};
use crate::catalog::Catalog;
use crate::coord;

/// Samples `request` on its output grid.
///
/// Cell `(x, y)` takes the elevation at latitude
/// `min_lat + lat_span * y / height` and longitude
/// `min_lon + lon_span * x / width`. Cells with no covering tile, or whose
/// tile fails to decode, are written as 0 and counted as no data. Rows are
/// sampled in parallel.
pub fn render(catalog: &Catalog, request: &ChunkRequest) -> Chunk {
    let width = request.width() as usize;
    let height = request.height();
    let lat_span = request.lat_span();
    let lon_span = request.lon_span();

    let mut elevation = vec![0.0f32; width * height as usize];

    let tally = elevation
        .par_chunks_mut(width)
        .enumerate()
        .map(|(y, row)| {
            let mut tally = SourceTally::default();
            let lat = request.min_lat + lat_span * (y as f64 / height as f64);

            for (x, cell) in row.iter_mut().enumerate() {
                let lon = coord::normalize_lon(
                    request.min_lon + lon_span * (x as f64 / width as f64),
                );
                match catalog.find_tile(lat, lon) {
                    Some(tile) => match tile.elevation_at(lat, lon) {
                        Ok(value) => {
                            *cell = value;
                            tally.record(Some(tile.tier()));
                        }
                        Err(_) => tally.record_decode_failure(),
                    },
                    None => tally.record(None),
                }
            }
            tally
        })
        .reduce(SourceTally::default, SourceTally::merge);

    if tally.decode_failures > 0 {
        debug!(
            failures = tally.decode_failures,
            "Some chunk cells failed to decode and were filled with 0"
        );
    }

    debug!(
        width = width,
        height = height,
        high = tally.high,
        medium = tally.medium,
        no_data = tally.no_data,
        "Rendered chunk"
    );

    Chunk::from_request(request, elevation, tally.to_string())
}
