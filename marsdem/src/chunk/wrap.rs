//! Splitting and merging of regions that cross the 0°/360° seam.
//!
//! A seam-crossing request is served as two ordinary requests, `[min_lon, 360)`
//! on the left and `[0, max_lon)` on the right, each rendered at the full
//! resolution. The merge resamples both onto the original request's grid by
//! nearest-lower-index lookup.
//!
//! A half that fills no output column is skipped. A sliver half whose full
//! resolution grid would pass [`MAX_CHUNK_CELLS`] is rendered at the number of
//! columns it fills instead, which keeps its aspect close to the merged grid.

use super::{Chunk, ChunkRequest, MAX_CHUNK_CELLS};
use crate::coord::FULL_CIRCLE;

/// Splits a seam-crossing request into its left and right halves.
///
/// Either half is `None` when it gets no columns of the merged grid.
pub fn split(request: &ChunkRequest) -> (Option<ChunkRequest>, Option<ChunkRequest>) {
    let width = request.width();
    let column = split_column(width, request.min_lon, request.max_lon);

    let left = (column > 0).then(|| half(request, request.min_lon, FULL_CIRCLE, column));
    let right = (column < width).then(|| half(request, 0.0, request.max_lon, width - column));
    (left, right)
}

fn half(request: &ChunkRequest, min_lon: f64, max_lon: f64, columns: u32) -> ChunkRequest {
    let full = ChunkRequest::span(
        request.min_lat,
        request.max_lat,
        min_lon,
        max_lon,
        request.resolution,
    );
    if full.cells() <= MAX_CHUNK_CELLS {
        full
    } else {
        ChunkRequest::span(request.min_lat, request.max_lat, min_lon, max_lon, columns)
    }
}

/// Output column where the right half begins.
pub fn split_column(width: u32, min_lon: f64, max_lon: f64) -> u32 {
    let left_span = FULL_CIRCLE - min_lon;
    let span = left_span + max_lon;
    let column = (width as f64 * left_span / span).round();
    column.clamp(0.0, width as f64) as u32
}

/// Index into a source axis of length `len` for position `pos` of `out_len`.
#[inline]
fn resample(pos: u32, out_len: u32, len: u32) -> u32 {
    let index = (pos as f64 / out_len as f64 * len as f64).floor() as u32;
    index.min(len.saturating_sub(1))
}

/// Fills `out` from row `y` of an `height`-row grid, sampling `source`.
fn sample_row(out: &mut [f32], source: &Chunk, y: u32, height: u32) {
    let source_y = resample(y, height, source.height);
    let len = out.len() as u32;
    for (x, cell) in out.iter_mut().enumerate() {
        let source_x = resample(x as u32, len, source.width);
        *cell = source.get(source_x, source_y).unwrap_or(0.0);
    }
}

/// Combines the halves produced by [`split`] into one chunk on the grid of
/// `request`.
pub fn merge(request: &ChunkRequest, left: Option<&Chunk>, right: Option<&Chunk>) -> Chunk {
    let width = request.width();
    let height = request.height();
    let split = split_column(width, request.min_lon, request.max_lon) as usize;

    let mut elevation = vec![0.0f32; width as usize * height as usize];
    for (y, row) in elevation.chunks_mut(width as usize).enumerate() {
        let (west, east) = row.split_at_mut(split);
        if let Some(left) = left {
            sample_row(west, left, y as u32, height);
        }
        if let Some(right) = right {
            sample_row(east, right, y as u32, height);
        }
    }

    let left_share = (FULL_CIRCLE - request.min_lon) / request.lon_span() * 100.0;
    let parts: Vec<String> = [(left, left_share), (right, 100.0 - left_share)]
        .into_iter()
        .filter_map(|(half, share)| {
            half.map(|chunk| format!("{:.1}% from {}", share, chunk.data_source))
        })
        .collect();
    let data_source = format!("merged: {}", parts.join(", "));

    Chunk::from_request(request, elevation, data_source)
}
