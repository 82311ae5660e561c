//! Synthetic tile fixtures shared by unit tests.

use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::tile::{ResolutionTier, SampleEncoding, TileDescriptor, TileExtent, TileFile};

pub(crate) fn extent(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> TileExtent {
    TileExtent {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Writes big-endian samples to `dir/name`.
pub(crate) fn write_samples(dir: &Path, name: &str, samples: &[u16]) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    for s in samples {
        file.write_all(&s.to_be_bytes()).unwrap();
    }
    file.flush().unwrap();
}

/// A 4×4 tile filled with one signed value.
pub(crate) fn flat_tile(
    dir: &Path,
    name: &str,
    tier: ResolutionTier,
    extent: TileExtent,
    value: i16,
) -> TileDescriptor {
    write_samples(dir, name, &[value as u16; 16]);
    let path = dir.join(name);
    let file = TileFile::open(&path).unwrap();
    TileDescriptor::new(
        &path,
        file,
        tier,
        4.0 / 90.0,
        extent,
        4,
        4,
        SampleEncoding::SignedMeters,
        1.0,
        0.0,
    )
    .unwrap()
}

/// A 4×4 tile whose samples are `0..16` in row-major order.
pub(crate) fn sequential_tile(
    dir: &Path,
    name: &str,
    tier: ResolutionTier,
    extent: TileExtent,
) -> TileDescriptor {
    let samples: Vec<u16> = (0..16).collect();
    write_samples(dir, name, &samples);
    let path = dir.join(name);
    let file = TileFile::open(&path).unwrap();
    TileDescriptor::new(
        &path,
        file,
        tier,
        4.0 / 90.0,
        extent,
        4,
        4,
        SampleEncoding::SignedMeters,
        1.0,
        0.0,
    )
    .unwrap()
}

/// Catalog with a high-tier north cap at 1000 m, a medium tile east of
/// the seam at 100 m and one west of it at 200 m.
pub(crate) fn seam_catalog() -> (TempDir, Catalog) {
    let temp = TempDir::new().unwrap();
    let mut catalog = Catalog::new();
    catalog.push(flat_tile(
        temp.path(),
        "north.img",
        ResolutionTier::High,
        extent(60.0, 90.0, 0.0, 360.0),
        1000,
    ));
    catalog.push(flat_tile(
        temp.path(),
        "east.img",
        ResolutionTier::Medium,
        extent(-44.0, 44.0, 0.0, 90.0),
        100,
    ));
    catalog.push(flat_tile(
        temp.path(),
        "west.img",
        ResolutionTier::Medium,
        extent(-44.0, 44.0, 270.0, 360.0),
        200,
    ));
    (temp, catalog)
}
