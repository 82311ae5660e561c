//! Coordinate-to-pixel mapping and sample decoding.

use super::{TileDescriptor, TileError};
use crate::coord;

/// Bytes per stored sample.
pub const SAMPLE_BYTES: u64 = 2;

/// Scales `fraction` onto `[0, dim)` and clamps to the last pixel.
#[inline]
fn clamp_pixel(fraction: f64, dim: u32) -> u32 {
    let pixel = (fraction * dim as f64).floor();
    // NaN casts to 0
    pixel.clamp(0.0, (dim - 1) as f64) as u32
}

impl TileDescriptor {
    /// Maps a coordinate to the pixel holding it.
    ///
    /// Longitude maps linearly across the tile's interval. Row 0 is the
    /// equator-ward edge: northern and equator-straddling tiles grow rows
    /// with latitude, southern tiles grow rows toward the pole.
    pub fn pixel_index(&self, lat: f64, lon: f64) -> (u32, u32) {
        let extent = self.extent();

        let lon_fraction = coord::lon_offset(lon, extent.min_lon, extent.max_lon)
            / coord::lon_span(extent.min_lon, extent.max_lon);
        let x = clamp_pixel(lon_fraction, self.width());

        let lat_span = extent.max_lat - extent.min_lat;
        let lat_fraction = if extent.min_lat < 0.0 && extent.max_lat <= 0.0 {
            (lat - extent.max_lat).abs() / lat_span
        } else {
            (lat - extent.min_lat) / lat_span
        };
        let y = clamp_pixel(lat_fraction, self.height());

        (x, y)
    }

    /// Decodes the sample at pixel `(x, y)` into meters.
    ///
    /// Fails with [`TileError::OutOfBounds`] when the sample's byte offset
    /// lies outside the file.
    pub fn decode(&self, x: u32, y: u32) -> Result<f32, TileError> {
        let index = y as u64 * self.width() as u64 + x as u64;
        self.decode_index(index)
    }

    /// Decodes the sample at a linear row-major index.
    pub fn decode_index(&self, index: u64) -> Result<f32, TileError> {
        let offset = index.saturating_mul(SAMPLE_BYTES);
        let mut bytes = [0u8; 2];
        self.file().read_exact_at(&mut bytes, offset)?;

        let raw = self.encoding().raw_value(bytes);
        Ok(raw * self.scale() + self.offset())
    }

    /// Resolves and decodes the pixel covering `(lat, lon)`.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> Result<f32, TileError> {
        let (x, y) = self.pixel_index(lat, lon);
        self.decode(x, y)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::tile::{ResolutionTier, SampleEncoding, TileExtent, TileFile};

    struct Fixture {
        _temp: tempfile::NamedTempFile,
        tile: TileDescriptor,
    }

    fn fixture(
        samples: &[u16],
        width: u32,
        height: u32,
        extent: TileExtent,
        encoding: SampleEncoding,
        scale: f32,
        offset: f32,
    ) -> Fixture {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        for s in samples {
            temp.write_all(&s.to_be_bytes()).unwrap();
        }
        temp.flush().unwrap();
        let file = TileFile::open(temp.path()).unwrap();
        let tier = match encoding {
            SampleEncoding::UnsignedScaled => ResolutionTier::High,
            SampleEncoding::SignedMeters => ResolutionTier::Medium,
        };
        let tile = TileDescriptor::new(
            temp.path(),
            file,
            tier,
            1.0,
            extent,
            width,
            height,
            encoding,
            scale,
            offset,
        )
        .unwrap();
        Fixture { _temp: temp, tile }
    }

    fn sequential(count: u16) -> Vec<u16> {
        (0..count).collect()
    }

    fn north_polar() -> Fixture {
        fixture(
            &sequential(16),
            4,
            4,
            TileExtent {
                min_lat: 80.0,
                max_lat: 90.0,
                min_lon: 0.0,
                max_lon: 360.0,
            },
            SampleEncoding::UnsignedScaled,
            0.25,
            -8000.0,
        )
    }

    fn south_regional() -> Fixture {
        fixture(
            &sequential(16),
            4,
            4,
            TileExtent {
                min_lat: -40.0,
                max_lat: 0.0,
                min_lon: 90.0,
                max_lon: 180.0,
            },
            SampleEncoding::SignedMeters,
            1.0,
            0.0,
        )
    }

    #[test]
    fn test_north_rows_grow_with_latitude() {
        let f = north_polar();
        assert_eq!(f.tile.pixel_index(80.0, 0.0), (0, 0));
        assert_eq!(f.tile.pixel_index(86.0, 0.0), (0, 2));
        assert_eq!(f.tile.pixel_index(90.0, 0.0), (0, 3));
    }

    #[test]
    fn test_south_rows_grow_toward_pole() {
        let f = south_regional();
        assert_eq!(f.tile.pixel_index(0.0, 90.0), (0, 0));
        assert_eq!(f.tile.pixel_index(-15.0, 90.0), (0, 1));
        assert_eq!(f.tile.pixel_index(-40.0, 90.0), (0, 3));
    }

    #[test]
    fn test_longitude_maps_linearly() {
        let f = south_regional();
        assert_eq!(f.tile.pixel_index(0.0, 112.5).0, 1);
        assert_eq!(f.tile.pixel_index(0.0, 179.9).0, 3);
    }

    #[test]
    fn test_out_of_range_coordinates_clamp() {
        let f = north_polar();
        assert_eq!(f.tile.pixel_index(70.0, 0.0), (0, 0));
        assert_eq!(f.tile.pixel_index(95.0, 0.0), (0, 3));
        assert_eq!(f.tile.pixel_index(85.0, 360.0).0, 3);
    }

    #[test]
    fn test_equator_straddling_rows_grow_with_latitude() {
        let f = fixture(
            &sequential(16),
            4,
            4,
            TileExtent {
                min_lat: -20.0,
                max_lat: 20.0,
                min_lon: 0.0,
                max_lon: 90.0,
            },
            SampleEncoding::SignedMeters,
            1.0,
            0.0,
        );
        assert_eq!(f.tile.pixel_index(-20.0, 0.0).1, 0);
        assert_eq!(f.tile.pixel_index(5.0, 0.0).1, 2);
    }

    #[test]
    fn test_decode_unsigned_scaled() {
        let f = fixture(
            &[32000, 40000],
            2,
            1,
            TileExtent {
                min_lat: 80.0,
                max_lat: 90.0,
                min_lon: 0.0,
                max_lon: 360.0,
            },
            SampleEncoding::UnsignedScaled,
            0.25,
            -8000.0,
        );
        assert_eq!(f.tile.decode(0, 0).unwrap(), 0.0);
        assert_eq!(f.tile.decode(1, 0).unwrap(), 2000.0);
    }

    #[test]
    fn test_decode_signed_meters() {
        let f = fixture(
            &[(-2500i16) as u16, 1200],
            2,
            1,
            TileExtent {
                min_lat: 0.0,
                max_lat: 44.0,
                min_lon: 0.0,
                max_lon: 90.0,
            },
            SampleEncoding::SignedMeters,
            1.0,
            0.0,
        );
        assert_eq!(f.tile.decode(0, 0).unwrap(), -2500.0);
        assert_eq!(f.tile.decode(1, 0).unwrap(), 1200.0);
    }

    #[test]
    fn test_last_pixel_succeeds_next_fails() {
        let f = north_polar();
        assert_eq!(f.tile.decode(3, 3).unwrap(), 15.0 * 0.25 - 8000.0);
        assert_eq!(f.tile.decode_index(15).unwrap(), 15.0 * 0.25 - 8000.0);

        let err = f.tile.decode_index(16).unwrap_err();
        assert!(matches!(err, TileError::OutOfBounds { offset: 32, len: 32 }));
        assert!(f.tile.decode(0, 4).is_err());
    }

    #[test]
    fn test_elevation_at_pixel_center() {
        let f = south_regional();
        // Pixel (1, 2): columns are 22.5° wide, rows 10° tall
        assert_eq!(f.tile.elevation_at(-25.0, 123.75).unwrap(), 9.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pixel_index_always_inside_grid(
                lat in -200.0..200.0_f64,
                lon in 0.0..360.0_f64,
            ) {
                let f = north_polar();
                let (x, y) = f.tile.pixel_index(lat, lon);
                prop_assert!(x < f.tile.width());
                prop_assert!(y < f.tile.height());
                prop_assert!(f.tile.decode(x, y).is_ok());
            }
        }
    }
}
