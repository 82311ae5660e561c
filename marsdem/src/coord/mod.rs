//! Planetocentric coordinate helpers.
//!
//! All longitudes inside the store are expressed in the 0-360° east-positive
//! convention used by the MOLA products. Callers may pass any finite
//! longitude; it is folded into `[0, 360)` before use.

/// Full circle of longitude in degrees.
pub const FULL_CIRCLE: f64 = 360.0;

/// Southernmost valid latitude.
pub const MIN_LAT: f64 = -90.0;

/// Northernmost valid latitude.
pub const MAX_LAT: f64 = 90.0;

/// Folds a longitude into `[0, 360)`.
///
/// Non-finite input is returned unchanged (NaN stays NaN); validate with
/// [`is_valid_coordinate`] first.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    let folded = lon.rem_euclid(FULL_CIRCLE);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if folded >= FULL_CIRCLE {
        0.0
    } else {
        folded
    }
}

/// Returns true when both components are finite numbers.
#[inline]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite()
}

/// Clamps a latitude into `[-90, 90]`.
#[inline]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Returns true when `lon` lies in the longitude interval `[min, max]`.
///
/// An interval whose `min` exceeds its `max` is treated as wrapping through
/// the seam: `lon >= min || lon <= max`.
#[inline]
pub fn lon_in_interval(lon: f64, min: f64, max: f64) -> bool {
    if min <= max {
        lon >= min && lon <= max
    } else {
        lon >= min || lon <= max
    }
}

/// Eastward angular width of the interval `[min, max]` in degrees.
#[inline]
pub fn lon_span(min: f64, max: f64) -> f64 {
    if min <= max {
        max - min
    } else {
        max + FULL_CIRCLE - min
    }
}

/// Eastward distance from `min` to `lon`, consistent with [`lon_span`].
#[inline]
pub fn lon_offset(lon: f64, min: f64, max: f64) -> f64 {
    if min <= max {
        lon - min
    } else {
        (lon - min).rem_euclid(FULL_CIRCLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_negative_longitude() {
        assert_eq!(normalize_lon(-10.0), 350.0);
        assert_eq!(normalize_lon(-370.0), 350.0);
    }

    #[test]
    fn test_normalize_full_circle_is_zero() {
        assert_eq!(normalize_lon(360.0), 0.0);
        assert_eq!(normalize_lon(720.0), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_stays_in_range() {
        let folded = normalize_lon(-1e-20);
        assert!((0.0..FULL_CIRCLE).contains(&folded));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
        assert!(is_valid_coordinate(-90.0, 359.9));
    }

    #[test]
    fn test_lon_interval_plain() {
        assert!(lon_in_interval(45.0, 0.0, 90.0));
        assert!(lon_in_interval(90.0, 0.0, 90.0));
        assert!(!lon_in_interval(91.0, 0.0, 90.0));
    }

    #[test]
    fn test_lon_interval_wrapping() {
        assert!(lon_in_interval(355.0, 350.0, 10.0));
        assert!(lon_in_interval(5.0, 350.0, 10.0));
        assert!(!lon_in_interval(180.0, 350.0, 10.0));
    }

    #[test]
    fn test_lon_span_and_offset_wrapping() {
        assert_eq!(lon_span(350.0, 10.0), 20.0);
        assert_eq!(lon_offset(355.0, 350.0, 10.0), 5.0);
        assert_eq!(lon_offset(5.0, 350.0, 10.0), 15.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_normalize_in_range(lon in -1.0e6..1.0e6_f64) {
                let folded = normalize_lon(lon);
                prop_assert!((0.0..FULL_CIRCLE).contains(&folded), "{} -> {}", lon, folded);
            }

            #[test]
            fn test_normalize_idempotent(lon in -1.0e6..1.0e6_f64) {
                let once = normalize_lon(lon);
                prop_assert_eq!(normalize_lon(once), once);
            }

            #[test]
            fn test_offset_within_span(
                min in 0.0..360.0_f64,
                max in 0.0..360.0_f64,
                lon in 0.0..360.0_f64,
            ) {
                prop_assume!(lon_in_interval(lon, min, max));
                let offset = lon_offset(lon, min, max);
                prop_assert!(offset >= 0.0 && offset <= lon_span(min, max) + 1e-9);
            }
        }
    }
}
