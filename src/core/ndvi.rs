//! Scalar NDVI helpers shared by the endmember search and both classifiers.
//!
//! The nudge magnitudes below are heuristic stabilizers and differ per call
//! site.

/// Added to NIR at the shadow point when red == NIR.
pub const SHADOW_EPSILON: f64 = 0.001;

/// Added to NIR at the red-max / nir-max endmembers when red == NIR.
pub const ENDMEMBER_EPSILON: f64 = 0.01;

/// Added to every retained pixel's rounded NIR above `PIXEL_NUDGE_FLOOR`.
pub const PIXEL_EPSILON: f64 = 0.001;

/// Rounded NIR must exceed this before `PIXEL_EPSILON` is applied.
pub const PIXEL_NUDGE_FLOOR: f64 = 0.001;

/// Scale for the 5-decimal rounding of samples and reported fractions.
const ROUND_SCALE: f64 = 1e5;

/// `(nir - red) / (nir + red)` with no guarding.
#[inline]
pub fn ndvi(red: f64, nir: f64) -> f64 {
    (nir - red) / (nir + red)
}

/// NDVI where equal bands are split apart by moving NIR up by `epsilon`.
///
/// Without the nudge a flat spectrum would report an index of exactly 0
/// (or 0/0 for two zero samples).
#[inline]
pub fn ndvi_nudged(red: f64, nir: f64, epsilon: f64) -> f64 {
    let nir = if nir == red { nir + epsilon } else { nir };
    ndvi(red, nir)
}

/// Per-pixel NDVI used by the adaptive classifier: both samples rounded to
/// 5 decimals, then NIR nudged whenever it exceeds the floor.
#[inline]
pub fn pixel_ndvi(red: f64, nir: f64) -> f64 {
    let red = round5(red);
    let mut nir = round5(nir);
    if nir > PIXEL_NUDGE_FLOOR {
        nir += PIXEL_EPSILON;
    }
    ndvi(red, nir)
}

/// Round to 5 decimal places as `rint(value * 1e5) / 1e5`, ties to even.
#[inline]
pub fn round5(value: f64) -> f64 {
    (value * ROUND_SCALE).round_ties_even() / ROUND_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndvi_basic() {
        assert!((ndvi(0.1, 0.5) - 0.4 / 0.6).abs() < 1e-12);
        assert_eq!(ndvi(0.3, 0.3), 0.0);
        assert!(ndvi(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_nudge_only_on_equal_bands() {
        assert_eq!(ndvi_nudged(0.2, 0.4, SHADOW_EPSILON), ndvi(0.2, 0.4));

        let nudged = ndvi_nudged(0.2, 0.2, SHADOW_EPSILON);
        assert!(nudged > 0.0);
        assert!((nudged - 0.001 / 0.401).abs() < 1e-12);

        // Looser guard at the brightness endmembers
        let loose = ndvi_nudged(0.2, 0.2, ENDMEMBER_EPSILON);
        assert!((loose - 0.01 / 0.41).abs() < 1e-12);
    }

    #[test]
    fn test_nudge_makes_zero_pixel_defined() {
        assert_eq!(ndvi_nudged(0.0, 0.0, ENDMEMBER_EPSILON), 1.0);
    }

    #[test]
    fn test_pixel_ndvi_nudges_above_floor() {
        // 0.3 + 0.001 on the NIR side
        let v = pixel_ndvi(0.1, 0.3);
        assert!((v - (0.301 - 0.1) / (0.301 + 0.1)).abs() < 1e-12);

        // At or below the floor the NIR sample is left alone
        assert_eq!(pixel_ndvi(0.001, 0.001), 0.0);
        assert_eq!(pixel_ndvi(0.5, 0.0), -1.0);
    }

    #[test]
    fn test_pixel_ndvi_rounds_inputs() {
        assert_eq!(pixel_ndvi(0.1000004, 0.3000004), pixel_ndvi(0.1, 0.3));
    }

    #[test]
    fn test_round5() {
        assert_eq!(round5(0.123456), 0.12346);
        assert_eq!(round5(0.5), 0.5);
        assert_eq!(round5(-0.0000049), -0.0);
        assert_eq!(round5(2.0 / 3.0), 0.66667);
        assert!(round5(f64::NAN).is_nan());
        assert_eq!(round5(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_round5_scaled_half_way_goes_to_even() {
        assert_eq!(round5(0.176115), 0.17612);
        assert_eq!(round5(0.154555), 0.15456);
        assert_eq!(round5(0.000025), 0.00002);
        assert_eq!(round5(0.000035), 0.00004);
    }

    #[test]
    fn test_pixel_ndvi_uses_scaled_rounding() {
        let expected = ndvi(0.15456, 0.30100);
        assert_eq!(pixel_ndvi(0.154555, 0.3), expected);
        assert!((pixel_ndvi(0.154555, 0.3) - 0.32145052).abs() < 1e-8);
    }
}
