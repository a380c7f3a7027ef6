use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ndvi::{ndvi, pixel_ndvi};
use crate::core::threshold::{AdaptiveThreshold, estimate_adaptive_threshold};
use crate::error::{Error, Result};
use crate::types::{Band, BareFraction};

/// Lower bound of the literature bare-soil NDVI band.
pub const FIXED_BARE_MIN: f64 = -0.1;
/// Upper bound of the literature bare-soil NDVI band.
pub const FIXED_BARE_MAX: f64 = 0.1;

/// Result of the endmember-derived estimator for one image.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AdaptiveEstimate {
    pub fraction: BareFraction,
    #[serde(flatten)]
    pub threshold: AdaptiveThreshold,
}

/// Share of pixels whose per-pixel NDVI is at or below `threshold`.
///
/// Pixels with a red sample of exactly zero are no-data and are left out of
/// both counts. Every retained pixel goes through [`pixel_ndvi`], so the
/// index carries the rounding and the unconditional NIR nudge.
pub fn bare_fraction(red: &Band, nir: &Band, threshold: f64) -> Result<BareFraction> {
    if red.is_empty() {
        return Err(Error::EmptyInput { band: "red" });
    }
    debug_assert_eq!(red.dim(), nir.dim());

    let mut retained = 0usize;
    let mut bare = 0usize;
    for (&r, &n) in red.iter().zip(nir.iter()) {
        if r == 0.0 {
            continue;
        }
        retained += 1;
        if pixel_ndvi(r, n) <= threshold {
            bare += 1;
        }
    }

    if retained == 0 {
        return Err(Error::NoRetainedPixels { pixels: red.len() });
    }

    debug!(
        "Adaptive classifier: {} of {} retained pixels at or below {:.6} ({} no-data)",
        bare,
        retained,
        threshold,
        red.len() - retained
    );
    Ok(BareFraction::from_counts(bare, retained))
}

/// Derive the adaptive threshold for a band pair and classify against it.
pub fn adaptive_bare_fraction(red: &Band, nir: &Band, lambda: f64) -> Result<AdaptiveEstimate> {
    let threshold = estimate_adaptive_threshold(red, nir, lambda)?;
    let fraction = bare_fraction(red, nir, threshold.threshold)?;
    Ok(AdaptiveEstimate {
        fraction,
        threshold,
    })
}

/// Plain elementwise NDVI; infinities and NaN (e.g. both bands zero) become 0.
pub fn fixed_ndvi(red: &Band, nir: &Band) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros(red.raw_dim());
    Zip::from(&mut out)
        .and(red)
        .and(nir)
        .par_for_each(|o, &r, &n| {
            let v = ndvi(r, n);
            *o = if v.is_finite() { v } else { 0.0 };
        });
    out
}

/// Share of all pixels whose plain NDVI lies in `[FIXED_BARE_MIN, FIXED_BARE_MAX]`.
///
/// No pixel is skipped: no-data pixels count as NDVI 0 and therefore as
/// bare. An empty band yields 0.
pub fn bare_fraction_fixed(red: &Band, nir: &Band) -> BareFraction {
    if red.is_empty() {
        return BareFraction::ZERO;
    }

    let index = fixed_ndvi(red, nir);
    let bare = index
        .iter()
        .filter(|v| (FIXED_BARE_MIN..=FIXED_BARE_MAX).contains(*v))
        .count();

    debug!(
        "Fixed classifier: {} of {} pixels within [{}, {}]",
        bare,
        index.len(),
        FIXED_BARE_MIN,
        FIXED_BARE_MAX
    );
    BareFraction::from_counts(bare, index.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_bands() -> (Band, Band) {
        let red = array![
            [0.0, 0.12, 0.30, 0.08],
            [0.15, 0.05, 0.22, 0.0],
            [0.10, 0.18, 0.04, 0.25],
        ];
        let nir = array![
            [0.0, 0.14, 0.28, 0.45],
            [0.16, 0.40, 0.20, 0.3],
            [0.50, 0.19, 0.35, 0.26],
        ];
        (red, nir)
    }

    #[test]
    fn test_red_zero_pixels_are_not_counted() {
        let red = array![[0.0, 0.2], [0.2, 0.0]];
        let nir = array![[0.9, 0.1], [0.5, 0.0]];
        // Retained: (0,1) ndvi<0, (1,0) ndvi>0
        let f = bare_fraction(&red, &nir, 0.0).unwrap();
        assert_eq!(f.value(), 0.5);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let red = array![[0.2]];
        let nir = array![[0.4]];
        let t = pixel_ndvi(0.2, 0.4);
        assert_eq!(bare_fraction(&red, &nir, t).unwrap().value(), 1.0);
        assert_eq!(bare_fraction(&red, &nir, t - 1e-9).unwrap().value(), 0.0);
    }

    #[test]
    fn test_monotonic_in_threshold() {
        let (red, nir) = sample_bands();
        let mut last = 0.0;
        for step in 0..=40 {
            let t = -1.0 + step as f64 * 0.05;
            let f = bare_fraction(&red, &nir, t).unwrap().value();
            assert!(f >= last, "fraction dropped at t={}", t);
            last = f;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_no_retained_pixels_fails() {
        let red = array![[0.0, 0.0], [0.0, 0.0]];
        let nir = array![[0.3, 0.1], [0.0, 0.2]];
        match bare_fraction(&red, &nir, 0.5) {
            Err(Error::NoRetainedPixels { pixels }) => assert_eq!(pixels, 4),
            other => panic!("expected NoRetainedPixels, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_band_adaptive_fails() {
        let red = Band::zeros((0, 0));
        let nir = Band::zeros((0, 0));
        assert!(matches!(
            bare_fraction(&red, &nir, 0.1),
            Err(Error::EmptyInput { .. })
        ));
        assert!(matches!(
            adaptive_bare_fraction(&red, &nir, 0.4),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_fraction_reported_with_five_decimals() {
        let red = array![[0.2, 0.2, 0.2]];
        let nir = array![[0.1, 0.5, 0.5]];
        let f = bare_fraction(&red, &nir, 0.0).unwrap();
        assert_eq!(f.value(), 0.33333);
        assert_eq!(f.to_string(), "0.33333");
    }

    #[test]
    fn test_fixed_counts_no_data_as_bare() {
        let red = array![[0.0, 0.2], [0.1, 0.3]];
        let nir = array![[0.0, 0.21], [0.5, 0.1]];
        // (0,0) NaN -> 0 bare, (0,1) ~0.024 bare, (1,0) 0.667, (1,1) -0.5
        assert_eq!(bare_fraction_fixed(&red, &nir).value(), 0.5);
    }

    #[test]
    fn test_fixed_interval_is_closed() {
        // Integer samples give exactly -0.1, 0.1 and 0.5
        let red = array![[11.0, 9.0, 1.0]];
        let nir = array![[9.0, 11.0, 3.0]];
        let index = fixed_ndvi(&red, &nir);
        assert_eq!(index[[0, 0]], -0.1);
        assert_eq!(index[[0, 1]], 0.1);
        assert_eq!(bare_fraction_fixed(&red, &nir).value(), 0.66667);
    }

    #[test]
    fn test_fixed_ndvi_replaces_non_finite() {
        let red = array![[0.0, -0.2]];
        let nir = array![[0.0, 0.2]];
        let index = fixed_ndvi(&red, &nir);
        assert_eq!(index[[0, 0]], 0.0);
        assert_eq!(index[[0, 1]], 0.0);
    }

    #[test]
    fn test_fixed_empty_band_is_zero() {
        let red = Band::zeros((0, 3));
        let nir = Band::zeros((0, 3));
        assert_eq!(bare_fraction_fixed(&red, &nir), BareFraction::ZERO);
        assert_eq!(bare_fraction_fixed(&red, &nir).to_string(), "0.00000");
    }

    #[test]
    fn test_uniform_bands_both_methods_complete() {
        let red = Band::from_elem((3, 4), 0.2);
        let nir = Band::from_elem((3, 4), 0.2);

        let adaptive = adaptive_bare_fraction(&red, &nir, 0.4).unwrap();
        let fixed = bare_fraction_fixed(&red, &nir);

        // Per-pixel index is nudged away from 0
        assert!(pixel_ndvi(0.2, 0.2) > 0.0);
        assert_eq!(fixed.value(), 1.0);
        for f in [adaptive.fraction, fixed] {
            assert!((0.0..=1.0).contains(&f.value()));
            assert_eq!(f.to_string().split('.').nth(1).map(str::len), Some(5));
        }
    }

    #[test]
    fn test_estimators_idempotent() {
        let (red, nir) = sample_bands();
        let a1 = adaptive_bare_fraction(&red, &nir, 0.4).unwrap();
        let a2 = adaptive_bare_fraction(&red, &nir, 0.4).unwrap();
        assert_eq!(a1, a2);
        assert_eq!(
            a1.fraction.value().to_bits(),
            a2.fraction.value().to_bits()
        );
        assert_eq!(
            bare_fraction_fixed(&red, &nir).value().to_bits(),
            bare_fraction_fixed(&red, &nir).value().to_bits()
        );
    }
}
