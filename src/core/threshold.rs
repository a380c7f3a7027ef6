use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::endmembers::locate_endmembers;
use crate::error::{Error, Result};
use crate::types::{Band, Endmembers};

/// Default decomposition weight applied to the two brightness endmembers.
pub const DEFAULT_LAMBDA: f64 = 0.4;

/// Threshold derived from an image's own endmembers.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AdaptiveThreshold {
    /// Pixels with per-pixel NDVI at or below this value are bare
    pub threshold: f64,
    pub lambda: f64,
    pub endmembers: Endmembers,
}

/// `min(lambda * rmax_ndvi, lambda * nmax_ndvi, shadow_ndvi)`.
///
/// The shadow index enters unweighted; the minimum keeps the threshold
/// conservative when the references disagree.
pub fn combine_threshold(shadow_ndvi: f64, rmax_ndvi: f64, nmax_ndvi: f64, lambda: f64) -> f64 {
    (lambda * rmax_ndvi).min(lambda * nmax_ndvi).min(shadow_ndvi)
}

/// Locate the endmembers of a band pair and combine their indices into a
/// classification threshold.
pub fn estimate_adaptive_threshold(red: &Band, nir: &Band, lambda: f64) -> Result<AdaptiveThreshold> {
    if !lambda.is_finite() {
        return Err(Error::InvalidArgument {
            arg: "lambda",
            value: lambda.to_string(),
        });
    }

    let endmembers = locate_endmembers(red, nir)?;
    let threshold = combine_threshold(
        endmembers.shadow.ndvi,
        endmembers.red_max.ndvi,
        endmembers.nir_max.ndvi,
        lambda,
    );
    debug!("Adaptive threshold {:.6} (lambda={})", threshold, lambda);

    Ok(AdaptiveThreshold {
        threshold,
        lambda,
        endmembers,
    })
}
