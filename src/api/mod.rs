//! High-level, ergonomic library API: estimate a band pair in memory, a
//! single raster file, or every raster in a directory. Prefer these entry
//! points over the low-level `core` modules when integrating the estimators.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::classify::{AdaptiveEstimate, adaptive_bare_fraction, bare_fraction_fixed};
use crate::core::params::EstimationParams;
use crate::error::{Error, Result};
use crate::io::{check_same_shape, is_band_file, read_band_pair};
use crate::types::{Band, BareFraction};

/// Side-by-side result of the requested estimators for one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationReport {
    /// Endmember-derived threshold method (None when not requested)
    pub adaptive: Option<AdaptiveEstimate>,
    /// Fixed [-0.1, 0.1] NDVI band method (None when not requested)
    pub fixed: Option<BareFraction>,
}

/// Estimation result tagged with the file it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    #[serde(flatten)]
    pub report: EstimationReport,
}

/// A file that could not be estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub name: String,
    pub message: String,
}

/// Batch processing report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<FileReport>,
    pub errors: Vec<FileError>,
    pub processed: usize,
    pub failed: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run the estimators selected by `params.method` on one band pair.
pub fn estimate_bands(red: &Band, nir: &Band, params: &EstimationParams) -> Result<EstimationReport> {
    params.validate()?;
    check_same_shape(red, nir)?;

    let adaptive = if params.method.runs_adaptive() {
        Some(adaptive_bare_fraction(red, nir, params.lambda)?)
    } else {
        None
    };
    let fixed = if params.method.runs_fixed() {
        Some(bare_fraction_fixed(red, nir))
    } else {
        None
    };

    Ok(EstimationReport { adaptive, fixed })
}

/// Read a raster and run the requested estimators on its red/NIR bands.
pub fn estimate_file(path: &Path, params: &EstimationParams) -> Result<FileReport> {
    let (red, nir) = read_band_pair(path, params)?;
    let report = estimate_bands(&red, &nir, params)?;
    let name = file_name(path);

    match (&report.adaptive, &report.fixed) {
        (Some(a), Some(f)) => info!(
            "{}: adaptive={} (threshold {:.5}) fixed={}",
            name, a.fraction, a.threshold.threshold, f
        ),
        (Some(a), None) => info!(
            "{}: adaptive={} (threshold {:.5})",
            name, a.fraction, a.threshold.threshold
        ),
        (None, Some(f)) => info!("{}: fixed={}", name, f),
        (None, None) => {}
    }

    Ok(FileReport { name, report })
}

/// Sorted list of raster files (by extension) directly inside `input_dir`
pub fn iterate_band_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && is_band_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Estimate every raster in `input_dir`.
///
/// Files are processed in parallel; each image's own estimation stays
/// sequential. Results keep sorted file order.
///
/// If `continue_on_error` is false the first failing file (in that order)
/// aborts the batch: files sorted after a known failure are not read, and
/// the returned error is the one from the earliest failing file.
pub fn estimate_directory(
    input_dir: &Path,
    params: &EstimationParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    params.validate()?;
    let files = iterate_band_files(input_dir)?;
    if files.is_empty() {
        warn!("No raster files found in {:?}", input_dir);
    }

    // Lowest index known to have failed; later files are skipped when failing fast
    let first_failure = AtomicUsize::new(usize::MAX);
    let outcomes: Vec<(PathBuf, Option<Result<FileReport>>)> = files
        .into_par_iter()
        .enumerate()
        .map(|(index, path)| {
            if !continue_on_error && index > first_failure.load(Ordering::Relaxed) {
                return (path, None);
            }
            let outcome = estimate_file(&path, params);
            if !continue_on_error && outcome.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            (path, Some(outcome))
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        let Some(outcome) = outcome else {
            continue;
        };
        match outcome {
            Ok(file_report) => {
                report.processed += 1;
                report.results.push(file_report);
            }
            Err(e) => {
                if !continue_on_error {
                    return Err(e);
                }
                warn!("Error processing {:?}: {}", path, e);
                report.failed += 1;
                report.errors.push(FileError {
                    name: file_name(&path),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch complete: processed={} failed={}",
        report.processed, report.failed
    );
    Ok(report)
}

impl BatchReport {
    /// Return an error if nothing at all could be estimated.
    pub fn ensure_any_processed(&self) -> Result<()> {
        if self.processed == 0 && self.failed > 0 {
            return Err(Error::Processing(format!(
                "none of {} file(s) could be estimated",
                self.failed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;
    use ndarray::array;

    #[test]
    fn test_method_selection() {
        let red = array![[0.1, 0.2], [0.3, 0.05]];
        let nir = array![[0.4, 0.2], [0.35, 0.5]];

        let both = estimate_bands(&red, &nir, &EstimationParams::default()).unwrap();
        assert!(both.adaptive.is_some() && both.fixed.is_some());

        let params = EstimationParams {
            method: Method::Fixed,
            ..Default::default()
        };
        let fixed = estimate_bands(&red, &nir, &params).unwrap();
        assert!(fixed.adaptive.is_none());
        assert!(fixed.fixed.is_some());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let red = array![[0.1, 0.2]];
        let nir = array![[0.1], [0.2]];
        assert!(matches!(
            estimate_bands(&red, &nir, &EstimationParams::default()),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_fixed_only_tolerates_empty_bands() {
        let red = Band::zeros((0, 0));
        let nir = Band::zeros((0, 0));
        let params = EstimationParams {
            method: Method::Fixed,
            ..Default::default()
        };
        let r = estimate_bands(&red, &nir, &params).unwrap();
        assert_eq!(r.fixed, Some(BareFraction::ZERO));

        assert!(matches!(
            estimate_bands(&red, &nir, &EstimationParams::default()),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_ensure_any_processed() {
        let report = BatchReport {
            failed: 2,
            ..Default::default()
        };
        assert!(report.ensure_any_processed().is_err());
        assert!(BatchReport::default().ensure_any_processed().is_ok());
    }
}
