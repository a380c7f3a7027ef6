//! Band-pair readers at the boundary of the crate.
//! Provides a pure-Rust multi-sample `tiff` reader, a `json` reader for
//! small hand-written band pairs, and an optional GDAL-backed reader
//! (`gdal` feature). All readers hand back equal-shaped `(red, nir)` bands.
use std::path::Path;

use crate::core::params::EstimationParams;
use crate::error::{Error, Result};
use crate::types::Band;

pub mod json;
pub use json::read_json_bands;

pub mod tiff;
pub use self::tiff::TiffBandReader;

#[cfg(feature = "gdal")]
pub mod gdal;
#[cfg(feature = "gdal")]
pub use self::gdal::GdalBandReader;

/// Extensions picked up by directory scans.
pub const BAND_FILE_EXTENSIONS: &[&str] = &["tif", "tiff", "json"];

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// True when `path` has an extension the readers understand.
pub fn is_band_file(path: &Path) -> bool {
    extension_lower(path)
        .map(|ext| BAND_FILE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Fail with `DimensionMismatch` unless both bands have the same shape.
pub fn check_same_shape(red: &Band, nir: &Band) -> Result<()> {
    if red.dim() != nir.dim() {
        return Err(Error::DimensionMismatch {
            red: red.dim(),
            nir: nir.dim(),
        });
    }
    Ok(())
}

/// Read the red and NIR bands of `path`, dispatching on its extension.
pub fn read_band_pair(path: &Path, params: &EstimationParams) -> Result<(Band, Band)> {
    let (red, nir) = match extension_lower(path).as_deref() {
        Some("tif") | Some("tiff") => {
            TiffBandReader::open(path)?.read_pair(params.red_band, params.nir_band)?
        }
        Some("json") => read_json_bands(path)?,
        #[cfg(feature = "gdal")]
        Some(_) => GdalBandReader::open(path)?.read_pair(params.red_band, params.nir_band)?,
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("")
            )));
        }
    };
    check_same_shape(&red, &nir)?;
    Ok((red, nir))
}
