#![doc = r#"
BARESOIL: exposed-soil fraction estimation from red/NIR band pairs.

This crate estimates which share of a multispectral scene is bare soil without
ground-truth calibration. The adaptive estimator derives a per-image NDVI
threshold from three reference pixels of the scene itself (the darkest nonzero
pixel, the brightest red pixel and the brightest NIR pixel) and classifies
every pixel against it. A fixed-range estimator using the literature band
NDVI ∈ [-0.1, 0.1] is provided as a baseline, and both are usually reported
side by side.

Add dependency
--------------
```toml
[dependencies]
baresoil = "0.1"
```

Quick start: estimate an in-memory band pair
--------------------------------------------
```rust
use ndarray::array;
use baresoil::{adaptive_bare_fraction, bare_fraction_fixed, DEFAULT_LAMBDA};

fn main() -> baresoil::Result<()> {
    let red = array![[0.0, 0.12, 0.30], [0.15, 0.05, 0.22]];
    let nir = array![[0.0, 0.14, 0.28], [0.16, 0.40, 0.20]];

    let adaptive = adaptive_bare_fraction(&red, &nir, DEFAULT_LAMBDA)?;
    let fixed = bare_fraction_fixed(&red, &nir);

    println!("threshold={:.5}", adaptive.threshold.threshold);
    println!("adaptive={} fixed={}", adaptive.fraction, fixed);
    println!("endmembers={:?}", adaptive.threshold.endmembers.coords());
    Ok(())
}
```

Estimate a directory of rasters
-------------------------------
```rust,no_run
use std::path::Path;
use baresoil::{estimate_directory, EstimationParams, Method};

fn main() -> baresoil::Result<()> {
    let params = EstimationParams {
        method: Method::Both,
        ..Default::default()
    };
    let report = estimate_directory(Path::new("/data/scenes"), &params, true)?;
    for file in &report.results {
        println!("{}: {:?}", file.name, file.report.adaptive.map(|a| a.fraction));
    }
    Ok(())
}
```

Error handling
--------------
All fallible functions return `baresoil::Result<T>`. Empty bands, bands whose
red+NIR sums are all zero and bands whose red samples are all zero are
reported as `Error::EmptyInput`, `Error::AllZeroSum` and
`Error::NoRetainedPixels` instead of a misleading 0.0 fraction. The fixed
estimator is the one exception: an empty band yields 0.

Feature flags
-------------
- `gdal`: adds a GDAL-backed reader for raster formats beyond TIFF.

Useful modules
--------------
- [`api`] : high-level, ergonomic entry points.
- [`core`] : endmember search, threshold derivation and classifiers.
- [`types`] : `Band`, `Endmembers`, `BareFraction`, `Method`.
- [`io`] : TIFF, JSON and (optionally) GDAL band-pair readers.
- [`error`] : crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::EstimationParams;
pub use error::{Error, Result};
pub use types::{Band, BareFraction, Endmember, Endmembers, Method, PixelCoord, ReportFormat};

// Estimators
pub use core::classify::{
    AdaptiveEstimate, adaptive_bare_fraction, bare_fraction, bare_fraction_fixed, fixed_ndvi,
};
pub use core::endmembers::locate_endmembers;
pub use core::threshold::{AdaptiveThreshold, DEFAULT_LAMBDA, estimate_adaptive_threshold};

// Readers
pub use io::{TiffBandReader, read_band_pair, read_json_bands};

// High-level API re-exports
pub use api::{
    BatchReport, EstimationReport, FileError, FileReport, estimate_bands, estimate_directory,
    estimate_file, iterate_band_files,
};
