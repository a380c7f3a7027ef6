//! Crate-level error type and `Result` alias.
//! Estimation failures are input-content conditions (empty bands, no shadow
//! candidate, no retained pixels); none are retryable. Reader and I/O errors
//! are converted at the boundary.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty input: {band} band has no elements")]
    EmptyInput { band: &'static str },

    #[error("No shadow candidate: every red+NIR sum is zero over {pixels} pixels")]
    AllZeroSum { pixels: usize },

    #[error("No retained pixels: every red sample is zero over {pixels} pixels")]
    NoRetainedPixels { pixels: usize },

    #[error("Band shape mismatch: red is {}x{}, NIR is {}x{}", red.0, red.1, nir.0, nir.1)]
    DimensionMismatch {
        red: (usize, usize),
        nir: (usize, usize),
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF decoder error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn processing<E: std::fmt::Display>(e: E) -> Self {
        Error::Processing(e.to_string())
    }
}
