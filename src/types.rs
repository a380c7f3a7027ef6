//! Shared types used across the crate.
//! Includes the `Band` alias, pixel coordinates, endmembers, the reported
//! `BareFraction`, and the CLI-facing `Method` and `ReportFormat` enums.
use clap::ValueEnum;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One spectral channel as a (rows, cols) grid of reflectance samples.
pub type Band = Array2<f64>;

/// A (row, column) sample location inside a band.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PixelCoord {
    pub row: usize,
    pub col: usize,
}

impl PixelCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn as_index(&self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl std::fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// A reference pixel together with its samples and NDVI.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Endmember {
    pub coord: PixelCoord,
    /// Raw red sample at `coord`
    pub red: f64,
    /// Raw NIR sample at `coord`
    pub nir: f64,
    /// NDVI after the degenerate-band nudge
    pub ndvi: f64,
}

/// The three reference points of a two-channel decomposition.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Endmembers {
    /// Darkest pixel by red+NIR sum, ignoring zero sums
    pub shadow: Endmember,
    /// Brightest red pixel ("Endmember A")
    pub red_max: Endmember,
    /// Brightest NIR pixel ("Endmember B")
    pub nir_max: Endmember,
}

impl Endmembers {
    /// Coordinates in shadow, red-max, nir-max order.
    pub fn coords(&self) -> [PixelCoord; 3] {
        [self.shadow.coord, self.red_max.coord, self.nir_max.coord]
    }

    /// `(red, nir)` reflectance pairs in shadow, red-max, nir-max order,
    /// i.e. the vertices of the decomposition triangle in red/NIR space.
    pub fn decomposition(&self) -> [(f64, f64); 3] {
        [
            (self.shadow.red, self.shadow.nir),
            (self.red_max.red, self.red_max.nir),
            (self.nir_max.red, self.nir_max.nir),
        ]
    }

    /// True when the two brightness endmembers resolved to the same pixel.
    pub fn is_collapsed(&self) -> bool {
        self.red_max.coord == self.nir_max.coord
    }
}

/// Fraction of bare-classified pixels, stored rounded to 5 decimals.
///
/// `Display` always prints exactly 5 decimal digits.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BareFraction(f64);

impl BareFraction {
    pub const ZERO: BareFraction = BareFraction(0.0);

    pub(crate) fn from_counts(bare: usize, total: usize) -> Self {
        BareFraction(crate::core::ndvi::round5(bare as f64 / total as f64))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for BareFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}", self.0)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Endmember-derived threshold only
    Adaptive,
    /// Fixed [-0.1, 0.1] NDVI band only
    Fixed,
    /// Both estimators side by side
    Both,
}

impl Method {
    pub fn runs_adaptive(&self) -> bool {
        matches!(self, Method::Adaptive | Method::Both)
    }

    pub fn runs_fixed(&self) -> bool {
        matches!(self, Method::Fixed | Method::Both)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Adaptive => write!(f, "Adaptive"),
            Method::Fixed => write!(f, "Fixed"),
            Method::Both => write!(f, "Both"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}
