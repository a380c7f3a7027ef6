use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::threshold::DEFAULT_LAMBDA;
use crate::error::{Error, Result};
use crate::types::Method;

/// Estimation parameters suitable for config files and batch runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationParams {
    /// Decomposition weight for the brightness endmembers
    pub lambda: f64,
    pub method: Method,
    /// 1-based index of the red band inside a multi-band raster
    pub red_band: usize,
    /// 1-based index of the NIR band inside a multi-band raster
    pub nir_band: usize,
}

impl Default for EstimationParams {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            method: Method::Both,
            red_band: 1,
            nir_band: 2,
        }
    }
}

impl EstimationParams {
    /// Load parameters from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: EstimationParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lambda.is_finite() {
            return Err(Error::InvalidArgument {
                arg: "lambda",
                value: self.lambda.to_string(),
            });
        }
        if self.red_band == 0 {
            return Err(Error::InvalidArgument {
                arg: "red_band",
                value: "0".into(),
            });
        }
        if self.nir_band == 0 {
            return Err(Error::InvalidArgument {
                arg: "nir_band",
                value: "0".into(),
            });
        }
        if self.red_band == self.nir_band {
            return Err(Error::InvalidArgument {
                arg: "nir_band",
                value: format!("{} (same as red_band)", self.nir_band),
            });
        }
        Ok(())
    }
}
