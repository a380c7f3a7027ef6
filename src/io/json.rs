use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::Band;

/// `{"red": [[..], ..], "nir": [[..], ..]}` with one inner array per row.
#[derive(Debug, Clone, Deserialize)]
pub struct BandPairDocument {
    pub red: Vec<Vec<f64>>,
    pub nir: Vec<Vec<f64>>,
}

fn rows_to_band(rows: Vec<Vec<f64>>, name: &str) -> Result<Band> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(Error::UnsupportedFormat(format!(
            "{} band row {} has {} samples, expected {}",
            name,
            bad,
            rows[bad].len(),
            ncols
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(Error::processing)
}

impl BandPairDocument {
    pub fn into_bands(self) -> Result<(Band, Band)> {
        Ok((rows_to_band(self.red, "red")?, rows_to_band(self.nir, "nir")?))
    }
}

/// Read a red/NIR pair from a JSON document.
pub fn read_json_bands(path: &Path) -> Result<(Band, Band)> {
    let text = std::fs::read_to_string(path)?;
    let doc: BandPairDocument = serde_json::from_str(&text)?;
    doc.into_bands()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_document_into_bands() {
        let doc: BandPairDocument =
            serde_json::from_str(r#"{"red": [[0.1, 0.2], [0.3, 0.4]], "nir": [[0.5, 0.6], [0.7, 0.8]]}"#)
                .unwrap();
        let (red, nir) = doc.into_bands().unwrap();
        assert_eq!(red, array![[0.1, 0.2], [0.3, 0.4]]);
        assert_eq!(nir[[1, 0]], 0.7);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let doc = BandPairDocument {
            red: vec![vec![0.1, 0.2], vec![0.3]],
            nir: vec![vec![0.1, 0.2], vec![0.3, 0.4]],
        };
        assert!(matches!(doc.into_bands(), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_document_gives_empty_bands() {
        let doc = BandPairDocument {
            red: vec![],
            nir: vec![],
        };
        let (red, nir) = doc.into_bands().unwrap();
        assert!(red.is_empty() && nir.is_empty());
    }
}
