use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::tiff::decoder::{Decoder, DecodingResult};
use ::tiff::tags::Tag;
use ndarray::{Array2, s};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Band;

/// Multi-sample TIFF/GeoTIFF decoded into `f64` samples.
///
/// Samples are expected interleaved per pixel (chunky layout), one sample per
/// spectral band, which is how multi-band exports are written by default.
/// Planar files are rejected on open.
pub struct TiffBandReader {
    /// Width (pixels) of the raster
    pub width: usize,
    /// Height (lines) of the raster
    pub height: usize,
    /// Number of samples (bands) per pixel
    pub bands: usize,
    /// Pixel-interleaved samples, shape (height, width * bands)
    samples: Array2<f64>,
}

fn samples_to_f64(image: DecodingResult) -> Result<Vec<f64>> {
    Ok(match image {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        #[allow(unreachable_patterns)]
        _ => {
            return Err(Error::UnsupportedFormat(
                "TIFF sample type not supported".into(),
            ));
        }
    })
}

/// PlanarConfiguration tag value for band-sequential storage.
const PLANAR_SEPARATE: u16 = 2;

/// Only chunky storage (tag absent or 1) is split by `read_band`.
fn ensure_chunky(planar_config: Option<u16>) -> Result<()> {
    match planar_config {
        Some(PLANAR_SEPARATE) => Err(Error::UnsupportedFormat(
            "planar (band-interleaved) TIFF; use the gdal feature".into(),
        )),
        _ => Ok(()),
    }
}

impl TiffBandReader {
    /// Decode the first image of a TIFF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut decoder = Decoder::new(BufReader::new(file))?;
        ensure_chunky(decoder.find_tag_unsigned::<u16>(Tag::PlanarConfiguration)?)?;
        let (width, height) = decoder.dimensions()?;
        let (width, height) = (width as usize, height as usize);
        let data = samples_to_f64(decoder.read_image()?)?;

        let pixels = width * height;
        if pixels == 0 || data.len() % pixels != 0 {
            return Err(Error::UnsupportedFormat(format!(
                "{} samples do not tile a {}x{} raster",
                data.len(),
                width,
                height
            )));
        }
        let bands = data.len() / pixels;
        let samples =
            Array2::from_shape_vec((height, width * bands), data).map_err(Error::processing)?;

        debug!(
            "Decoded {:?}: {}x{} with {} band(s)",
            path.as_ref(),
            width,
            height,
            bands
        );
        Ok(Self {
            width,
            height,
            bands,
            samples,
        })
    }

    /// Read a single band (1-based index) as an array of shape (height, width)
    pub fn read_band(&self, index: usize) -> Result<Band> {
        if index == 0 || index > self.bands {
            return Err(Error::UnsupportedFormat(format!(
                "Band index {} out of range (raster has {} band(s))",
                index, self.bands
            )));
        }
        let step = self.bands as isize;
        Ok(self
            .samples
            .slice(s![.., (index - 1)..;step])
            .to_owned())
    }

    /// Read the red and NIR bands by their 1-based indices.
    pub fn read_pair(&self, red_band: usize, nir_band: usize) -> Result<(Band, Band)> {
        Ok((self.read_band(red_band)?, self.read_band(nir_band)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_layout_rejected() {
        let err = ensure_chunky(Some(2)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref msg) if msg.contains("planar")));
    }

    #[test]
    fn test_chunky_layout_accepted() {
        assert!(ensure_chunky(None).is_ok());
        assert!(ensure_chunky(Some(1)).is_ok());
    }
}
