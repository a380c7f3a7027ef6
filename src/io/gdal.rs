use std::path::Path;

use ::gdal::Dataset;
use ::gdal::raster::ResampleAlg;
use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Band;

/// Reader for any raster format GDAL can open (GeoTIFF, JP2, ENVI, NetCDF)
pub struct GdalBandReader {
    pub dataset: Dataset,
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
}

impl GdalBandReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(Error::UnsupportedFormat("No raster bands found".into()));
        }
        debug!(
            "GDAL opened {:?}: {}x{} with {} band(s)",
            path.as_ref(),
            size_x,
            size_y,
            bands
        );
        Ok(Self {
            dataset,
            size_x: size_x as usize,
            size_y: size_y as usize,
            bands,
        })
    }

    /// Read a single band (1-based index) as an f64 array of shape (height, width)
    pub fn read_band(&self, index: usize) -> Result<Band> {
        if index == 0 || index > self.bands {
            return Err(Error::UnsupportedFormat(format!(
                "Band index {} out of range (raster has {} band(s))",
                index, self.bands
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.size_x, self.size_y);
        let buf = band.read_as::<f64>(
            (0, 0),
            window,
            window,
            Some(ResampleAlg::NearestNeighbour),
        )?;
        Array2::from_shape_vec((self.size_y, self.size_x), buf.data().to_vec())
            .map_err(Error::processing)
    }

    pub fn read_pair(&self, red_band: usize, nir_band: usize) -> Result<(Band, Band)> {
        Ok((self.read_band(red_band)?, self.read_band(nir_band)?))
    }
}
