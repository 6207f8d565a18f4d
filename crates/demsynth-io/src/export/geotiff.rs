//! GeoTIFF writer.

use super::{TerrainWriter, DEFAULT_NODATA};
use crate::geokeys::{
    self, tag, GDAL_NODATA, GEO_ASCII_PARAMS, GEO_KEY_DIRECTORY, MODEL_PIXEL_SCALE,
    MODEL_TIEPOINT,
};
use crate::{GeoIoError, Result};
use demsynth_terrain::Terrain;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use tracing::debug;

/// Writes terrains as single-band `f64` GeoTIFFs.
///
/// Georeferencing is a tiepoint at the upper-left corner plus a square pixel
/// scale; the projection goes into the GeoKey directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTiffWriter {
    /// Value written for non-finite cells and declared in GDAL_NODATA.
    pub nodata_value: f64,
}

impl Default for GeoTiffWriter {
    fn default() -> Self {
        Self {
            nodata_value: DEFAULT_NODATA,
        }
    }
}

impl GeoTiffWriter {
    pub fn new(nodata_value: f64) -> Self {
        Self { nodata_value }
    }
}

impl TerrainWriter for GeoTiffWriter {
    fn write(&self, terrain: &Terrain, path: &Path) -> Result<()> {
        let (rows, cols) = (terrain.rows(), terrain.cols());
        let too_large = || GeoIoError::GridTooLarge { rows, cols };
        let width = u32::try_from(cols).map_err(|_| too_large())?;
        let height = u32::try_from(rows).map_err(|_| too_large())?;

        let data: Vec<f64> = terrain
            .grid()
            .as_slice()
            .iter()
            .map(|&v| if v.is_finite() { v } else { self.nodata_value })
            .collect();

        let pixel_scale = [terrain.cell_size(), terrain.cell_size(), 0.0];
        let tiepoint = [0.0, 0.0, 0.0, terrain.x_min(), terrain.y_max(), 0.0];
        let (directory, citation) = geokeys::encode(terrain.projection_name());
        let nodata = self.nodata_value.to_string();

        let file = File::create(path)?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
        let mut image = encoder.new_image::<colortype::Gray64Float>(width, height)?;
        {
            let tags = image.encoder();
            tags.write_tag(tag(MODEL_PIXEL_SCALE), &pixel_scale[..])?;
            tags.write_tag(tag(MODEL_TIEPOINT), &tiepoint[..])?;
            tags.write_tag(tag(GEO_KEY_DIRECTORY), &directory[..])?;
            tags.write_tag(tag(GEO_ASCII_PARAMS), citation.as_str())?;
            tags.write_tag(tag(GDAL_NODATA), nodata.as_str())?;
        }
        image.write_data(&data)?;

        debug!(
            path = %path.display(),
            rows,
            cols,
            projection = terrain.projection_name(),
            "wrote GeoTIFF"
        );
        Ok(())
    }
}
