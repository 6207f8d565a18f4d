//! GeoTIFF georeferencing reader.

use super::{default_projection, Bounds, SourceFormat, SourceMetadata};
use crate::geokeys::{
    self, tag, GEO_ASCII_PARAMS, GEO_KEY_DIRECTORY, MODEL_PIXEL_SCALE, MODEL_TIEPOINT,
    MODEL_TRANSFORMATION,
};
use crate::{GeoIoError, Result};
use demsynth_terrain::{Extent, Grid};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::warn;

/// Decoder with limits raised for large elevation rasters.
fn open(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;
    limits.ifd_value_size = 1024 * 1024 * 1024;
    Ok(Decoder::new(BufReader::new(file))?.with_limits(limits))
}

pub(super) fn read_metadata(path: &Path) -> Result<SourceMetadata> {
    let mut decoder = open(path)?;
    let extent = read_extent(&mut decoder)?;

    let projection_name = read_projection(&mut decoder).unwrap_or_else(|| {
        warn!(
            "{} carries no usable GeoKey projection; assuming {}",
            path.display(),
            default_projection()
        );
        default_projection()
    });

    Ok(SourceMetadata {
        extent,
        projection_name,
        format: SourceFormat::GeoTiff,
    })
}

/// Read the first band of a GeoTIFF into a grid, north row first.
pub fn read_geotiff_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let mut decoder = open(path.as_ref())?;
    let (width, height) = decoder.dimensions()?;
    let (rows, cols) = (height as usize, width as usize);
    let samples = read_samples(&mut decoder)?;
    let found = samples.len();
    Grid::from_vec(rows, cols, samples).ok_or_else(|| {
        GeoIoError::InvalidGeoTiff(format!(
            "expected {} single-band samples, found {}",
            rows * cols,
            found
        ))
    })
}

/// Extent from ModelTiepoint + ModelPixelScale, or from ModelTransformation.
fn read_extent<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Extent> {
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as f64, height as f64);

    let tiepoint = decoder.get_tag_f64_vec(tag(MODEL_TIEPOINT));
    let pixel_scale = decoder.get_tag_f64_vec(tag(MODEL_PIXEL_SCALE));

    if let (Ok(tiepoint), Ok(scale)) = (tiepoint, pixel_scale) {
        if tiepoint.len() >= 6 && scale.len() >= 2 {
            // Tiepoint format: [i, j, k, x, y, z], raster (i, j) maps to model (x, y)
            let (i, j) = (tiepoint[0], tiepoint[1]);
            let (scale_x, scale_y) = (scale[0], scale[1]);
            let x_min = tiepoint[3] - i * scale_x;
            let y_max = tiepoint[4] + j * scale_y;
            return Ok(Extent::new(
                x_min,
                y_max - height * scale_y,
                x_min + width * scale_x,
                y_max,
            ));
        }
    }

    if let Ok(matrix) = decoder.get_tag_f64_vec(tag(MODEL_TRANSFORMATION)) {
        if matrix.len() >= 8 {
            // Row-major 4x4; only the affine x/y rows matter
            let apply = |col: f64, row: f64| {
                (
                    matrix[0] * col + matrix[1] * row + matrix[3],
                    matrix[4] * col + matrix[5] * row + matrix[7],
                )
            };
            let mut bounds = Bounds::new();
            for (col, row) in [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)] {
                let (x, y) = apply(col, row);
                bounds.add(x, y);
            }
            if let Some(extent) = bounds.finish() {
                return Ok(extent);
            }
        }
    }

    Err(GeoIoError::InvalidGeoTiff(
        "no ModelTiepoint/ModelPixelScale or ModelTransformation tags".to_string(),
    ))
}

/// Projection name from the GeoKey directory, if present and usable.
fn read_projection<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<String> {
    let directory = decoder.get_tag_u16_vec(tag(GEO_KEY_DIRECTORY)).ok()?;
    let ascii_params = decoder.get_tag_ascii_string(tag(GEO_ASCII_PARAMS)).ok();
    geokeys::decode(&directory, ascii_params.as_deref())
}

/// Decode the first image as `f64` samples.
fn read_samples<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Vec<f64>> {
    let result = decoder.read_image()?;

    match result {
        DecodingResult::F64(data) => Ok(data),
        DecodingResult::F32(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::I16(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::I32(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::U16(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::U32(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::U8(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::I8(data) => Ok(data.into_iter().map(f64::from).collect()),
        DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
        DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f64).collect()),
    }
}
