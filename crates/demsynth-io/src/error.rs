//! Error types for the I/O adapters.

use demsynth_terrain::TerrainError;
use thiserror::Error;

/// Errors that can occur while importing or exporting DEM data.
#[derive(Debug, Error)]
pub enum GeoIoError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding or encoding error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Malformed GeoJSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed GPX.
    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    /// Invalid GeoTIFF - missing or unusable georeferencing tags.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Malformed ESRI ASCII grid.
    #[error("Invalid ASCII grid at line {line}: {reason}")]
    InvalidAscii {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The vector source holds no coordinates.
    #[error("No coordinates found in {0}")]
    EmptyGeometry(String),

    /// File kind is neither raster nor vector.
    #[error("Unsupported file kind: {0}")]
    UnsupportedFileKind(String),

    /// Export format could not be determined.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Grid is too large for the target format.
    #[error("Grid of {rows}x{cols} exceeds the limits of the output format")]
    GridTooLarge {
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },

    /// Terrain could not be built from the imported metadata.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
