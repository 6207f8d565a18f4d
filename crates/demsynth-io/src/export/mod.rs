//! Export adapters: write a generated terrain to disk.
//!
//! Exporting never mutates the terrain; a failed write leaves it as it was.

mod asc;
mod geotiff;

pub use asc::AscWriter;
pub use geotiff::GeoTiffWriter;

use crate::{GeoIoError, Result};
use demsynth_terrain::Terrain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Marker written for cells without a finite elevation.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// A file format a terrain can be written to.
pub trait TerrainWriter {
    /// Write `terrain` to `path`, replacing any existing file.
    fn write(&self, terrain: &Terrain, path: &Path) -> Result<()>;
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// ESRI ASCII grid.
    Asc,
    /// Single-band `f64` GeoTIFF.
    #[serde(alias = "tif", alias = "tiff")]
    GeoTiff,
}

impl ExportFormat {
    /// Guess the format from a file extension (`.asc`, `.tif`, `.tiff`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .ok_or_else(|| GeoIoError::UnsupportedFormat(path.display().to_string()))
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Asc => "asc",
            ExportFormat::GeoTiff => "tif",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Asc => write!(f, "asc"),
            ExportFormat::GeoTiff => write!(f, "geotiff"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GeoIoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(ExportFormat::Asc),
            "geotiff" | "tif" | "tiff" => Ok(ExportFormat::GeoTiff),
            _ => Err(GeoIoError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Write `terrain` to `path` in `format` with default writer settings.
pub fn export<P: AsRef<Path>>(terrain: &Terrain, path: P, format: ExportFormat) -> Result<()> {
    let path = path.as_ref();
    match format {
        ExportFormat::Asc => AscWriter::default().write(terrain, path),
        ExportFormat::GeoTiff => GeoTiffWriter::default().write(terrain, path),
    }
}
