//! Import adapters: extent and projection metadata from geographic files.
//!
//! | Kind | Extension | Reader |
//! |------|-----------|--------|
//! | raster | `.asc` | ESRI ASCII grid header (+ `.prj` sidecar) |
//! | raster | anything else | GeoTIFF |
//! | vector | `.gpx` | GPX waypoints, routes and tracks |
//! | vector | anything else | GeoJSON |

mod asc;
mod geojson;
mod geotiff;
mod gpx;

pub use asc::{read_asc_grid, AscHeader};
pub use geotiff::read_geotiff_grid;

use crate::{GeoIoError, Result};
use demsynth_terrain::{Extent, GeoMetadata, Terrain, DEFAULT_PROJECTION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Projection of GeoJSON and GPX data unless stated otherwise: WGS 84.
pub const WGS84: &str = "EPSG:4326";

/// Broad kind of geographic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Gridded data (GeoTIFF, ESRI ASCII grid).
    Raster,
    /// Feature data (GeoJSON, GPX).
    Vector,
}

impl FileKind {
    /// Legacy integer code of raster sources.
    pub const RASTER_CODE: i32 = 1;
    /// Legacy integer code of vector sources.
    pub const VECTOR_CODE: i32 = 0;
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Raster => write!(f, "raster"),
            FileKind::Vector => write!(f, "vector"),
        }
    }
}

impl FromStr for FileKind {
    type Err = GeoIoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raster" => Ok(FileKind::Raster),
            "vector" => Ok(FileKind::Vector),
            _ => Err(GeoIoError::UnsupportedFileKind(s.to_string())),
        }
    }
}

impl TryFrom<i32> for FileKind {
    type Error = GeoIoError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            FileKind::RASTER_CODE => Ok(FileKind::Raster),
            FileKind::VECTOR_CODE => Ok(FileKind::Vector),
            _ => Err(GeoIoError::UnsupportedFileKind(code.to_string())),
        }
    }
}

/// Concrete format a source was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    GeoTiff,
    Asc,
    GeoJson,
    Gpx,
}

/// Extent and projection of an imported file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMetadata {
    /// Bounding box in projection units.
    pub extent: Extent,
    /// Projection identifier.
    pub projection_name: String,
    /// Format the file was read as.
    pub format: SourceFormat,
}

impl GeoMetadata for SourceMetadata {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn projection_name(&self) -> &str {
        &self.projection_name
    }
}

/// Read the extent and projection of a geographic file.
pub fn read_metadata<P: AsRef<Path>>(path: P, kind: FileKind) -> Result<SourceMetadata> {
    let path = path.as_ref();
    let metadata = match (kind, extension(path).as_deref()) {
        (FileKind::Raster, Some("asc")) => asc::read_metadata(path)?,
        (FileKind::Raster, _) => geotiff::read_metadata(path)?,
        (FileKind::Vector, Some("gpx")) => gpx::read_metadata(path)?,
        (FileKind::Vector, _) => geojson::read_metadata(path)?,
    };

    debug!(
        path = %path.display(),
        format = ?metadata.format,
        projection = %metadata.projection_name,
        "read source metadata {:?}",
        metadata.extent
    );
    Ok(metadata)
}

/// Build a terrain covering a geographic file.
///
/// The terrain is 1000 columns wide, uses the file's projection and the
/// default `perlinnoise` strategy.
pub fn terrain_from_file<P: AsRef<Path>>(path: P, kind: FileKind) -> Result<Terrain> {
    let metadata = read_metadata(path, kind)?;
    Ok(Terrain::from_metadata(&metadata)?)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Running bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
    count: usize,
}

impl Bounds {
    pub(crate) fn new() -> Self {
        Self {
            x_min: f64::INFINITY,
            y_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    pub(crate) fn add(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(x);
        self.y_min = self.y_min.min(y);
        self.x_max = self.x_max.max(x);
        self.y_max = self.y_max.max(y);
        self.count += 1;
    }

    pub(crate) fn finish(self) -> Option<Extent> {
        (self.count > 0).then(|| Extent::new(self.x_min, self.y_min, self.x_max, self.y_max))
    }
}

/// Projection used when a raster carries none.
pub(crate) fn default_projection() -> String {
    DEFAULT_PROJECTION.to_string()
}
