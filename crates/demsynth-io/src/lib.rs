//! # demsynth-io
//!
//! Import and export adapters around [`demsynth_terrain::Terrain`].
//!
//! ## Overview
//!
//! ### Import
//!
//! [`read_metadata`] reads only the extent and projection of a file:
//! - raster: ESRI ASCII grids (`.asc`, with an optional `.prj` sidecar) and
//!   GeoTIFFs (ModelTiepoint/ModelPixelScale or ModelTransformation, plus
//!   the GeoKey directory)
//! - vector: GPX (`.gpx`) and GeoJSON (anything else)
//!
//! [`terrain_from_file`] turns that metadata into a 1000-column terrain.
//!
//! ### Export
//!
//! [`AscWriter`] and [`GeoTiffWriter`] implement [`TerrainWriter`];
//! [`export`] picks one from an [`ExportFormat`].
//!
//! ## Examples
//!
//! ```no_run
//! use demsynth_io::{export, terrain_from_file, ExportFormat, FileKind};
//!
//! let mut terrain = terrain_from_file("valley.geojson", FileKind::Vector)?;
//! terrain.set_altitude_factor(800.0);
//! terrain.generate()?;
//! export(&terrain, "valley.tif", ExportFormat::GeoTiff)?;
//! # Ok::<(), demsynth_io::GeoIoError>(())
//! ```

mod error;
mod export;
mod geokeys;
mod import;

pub use error::GeoIoError;
pub use export::{export, AscWriter, ExportFormat, GeoTiffWriter, TerrainWriter, DEFAULT_NODATA};
pub use geokeys::epsg_code;
pub use import::{
    read_asc_grid, read_geotiff_grid, read_metadata, terrain_from_file, AscHeader, FileKind,
    SourceFormat, SourceMetadata, WGS84,
};

/// Result type for import and export operations.
pub type Result<T> = std::result::Result<T, GeoIoError>;
