//! # demsynth-terrain
//!
//! Synthetic Digital Elevation Model (DEM) generation.
//!
//! A [`Terrain`] owns a rectangular elevation [`Grid`] described by an
//! [`Extent`], a cell size and a projection name. Its values come from a
//! pluggable [`GenerationStrategy`] resolved by name through the
//! [`StrategyRegistry`], then scaled by the terrain's altitude factor.
//!
//! ## Overview
//!
//! ### Built-in strategies
//!
//! - `flat` / `uniform` - constant level
//! - `random` - independent uniform noise per cell
//! - `randomnoise` - smoothed value noise
//! - `perlinnoise` - multi-octave Perlin noise (the default)
//! - `diamondsquare` - midpoint displacement fractal
//!
//! Names are case-insensitive. Built-ins produce values in [0, 1], so the
//! altitude factor is the highest altitude of the generated surface.
//!
//! ### Grid geometry
//!
//! `rows = floor((y_max - y_min) / cell_size)` and
//! `cols = floor((x_max - x_min) / cell_size)`. Row 0 is the northern edge.
//!
//! ## Examples
//!
//! ```
//! use demsynth_terrain::Terrain;
//!
//! let mut terrain = Terrain::from_method_with_size("DiamondSquare", 65, 65)?;
//! terrain.set_altitude_factor(2500.0);
//! terrain.generate()?;
//!
//! // Unknown names keep the previous strategy
//! assert!(!terrain.set_generation_method("nonsense"));
//! assert_eq!(terrain.method_name(), "diamondsquare");
//! # Ok::<(), demsynth_terrain::TerrainError>(())
//! ```

mod error;
mod extent;
mod grid;
mod registry;
pub mod strategy;
mod terrain;

pub use error::TerrainError;
pub use extent::Extent;
pub use grid::Grid;
pub use registry::StrategyRegistry;
pub use strategy::GenerationStrategy;
pub use terrain::{
    GeoMetadata, Terrain, TerrainBuilder, DEFAULT_METHOD, DEFAULT_PROJECTION, DEFAULT_SIZE,
    DEFAULT_TARGET_COLUMNS,
};

/// Result type for terrain operations.
pub type Result<T> = std::result::Result<T, TerrainError>;
