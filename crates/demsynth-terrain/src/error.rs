//! Error types for terrain generation.

use thiserror::Error;

/// Errors that can occur while building or generating a terrain.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// No strategy is registered under the requested name.
    #[error("Unknown generation method: {0:?}")]
    UnknownStrategy(String),

    /// Extent corners are not finite or not ordered.
    #[error("Invalid extent ({x_min}, {y_min}) - ({x_max}, {y_max}): max must be greater than min")]
    InvalidExtent {
        /// Minimum X coordinate.
        x_min: f64,
        /// Minimum Y coordinate.
        y_min: f64,
        /// Maximum X coordinate.
        x_max: f64,
        /// Maximum Y coordinate.
        y_max: f64,
    },

    /// Cell size is zero, negative or not finite.
    #[error("Invalid cell size {0} (must be a finite value > 0)")]
    InvalidCellSize(f64),

    /// The extent is smaller than one cell along at least one axis.
    #[error("Extent yields an empty grid ({rows} rows x {cols} columns)")]
    EmptyGrid {
        /// Computed row count.
        rows: usize,
        /// Computed column count.
        cols: usize,
    },

    /// A strategy configured to reject non-conforming sizes was given one.
    #[error("Grid of {rows}x{cols} is not a square of side 2^n + 1")]
    IncompatibleGridSize {
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },
}
