//! Geographic extent of a terrain.

use crate::{Result, TerrainError};
use serde::{Deserialize, Serialize};

/// Cells lost to floating point error when dividing an extent by its own
/// fraction (e.g. `width / 1000`) are recovered within this tolerance.
const CELL_COUNT_EPSILON: f64 = 1e-9;

/// Rectangular bounding box in projection units.
///
/// `(x_min, y_min)` is the south-west corner and `(x_max, y_max)` the
/// north-east corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Minimum X coordinate (west edge).
    pub x_min: f64,
    /// Minimum Y coordinate (south edge).
    pub y_min: f64,
    /// Maximum X coordinate (east edge).
    pub x_max: f64,
    /// Maximum Y coordinate (north edge).
    pub y_max: f64,
}

impl Extent {
    /// Create an extent from its two opposite corners.
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Extent of `cols x rows` unit cells anchored at the origin.
    pub fn from_size(rows: usize, cols: usize) -> Self {
        Self::new(0.0, 0.0, cols as f64, rows as f64)
    }

    /// Width along the X axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height along the Y axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Check that all corners are finite and that max is strictly greater than min.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x_min, self.y_min, self.x_max, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(TerrainError::InvalidExtent {
                x_min: self.x_min,
                y_min: self.y_min,
                x_max: self.x_max,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Check if a coordinate is within the extent.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Grid dimensions `(rows, cols)` for the given cell size.
    ///
    /// `rows = floor(height / cell_size)`, `cols = floor(width / cell_size)`.
    pub fn grid_dimensions(&self, cell_size: f64) -> Result<(usize, usize)> {
        self.validate()?;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TerrainError::InvalidCellSize(cell_size));
        }

        let rows = cell_count(self.height(), cell_size);
        let cols = cell_count(self.width(), cell_size);
        if rows == 0 || cols == 0 {
            return Err(TerrainError::EmptyGrid { rows, cols });
        }
        Ok((rows, cols))
    }
}

fn cell_count(length: f64, cell_size: f64) -> usize {
    (length / cell_size + CELL_COUNT_EPSILON).floor() as usize
}
