use super::{invocation_rng, GenerationStrategy};
use crate::{Grid, Result, TerrainError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How diamond-square handles grids that are not a `2^n + 1` square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Generate on the smallest covering `2^n + 1` square and keep its
    /// top-left window.
    #[default]
    Pad,
    /// Fail with [`TerrainError::IncompatibleGridSize`].
    Reject,
}

/// Diamond-square midpoint displacement fractal.
///
/// Displacement amplitude starts at 1.0 and is multiplied by `roughness` at
/// every subdivision level. The finished square is normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiamondSquareStrategy {
    /// Amplitude decay per level, in (0, 1). Higher is rougher.
    pub roughness: f64,
    /// Handling of non-conforming grid sizes.
    pub size_policy: SizePolicy,
    /// Fixed seed; `None` draws a new fractal on every call.
    pub seed: Option<u64>,
}

impl DiamondSquareStrategy {
    pub const NAME: &'static str = "diamondsquare";

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Whether a grid of this shape can be generated without padding.
    pub fn is_conforming(rows: usize, cols: usize) -> bool {
        rows == cols && rows >= 2 && (rows - 1).is_power_of_two()
    }

    /// Smallest `2^n + 1` side that covers `len` cells.
    fn covering_side(len: usize) -> usize {
        let mut side = 2;
        while side < len {
            side = (side - 1) * 2 + 1;
        }
        side
    }

    fn fractal<R: Rng>(&self, rng: &mut R, side: usize) -> Grid {
        let mut square = Grid::new(side, side);
        let last = side - 1;
        for (row, col) in [(0, 0), (0, last), (last, 0), (last, last)] {
            square.set(row, col, rng.gen::<f64>());
        }

        let mut step = last;
        let mut amplitude = 1.0;
        while step > 1 {
            let half = step / 2;

            // Diamond step: centre of each square
            for row in (half..side).step_by(step) {
                for col in (half..side).step_by(step) {
                    let avg = (cell(&square, row - half, col - half)
                        + cell(&square, row - half, col + half)
                        + cell(&square, row + half, col - half)
                        + cell(&square, row + half, col + half))
                        / 4.0;
                    square.set(row, col, avg + (rng.gen::<f64>() - 0.5) * amplitude);
                }
            }

            // Square step: edge midpoints, averaging whichever neighbours exist
            for row in (0..side).step_by(half) {
                let start = if (row / half) % 2 == 0 { half } else { 0 };
                for col in (start..side).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0;
                    if row >= half {
                        sum += cell(&square, row - half, col);
                        count += 1;
                    }
                    if row + half < side {
                        sum += cell(&square, row + half, col);
                        count += 1;
                    }
                    if col >= half {
                        sum += cell(&square, row, col - half);
                        count += 1;
                    }
                    if col + half < side {
                        sum += cell(&square, row, col + half);
                        count += 1;
                    }
                    let avg = sum / count as f64;
                    square.set(row, col, avg + (rng.gen::<f64>() - 0.5) * amplitude);
                }
            }

            step = half;
            amplitude *= self.roughness;
        }

        square.normalize();
        square
    }
}

fn cell(grid: &Grid, row: usize, col: usize) -> f64 {
    grid.get(row, col).unwrap_or(0.0)
}

impl Default for DiamondSquareStrategy {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            size_policy: SizePolicy::Pad,
            seed: None,
        }
    }
}

impl GenerationStrategy for DiamondSquareStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, grid: &mut Grid) -> Result<()> {
        let (rows, cols) = grid.dimensions();
        if grid.is_empty() {
            return Ok(());
        }
        if self.size_policy == SizePolicy::Reject && !Self::is_conforming(rows, cols) {
            return Err(TerrainError::IncompatibleGridSize { rows, cols });
        }

        let side = Self::covering_side(rows.max(cols));
        let mut rng = invocation_rng(self.seed);
        let square = self.fractal(&mut rng, side);

        for row in 0..rows {
            grid.as_mut_slice()[row * cols..(row + 1) * cols]
                .copy_from_slice(&square.row(row)[..cols]);
        }
        Ok(())
    }

    fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::assert_normalized;

    #[test]
    fn test_covering_side() {
        assert_eq!(DiamondSquareStrategy::covering_side(1), 2);
        assert_eq!(DiamondSquareStrategy::covering_side(2), 2);
        assert_eq!(DiamondSquareStrategy::covering_side(3), 3);
        assert_eq!(DiamondSquareStrategy::covering_side(4), 5);
        assert_eq!(DiamondSquareStrategy::covering_side(17), 17);
        assert_eq!(DiamondSquareStrategy::covering_side(256), 257);
    }

    #[test]
    fn test_is_conforming() {
        assert!(DiamondSquareStrategy::is_conforming(17, 17));
        assert!(DiamondSquareStrategy::is_conforming(257, 257));
        assert!(!DiamondSquareStrategy::is_conforming(16, 16));
        assert!(!DiamondSquareStrategy::is_conforming(17, 9));
        assert!(!DiamondSquareStrategy::is_conforming(1, 1));
    }

    #[test]
    fn test_conforming_square_spans_full_range() {
        let mut grid = Grid::new(17, 17);
        DiamondSquareStrategy::seeded(12345).generate(&mut grid).unwrap();
        assert_normalized(&grid);
        let (min, max) = grid.min_max().unwrap();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_pad_policy_fills_rectangular_grid() {
        let mut grid = Grid::new(10, 23);
        DiamondSquareStrategy::seeded(5).generate(&mut grid).unwrap();
        assert_eq!(grid.dimensions(), (10, 23));
        assert_normalized(&grid);
    }

    #[test]
    fn test_reject_policy() {
        let strategy = DiamondSquareStrategy {
            size_policy: SizePolicy::Reject,
            ..DiamondSquareStrategy::seeded(1)
        };

        let mut grid = Grid::new(16, 16);
        assert!(matches!(
            strategy.generate(&mut grid),
            Err(TerrainError::IncompatibleGridSize { rows: 16, cols: 16 })
        ));
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));

        let mut grid = Grid::new(33, 33);
        strategy.generate(&mut grid).unwrap();
        assert_normalized(&grid);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let strategy = DiamondSquareStrategy::seeded(99);
        let mut a = Grid::new(33, 33);
        let mut b = Grid::new(33, 33);
        strategy.generate(&mut a).unwrap();
        strategy.generate(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
