use super::{invocation_rng, GenerationStrategy};
use crate::{Grid, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smoothed random noise.
///
/// Random values are placed on a coarse lattice every `spacing` cells and
/// interpolated in between with a smoothstep-weighted bilinear blend. Output
/// stays within [0, 1] because every blend is a convex combination of lattice
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueNoiseStrategy {
    /// Distance in cells between lattice points.
    pub spacing: usize,
    /// Fixed seed; `None` draws a fresh lattice on every call.
    pub seed: Option<u64>,
}

impl ValueNoiseStrategy {
    pub const NAME: &'static str = "randomnoise";
}

impl Default for ValueNoiseStrategy {
    fn default() -> Self {
        Self {
            spacing: 16,
            seed: None,
        }
    }
}

/// Coarse grid of random values, one row longer and one column wider than
/// needed so every cell has four lattice neighbours.
struct Lattice {
    values: Vec<f64>,
    cols: usize,
}

impl Lattice {
    fn random<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Self {
        let values = (0..rows * cols).map(|_| rng.gen::<f64>()).collect();
        Self { values, cols }
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl GenerationStrategy for ValueNoiseStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, grid: &mut Grid) -> Result<()> {
        let spacing = self.spacing.max(1);
        let (rows, cols) = grid.dimensions();
        let lattice_rows = rows.saturating_sub(1) / spacing + 2;
        let lattice_cols = cols.saturating_sub(1) / spacing + 2;

        let mut rng = invocation_rng(self.seed);
        let lattice = Lattice::random(&mut rng, lattice_rows, lattice_cols);

        let step = spacing as f64;
        for row in 0..rows {
            let ly = row / spacing;
            let ty = smoothstep((row % spacing) as f64 / step);
            for col in 0..cols {
                let lx = col / spacing;
                let tx = smoothstep((col % spacing) as f64 / step);

                let top = lerp(lattice.at(ly, lx), lattice.at(ly, lx + 1), tx);
                let bottom = lerp(lattice.at(ly + 1, lx), lattice.at(ly + 1, lx + 1), tx);
                grid.set(row, col, lerp(top, bottom, ty));
            }
        }
        Ok(())
    }

    fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}
