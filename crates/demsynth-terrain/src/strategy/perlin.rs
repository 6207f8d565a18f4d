use super::GenerationStrategy;
use crate::{Grid, Result};
use noise::{NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Multi-octave Perlin noise (fractal Brownian motion).
///
/// Each octave samples its own Perlin instance so octaves do not align on
/// the lattice. The weighted sum is divided by the total amplitude and mapped
/// from [-1, 1] to [0, 1].
///
/// Rows are computed in parallel; each row is written by exactly one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinNoiseStrategy {
    /// Number of noise octaves.
    pub octaves: u8,
    /// Size in cells of one period of the base octave.
    pub scale: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Noise seed.
    pub seed: u32,
}

impl PerlinNoiseStrategy {
    pub const NAME: &'static str = "perlinnoise";

    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Fold a 64-bit job seed into a Perlin seed.
    pub fn fold_seed(seed: u64) -> u32 {
        (seed ^ (seed >> 32)) as u32
    }

    fn sample(&self, octaves: &[Perlin], x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0 / self.scale.max(f64::EPSILON);
        let mut max_amplitude = 0.0;

        for perlin in octaves {
            total += perlin.get([x * frequency, y * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if max_amplitude > 0.0 {
            ((total / max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

impl Default for PerlinNoiseStrategy {
    fn default() -> Self {
        Self {
            octaves: 6,
            scale: 128.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
        }
    }
}

impl GenerationStrategy for PerlinNoiseStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, grid: &mut Grid) -> Result<()> {
        if grid.is_empty() {
            return Ok(());
        }

        let octaves: Vec<Perlin> = (0..self.octaves.max(1))
            .map(|octave| Perlin::new(self.seed.wrapping_add(octave as u32 * 31337)))
            .collect();

        let cols = grid.cols();
        grid.as_mut_slice()
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, cells)| {
                // Sample cell centres, never the integer lattice where Perlin is zero
                let y = row as f64 + 0.5;
                for (col, cell) in cells.iter_mut().enumerate() {
                    *cell = self.sample(&octaves, col as f64 + 0.5, y);
                }
            });
        Ok(())
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::assert_normalized;

    #[test]
    fn test_perlin_range_and_variation() {
        let mut grid = Grid::new(64, 96);
        PerlinNoiseStrategy::default().generate(&mut grid).unwrap();
        assert_normalized(&grid);
        let (min, max) = grid.min_max().unwrap();
        assert!(max - min > 0.05, "perlin output too flat: {} - {}", min, max);
    }

    #[test]
    fn test_perlin_deterministic() {
        let strategy = PerlinNoiseStrategy::default();
        let mut a = Grid::new(20, 30);
        let mut b = Grid::new(20, 30);
        strategy.generate(&mut a).unwrap();
        strategy.generate(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_perlin_seed_changes_output() {
        let mut a = Grid::new(32, 32);
        let mut b = Grid::new(32, 32);
        PerlinNoiseStrategy::with_seed(1).generate(&mut a).unwrap();
        PerlinNoiseStrategy::with_seed(2).generate(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_perlin_deserializes_partial_config() {
        let strategy: PerlinNoiseStrategy = serde_yaml::from_str("octaves: 3\nseed: 9").unwrap();
        assert_eq!(strategy.octaves, 3);
        assert_eq!(strategy.seed, 9);
        assert_eq!(strategy.scale, 128.0);
    }
}
