//! Generation strategies.
//!
//! A [`GenerationStrategy`] fills an already allocated [`Grid`] with
//! elevation values. Built-in strategies normalize their output to [0, 1] so
//! that the terrain's altitude factor maps directly to the highest altitude.
//!
//! | Strategy | Registry keys | Deterministic |
//! |----------|---------------|---------------|
//! | [`FlatStrategy`] | `flat`, `uniform` | yes |
//! | [`RandomStrategy`] | `random` | only when seeded |
//! | [`ValueNoiseStrategy`] | `randomnoise` | only when seeded |
//! | [`PerlinNoiseStrategy`] | `perlinnoise` | yes |
//! | [`DiamondSquareStrategy`] | `diamondsquare` | only when seeded |

mod diamond_square;
mod flat;
mod perlin;
mod random;
mod value_noise;

pub use diamond_square::{DiamondSquareStrategy, SizePolicy};
pub use flat::FlatStrategy;
pub use perlin::PerlinNoiseStrategy;
pub use random::RandomStrategy;
pub use value_noise::ValueNoiseStrategy;

use crate::{Grid, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// An algorithm that populates an elevation grid in place.
///
/// Implementations hold configuration only, never per-grid state, so a single
/// instance can be shared between terrains (and threads) behind an `Arc`.
pub trait GenerationStrategy: std::fmt::Debug + Send + Sync {
    /// Canonical registry name of the algorithm.
    fn name(&self) -> &str;

    /// Fill `grid` with elevation values.
    ///
    /// The grid keeps its dimensions. On success every cell holds a finite
    /// value.
    fn generate(&self, grid: &mut Grid) -> Result<()>;

    /// Whether two calls on grids of the same shape give identical output.
    fn is_deterministic(&self) -> bool;
}

/// Random generator for one strategy invocation: seeded when a seed is
/// configured, fresh entropy otherwise.
pub(crate) fn invocation_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::Grid;

    pub fn assert_normalized(grid: &Grid) {
        for &value in grid.as_slice() {
            assert!(value.is_finite(), "non-finite value {}", value);
            assert!(
                (0.0..=1.0).contains(&value),
                "value {} outside [0, 1]",
                value
            );
        }
    }
}
