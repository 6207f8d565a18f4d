use super::{invocation_rng, GenerationStrategy};
use crate::{Grid, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Independent uniform sample in [0, 1) for every cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomStrategy {
    /// Fixed seed; `None` draws fresh values on every call.
    pub seed: Option<u64>,
}

impl RandomStrategy {
    pub const NAME: &'static str = "random";

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl GenerationStrategy for RandomStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, grid: &mut Grid) -> Result<()> {
        let mut rng = invocation_rng(self.seed);
        for value in grid.as_mut_slice() {
            *value = rng.gen::<f64>();
        }
        Ok(())
    }

    fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }
}
