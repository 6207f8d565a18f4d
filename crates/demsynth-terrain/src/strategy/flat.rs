use super::GenerationStrategy;
use crate::{Grid, Result};
use serde::{Deserialize, Serialize};

/// Fills every cell with the same level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatStrategy {
    /// Normalized level written to every cell.
    pub level: f64,
}

impl FlatStrategy {
    pub const NAME: &'static str = "flat";

    pub fn new(level: f64) -> Self {
        Self { level }
    }
}

impl Default for FlatStrategy {
    fn default() -> Self {
        Self { level: 0.5 }
    }
}

impl GenerationStrategy for FlatStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn generate(&self, grid: &mut Grid) -> Result<()> {
        grid.fill(self.level);
        Ok(())
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}
