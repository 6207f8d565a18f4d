//! Errors reported by the runner.

use demsynth_io::GeoIoError;
use demsynth_terrain::TerrainError;
use thiserror::Error;

/// Errors that can occur while running a generation job.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    GeoIo(#[from] GeoIoError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
