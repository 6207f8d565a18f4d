//! Execute a generation job.

use crate::config::JobConfig;
use crate::RunnerError;
use demsynth_io::{export, read_metadata, ExportFormat};
use demsynth_terrain::strategy::{DiamondSquareStrategy, PerlinNoiseStrategy};
use demsynth_terrain::{Extent, StrategyRegistry, Terrain, DEFAULT_METHOD, DEFAULT_TARGET_COLUMNS};
use std::path::PathBuf;
use tracing::info;

/// What a job produced.
#[derive(Debug)]
pub struct JobReport {
    pub terrain: Terrain,
    /// Files written, in job order.
    pub written: Vec<(PathBuf, ExportFormat)>,
}

/// Registry for a job: the built-ins, seeded if the job has a seed, with
/// any per-strategy parameter sections swapped in.
pub fn job_registry(job: &JobConfig) -> StrategyRegistry {
    let mut registry = match job.seed {
        Some(seed) => StrategyRegistry::with_seed(seed),
        None => StrategyRegistry::with_builtins(),
    };

    if let Some(mut perlin) = job.perlin {
        if let Some(seed) = job.seed {
            perlin.seed = PerlinNoiseStrategy::fold_seed(seed);
        }
        registry.register(PerlinNoiseStrategy::NAME, perlin);
    }
    if let Some(mut diamond) = job.diamond_square {
        if diamond.seed.is_none() {
            diamond.seed = job.seed;
        }
        registry.register(DiamondSquareStrategy::NAME, diamond);
    }
    registry
}

/// Allocate the terrain described by `job` without generating it.
pub fn build_terrain(job: &JobConfig, registry: StrategyRegistry) -> Result<Terrain, RunnerError> {
    let source = match &job.source {
        Some(spec) => Some(read_metadata(&spec.path, spec.kind)?),
        None => None,
    };

    let mut builder = Terrain::builder()
        .registry(registry)
        .method(job.method.as_deref().unwrap_or(DEFAULT_METHOD))
        .altitude_factor(job.altitude.unwrap_or(1.0));

    if let Some(extent) = job.extent {
        builder = builder.extent(extent).cell_size(job.cell_size.unwrap_or(1.0));
    } else if let Some(metadata) = &source {
        let cell_size = job
            .cell_size
            .unwrap_or(metadata.extent.width() / DEFAULT_TARGET_COLUMNS);
        builder = builder.extent(metadata.extent).cell_size(cell_size);
    } else if let (Some(rows), Some(cols)) = (job.rows, job.cols) {
        let cell_size = job.cell_size.unwrap_or(1.0);
        builder = builder
            .extent(Extent::new(
                0.0,
                0.0,
                cols as f64 * cell_size,
                rows as f64 * cell_size,
            ))
            .cell_size(cell_size);
    } else if let Some(cell_size) = job.cell_size {
        builder = builder.cell_size(cell_size);
    }

    let projection = job
        .projection
        .clone()
        .or_else(|| source.map(|metadata| metadata.projection_name));
    if let Some(projection) = projection {
        builder = builder.projection(projection);
    }

    Ok(builder.build()?)
}

/// Generate the terrain of `job` and write every output.
pub fn run_job(job: &JobConfig) -> Result<JobReport, RunnerError> {
    job.validate()?;
    let mut terrain = build_terrain(job, job_registry(job))?;
    terrain.generate()?;

    let (min, max) = terrain.grid().min_max().unwrap_or((0.0, 0.0));
    info!(
        method = terrain.method_name(),
        rows = terrain.rows(),
        cols = terrain.cols(),
        projection = terrain.projection_name(),
        "generated terrain, altitude range {:.2}..{:.2}",
        min,
        max
    );

    let mut written = Vec::with_capacity(job.outputs.len());
    for output in &job.outputs {
        let format = output.format()?;
        export(&terrain, &output.path, format)?;
        info!("wrote {} ({})", output.path.display(), format);
        written.push((output.path.clone(), format));
    }

    Ok(JobReport { terrain, written })
}
