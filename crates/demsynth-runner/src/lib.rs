//! # demsynth-runner
//!
//! The `demsynth` command: generate a synthetic DEM from flags or a YAML
//! job file and export it.
//!
//! ```yaml
//! method: diamondsquare
//! extent: { x_min: 500000, y_min: 4000000, x_max: 505120, y_max: 4005120 }
//! cell_size: 10
//! projection: EPSG:32631
//! altitude: 2400
//! seed: 7
//! outputs:
//!   - path: dem.tif
//!   - path: dem.asc
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod job;

pub use cli::{Cli, Command, GenerateArgs};
pub use config::{JobConfig, OutputSpec, SourceSpec};
pub use error::RunnerError;
pub use job::{run_job, JobReport};

use demsynth_terrain::StrategyRegistry;
use std::io::Write;

/// Run a parsed command line.
pub fn run(cli: &Cli) -> Result<(), RunnerError> {
    match &cli.command {
        Command::Generate(args) => {
            let job = JobConfig::from_args(args)?;
            run_job(&job)?;
        }
        Command::Methods => {
            let mut out = std::io::stdout().lock();
            for name in StrategyRegistry::global().names() {
                writeln!(out, "{}", name)?;
            }
        }
    }
    Ok(())
}
