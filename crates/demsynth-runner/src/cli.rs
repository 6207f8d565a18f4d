//! Command-line interface.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Synthetic digital elevation model generator.
#[derive(Debug, Parser)]
#[command(name = "demsynth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a terrain and write it to one or more files.
    Generate(GenerateArgs),
    /// List the registered generation methods.
    Methods,
}

/// Flags of `demsynth generate`. Every flag overrides the job file.
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    /// YAML job file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generation method, e.g. perlinnoise or diamondsquare.
    #[arg(short, long)]
    pub method: Option<String>,

    /// Bounding box in projection units.
    #[arg(
        long,
        num_args = 4,
        value_names = ["XMIN", "YMIN", "XMAX", "YMAX"],
        allow_negative_numbers = true
    )]
    pub extent: Option<Vec<f64>>,

    /// Cell size in projection units.
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Row count of a unit-cell grid.
    #[arg(long, requires = "cols")]
    pub rows: Option<usize>,

    /// Column count of a unit-cell grid.
    #[arg(long, requires = "rows")]
    pub cols: Option<usize>,

    /// Projection name, e.g. EPSG:32631.
    #[arg(long)]
    pub projection: Option<String>,

    /// Highest altitude of the generated surface.
    #[arg(short, long)]
    pub altitude: Option<f64>,

    /// Seed for reproducible generation.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Take the extent and projection from a geographic file.
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Kind of the --from file.
    #[arg(long, value_parser = ["raster", "vector"], requires = "from")]
    pub kind: Option<String>,

    /// Output file; repeat for several outputs.
    #[arg(short, long = "output")]
    pub outputs: Vec<PathBuf>,

    /// Output format for every output that does not set one; otherwise taken
    /// from the file extension.
    #[arg(short, long, value_parser = ["asc", "geotiff"])]
    pub format: Option<String>,
}
