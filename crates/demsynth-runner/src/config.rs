//! YAML job description and command-line overrides.

use crate::cli::GenerateArgs;
use crate::RunnerError;
use demsynth_io::{ExportFormat, FileKind};
use demsynth_terrain::strategy::{DiamondSquareStrategy, PerlinNoiseStrategy};
use demsynth_terrain::Extent;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One generation job.
///
/// Grid geometry comes from, in order of precedence: an explicit `extent`
/// (with `cell_size`, default 1), a `source` file, `rows`/`cols` of unit
/// cells, or a 256x256 unit grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Generation method name.
    pub method: Option<String>,
    pub extent: Option<Extent>,
    pub cell_size: Option<f64>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    /// Projection name; overrides the one of `source`.
    pub projection: Option<String>,
    /// Altitude factor.
    pub altitude: Option<f64>,
    pub seed: Option<u64>,
    /// File giving the extent and projection.
    pub source: Option<SourceSpec>,
    /// Replaces the built-in `perlinnoise` parameters.
    pub perlin: Option<PerlinNoiseStrategy>,
    /// Replaces the built-in `diamondsquare` parameters.
    pub diamond_square: Option<DiamondSquareStrategy>,
    pub outputs: Vec<OutputSpec>,
}

/// Geographic file a job takes its geometry from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    #[serde(default = "default_kind")]
    pub kind: FileKind,
}

fn default_kind() -> FileKind {
    FileKind::Raster
}

/// A file to write the generated terrain to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub path: PathBuf,
    /// Guessed from the extension when absent.
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

impl OutputSpec {
    pub fn format(&self) -> Result<ExportFormat, RunnerError> {
        match self.format {
            Some(format) => Ok(format),
            None => Ok(ExportFormat::from_path(&self.path)?),
        }
    }
}

impl JobConfig {
    /// Load a job file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RunnerError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, RunnerError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Job from the `generate` flags, on top of `--config` if given.
    pub fn from_args(args: &GenerateArgs) -> Result<Self, RunnerError> {
        let mut job = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        job.apply_args(args)?;
        job.validate()?;
        Ok(job)
    }

    /// Override fields with the flags that were given.
    pub fn apply_args(&mut self, args: &GenerateArgs) -> Result<(), RunnerError> {
        if let Some(method) = &args.method {
            self.method = Some(method.clone());
        }
        if let Some(values) = &args.extent {
            let &[x_min, y_min, x_max, y_max] = values.as_slice() else {
                return Err(RunnerError::Config(format!(
                    "--extent takes 4 values, got {}",
                    values.len()
                )));
            };
            self.extent = Some(Extent::new(x_min, y_min, x_max, y_max));
        }
        if args.cell_size.is_some() {
            self.cell_size = args.cell_size;
        }
        if args.rows.is_some() {
            self.rows = args.rows;
            self.cols = args.cols;
        }
        if let Some(projection) = &args.projection {
            self.projection = Some(projection.clone());
        }
        if args.altitude.is_some() {
            self.altitude = args.altitude;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(path) = &args.from {
            let kind = match &args.kind {
                Some(kind) => kind.parse()?,
                None => default_kind(),
            };
            self.source = Some(SourceSpec {
                path: path.clone(),
                kind,
            });
        }

        let format = args
            .format
            .as_deref()
            .map(str::parse::<ExportFormat>)
            .transpose()?;
        if !args.outputs.is_empty() {
            self.outputs = args
                .outputs
                .iter()
                .map(|path| OutputSpec {
                    path: path.clone(),
                    format,
                })
                .collect();
        } else if let Some(format) = format {
            // Job file outputs keep an explicit format
            for output in self.outputs.iter_mut().filter(|o| o.format.is_none()) {
                output.format = Some(format);
            }
        }
        Ok(())
    }

    /// Check combinations serde cannot.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.rows.is_some() != self.cols.is_some() {
            return Err(RunnerError::Config(
                "rows and cols must be given together".to_string(),
            ));
        }
        for output in &self.outputs {
            output.format()?;
        }
        Ok(())
    }
}
