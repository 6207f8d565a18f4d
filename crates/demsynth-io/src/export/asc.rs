//! ESRI ASCII grid writer.

use super::{TerrainWriter, DEFAULT_NODATA};
use crate::Result;
use demsynth_terrain::Terrain;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes terrains as ESRI ASCII grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscWriter {
    /// Value written for non-finite cells and declared as `NODATA_value`.
    pub nodata_value: f64,
}

impl Default for AscWriter {
    fn default() -> Self {
        Self {
            nodata_value: DEFAULT_NODATA,
        }
    }
}

impl AscWriter {
    pub fn new(nodata_value: f64) -> Self {
        Self { nodata_value }
    }

    /// Write the grid to any writer, header first, north row first.
    pub fn write_to<W: Write>(&self, terrain: &Terrain, mut out: W) -> Result<()> {
        writeln!(out, "cellsize {}", terrain.cell_size())?;
        writeln!(out, "xllcorner {}", terrain.x_min())?;
        writeln!(out, "yllcorner {}", terrain.y_min())?;
        writeln!(out, "nrows {}", terrain.rows())?;
        writeln!(out, "ncols {}", terrain.cols())?;
        writeln!(out, "NODATA_value {}", self.nodata_value)?;

        for row in terrain.grid().rows_iter() {
            let mut first = true;
            for &value in row {
                if !first {
                    out.write_all(b" ")?;
                }
                first = false;
                let value = if value.is_finite() {
                    value
                } else {
                    self.nodata_value
                };
                write!(out, "{}", value)?;
            }
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl TerrainWriter for AscWriter {
    fn write(&self, terrain: &Terrain, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(terrain, BufWriter::new(file))?;
        debug!(
            path = %path.display(),
            rows = terrain.rows(),
            cols = terrain.cols(),
            "wrote ASCII grid"
        );
        Ok(())
    }
}
