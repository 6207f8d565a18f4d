//! ESRI ASCII grid reader.

use super::{default_projection, SourceFormat, SourceMetadata};
use crate::geokeys::epsg_code;
use crate::{GeoIoError, Result};
use demsynth_terrain::{Extent, Grid};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Header of an ESRI ASCII grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscHeader {
    /// Number of columns.
    pub ncols: usize,
    /// Number of rows.
    pub nrows: usize,
    /// X of the lower-left corner of the lower-left cell.
    pub x_ll_corner: f64,
    /// Y of the lower-left corner of the lower-left cell.
    pub y_ll_corner: f64,
    /// Cell size.
    pub cell_size: f64,
    /// No-data marker, if declared.
    pub nodata_value: Option<f64>,
}

impl AscHeader {
    /// Extent covered by the grid.
    pub fn extent(&self) -> Extent {
        Extent::new(
            self.x_ll_corner,
            self.y_ll_corner,
            self.x_ll_corner + self.ncols as f64 * self.cell_size,
            self.y_ll_corner + self.nrows as f64 * self.cell_size,
        )
    }
}

#[derive(Default)]
struct HeaderFields {
    ncols: Option<usize>,
    nrows: Option<usize>,
    x: Option<(f64, bool)>,
    y: Option<(f64, bool)>,
    cell_size: Option<f64>,
    nodata_value: Option<f64>,
}

impl HeaderFields {
    fn finish(self, line: usize) -> Result<AscHeader> {
        let missing = |name: &str| GeoIoError::InvalidAscii {
            line,
            reason: format!("missing {} in header", name),
        };
        let cell_size = self.cell_size.ok_or_else(|| missing("cellsize"))?;
        // Centre-registered grids are shifted by half a cell to the corner
        let corner = |(value, centre): (f64, bool)| {
            if centre {
                value - cell_size / 2.0
            } else {
                value
            }
        };
        Ok(AscHeader {
            ncols: self.ncols.ok_or_else(|| missing("ncols"))?,
            nrows: self.nrows.ok_or_else(|| missing("nrows"))?,
            x_ll_corner: corner(self.x.ok_or_else(|| missing("xllcorner"))?),
            y_ll_corner: corner(self.y.ok_or_else(|| missing("yllcorner"))?),
            cell_size,
            nodata_value: self.nodata_value,
        })
    }
}

/// Parse header lines until the first data line.
///
/// Returns the header, the 1-based number of the first data line and that
/// line's content (if any).
fn read_header<R: BufRead>(
    lines: &mut std::io::Lines<R>,
) -> Result<(AscHeader, usize, Option<String>)> {
    let mut fields = HeaderFields::default();
    let mut line_no = 0;

    for line in lines.by_ref() {
        let line = line?;
        line_no += 1;
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        if key.parse::<f64>().is_ok() {
            return Ok((fields.finish(line_no)?, line_no, Some(line)));
        }

        let value = tokens.next().ok_or_else(|| GeoIoError::InvalidAscii {
            line: line_no,
            reason: format!("header key {} has no value", key),
        })?;
        let number = |value: &str| {
            value.parse::<f64>().map_err(|_| GeoIoError::InvalidAscii {
                line: line_no,
                reason: format!("invalid value {:?} for {}", value, key),
            })
        };
        let count = |value: &str| {
            value.parse::<usize>().map_err(|_| GeoIoError::InvalidAscii {
                line: line_no,
                reason: format!("invalid count {:?} for {}", value, key),
            })
        };

        match key.to_ascii_lowercase().as_str() {
            "ncols" => fields.ncols = Some(count(value)?),
            "nrows" => fields.nrows = Some(count(value)?),
            "xllcorner" => fields.x = Some((number(value)?, false)),
            "xllcenter" => fields.x = Some((number(value)?, true)),
            "yllcorner" => fields.y = Some((number(value)?, false)),
            "yllcenter" => fields.y = Some((number(value)?, true)),
            "cellsize" => fields.cell_size = Some(number(value)?),
            "nodata_value" => fields.nodata_value = Some(number(value)?),
            other => {
                return Err(GeoIoError::InvalidAscii {
                    line: line_no,
                    reason: format!("unknown header key {}", other),
                })
            }
        }
    }

    Ok((fields.finish(line_no)?, line_no + 1, None))
}

/// Projection from a `.prj` sidecar, if one exists and names an EPSG code.
fn sidecar_projection(path: &Path) -> Option<String> {
    let prj = path.with_extension("prj");
    let text = fs::read_to_string(&prj).ok()?;
    match epsg_code(&text) {
        Some(code) => Some(format!("EPSG:{}", code)),
        None => {
            warn!("{} names no EPSG code; ignoring it", prj.display());
            None
        }
    }
}

pub(super) fn read_metadata(path: &Path) -> Result<SourceMetadata> {
    let file = fs::File::open(path)?;
    let mut lines = BufReader::new(file).lines();
    let (header, _, _) = read_header(&mut lines)?;

    Ok(SourceMetadata {
        extent: header.extent(),
        projection_name: sidecar_projection(path).unwrap_or_else(default_projection),
        format: SourceFormat::Asc,
    })
}

/// Upper bound on cells reserved from the header before any value is read.
const MAX_PREALLOCATED_CELLS: usize = 1 << 20;

/// Read a full ESRI ASCII grid.
///
/// Values are returned as written, north row first; no-data cells keep the
/// declared marker value.
pub fn read_asc_grid<P: AsRef<Path>>(path: P) -> Result<(AscHeader, Grid)> {
    let file = fs::File::open(path.as_ref())?;
    let mut lines = BufReader::new(file).lines();
    let (header, first_line, first) = read_header(&mut lines)?;

    let expected = header
        .nrows
        .checked_mul(header.ncols)
        .ok_or_else(|| GeoIoError::InvalidAscii {
            line: first_line,
            reason: format!("{} x {} cells overflow", header.nrows, header.ncols),
        })?;
    let mut values = Vec::with_capacity(expected.min(MAX_PREALLOCATED_CELLS));
    let data_lines = first
        .into_iter()
        .map(Ok)
        .chain(lines)
        .enumerate()
        .map(|(i, line)| (first_line + i, line));

    for (line_no, line) in data_lines {
        let line = line?;
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| GeoIoError::InvalidAscii {
                line: line_no,
                reason: format!("invalid elevation {:?}", token),
            })?;
            values.push(value);
        }
    }

    let found = values.len();
    let grid = Grid::from_vec(header.nrows, header.ncols, values).ok_or_else(|| {
        GeoIoError::InvalidAscii {
            line: first_line,
            reason: format!("expected {} values, found {}", expected, found),
        }
    })?;
    Ok((header, grid))
}
