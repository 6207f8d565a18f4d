//! GeoJSON reader: bounding box and legacy `crs` member.

use super::{Bounds, SourceFormat, SourceMetadata, WGS84};
use crate::geokeys::epsg_code;
use crate::{GeoIoError, Result};
use demsynth_terrain::Extent;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(super) fn read_metadata(path: &Path) -> Result<SourceMetadata> {
    let file = File::open(path)?;
    let document: Value = serde_json::from_reader(BufReader::new(file))?;

    let extent = declared_bbox(&document)
        .or_else(|| {
            let mut bounds = Bounds::new();
            walk(&document, &mut bounds);
            bounds.finish()
        })
        .ok_or_else(|| GeoIoError::EmptyGeometry(path.display().to_string()))?;

    Ok(SourceMetadata {
        extent,
        projection_name: crs_name(&document).unwrap_or_else(|| WGS84.to_string()),
        format: SourceFormat::GeoJson,
    })
}

/// Top-level `bbox`: `[w, s, e, n]` or `[w, s, low, e, n, high]`.
fn declared_bbox(document: &Value) -> Option<Extent> {
    let values = document
        .get("bbox")?
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()?;

    match values.as_slice() {
        [x_min, y_min, x_max, y_max] | [x_min, y_min, _, x_max, y_max, _] => {
            Some(Extent::new(*x_min, *y_min, *x_max, *y_max))
        }
        _ => None,
    }
}

/// Collect every position under `coordinates`, descending through features,
/// geometries and geometry collections.
fn walk(value: &Value, bounds: &mut Bounds) {
    match value {
        Value::Object(object) => {
            if let Some(coordinates) = object.get("coordinates") {
                add_positions(coordinates, bounds);
            }
            for key in ["geometry", "features", "geometries"] {
                if let Some(child) = object.get(key) {
                    walk(child, bounds);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| walk(item, bounds)),
        _ => {}
    }
}

fn add_positions(value: &Value, bounds: &mut Bounds) {
    let Some(items) = value.as_array() else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => bounds.add(x, y),
        _ => items.iter().for_each(|item| add_positions(item, bounds)),
    }
}

/// Projection from a named `crs` member, normalized to `EPSG:<code>`.
fn crs_name(document: &Value) -> Option<String> {
    let name = document
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;
    epsg_code(name).map(|code| format!("EPSG:{}", code))
}
