//! GPX reader: bounding box over every point in the file.

use super::{Bounds, SourceFormat, SourceMetadata, WGS84};
use crate::{GeoIoError, Result};
use gpx::{Gpx, Waypoint};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub(super) fn read_metadata(path: &Path) -> Result<SourceMetadata> {
    let file = File::open(path)?;
    let extent = bounds_of(BufReader::new(file))?
        .ok_or_else(|| GeoIoError::EmptyGeometry(path.display().to_string()))?;

    Ok(SourceMetadata {
        extent,
        projection_name: WGS84.to_string(),
        format: SourceFormat::Gpx,
    })
}

/// Bounding box of waypoints, route points and track points.
fn bounds_of<R: Read>(reader: R) -> Result<Option<demsynth_terrain::Extent>> {
    let gpx: Gpx = gpx::read(reader)?;

    let routes = gpx.routes.iter().flat_map(|route| route.points.iter());
    let tracks = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter());

    let mut bounds = Bounds::new();
    for waypoint in gpx.waypoints.iter().chain(routes).chain(tracks) {
        add(&mut bounds, waypoint);
    }
    Ok(bounds.finish())
}

fn add(bounds: &mut Bounds, waypoint: &Waypoint) {
    let point = waypoint.point();
    bounds.add(point.x(), point.y());
}
