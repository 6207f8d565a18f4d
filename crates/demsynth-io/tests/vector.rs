//! Extent and projection of vector sources.

use demsynth_io::{read_metadata, terrain_from_file, FileKind, GeoIoError, SourceFormat, WGS84};
use demsynth_terrain::Extent;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_geojson_bbox_over_all_features() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "trail.geojson",
        r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "LineString", "coordinates": [[6.1, 45.0], [6.4, 45.3]] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [5.9, 45.1] } }
            ]
        }"#,
    );

    let metadata = read_metadata(&path, FileKind::Vector).unwrap();
    assert_eq!(metadata.format, SourceFormat::GeoJson);
    assert_eq!(metadata.projection_name, WGS84);
    assert_eq!(metadata.extent, Extent::new(5.9, 45.0, 6.4, 45.3));
}

#[test]
fn test_geojson_declared_bbox_and_crs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "site.json",
        r#"{
            "type": "Feature",
            "bbox": [1000, 2000, 3000, 2500],
            "crs": { "type": "name", "properties": { "name": "EPSG:2154" } },
            "geometry": { "type": "Point", "coordinates": [1500, 2200] },
            "properties": {}
        }"#,
    );

    let terrain = terrain_from_file(&path, FileKind::Vector).unwrap();
    assert_eq!(terrain.projection_name(), "EPSG:2154");
    assert_eq!(terrain.extent(), Extent::new(1000.0, 2000.0, 3000.0, 2500.0));
    assert_eq!((terrain.rows(), terrain.cols()), (250, 1000));
}

#[test]
fn test_geojson_without_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "empty.geojson", r#"{ "type": "FeatureCollection", "features": [] }"#);

    assert!(matches!(
        read_metadata(&path, FileKind::Vector),
        Err(GeoIoError::EmptyGeometry(_))
    ));
}

#[test]
fn test_geojson_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "broken.geojson", "{ \"type\": ");

    assert!(matches!(
        read_metadata(&path, FileKind::Vector),
        Err(GeoIoError::Json(_))
    ));
}

#[test]
fn test_gpx_track() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "ride.gpx",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="demsynth" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>ride</name>
    <trkseg>
      <trkpt lat="46.0" lon="7.0"></trkpt>
      <trkpt lat="46.5" lon="7.75"></trkpt>
      <trkpt lat="45.75" lon="7.25"></trkpt>
    </trkseg>
  </trk>
</gpx>"#,
    );

    let metadata = read_metadata(&path, FileKind::Vector).unwrap();
    assert_eq!(metadata.format, SourceFormat::Gpx);
    assert_eq!(metadata.projection_name, WGS84);
    assert_eq!(metadata.extent, Extent::new(7.0, 45.75, 7.75, 46.5));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        read_metadata("/nonexistent/dem.asc", FileKind::Raster),
        Err(GeoIoError::Io(_))
    ));
}
