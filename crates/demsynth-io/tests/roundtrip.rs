//! Export then re-import through the public adapters.

use approx::assert_relative_eq;
use demsynth_io::{
    export, read_asc_grid, read_geotiff_grid, read_metadata, terrain_from_file, AscWriter,
    ExportFormat, FileKind, GeoIoError, SourceFormat, TerrainWriter,
};
use demsynth_terrain::{Extent, StrategyRegistry, Terrain};
use std::fs;

fn generated(projection: &str) -> Terrain {
    let mut terrain = Terrain::builder()
        .registry(StrategyRegistry::with_seed(7))
        .method("diamondsquare")
        .projection(projection)
        .extent(Extent::new(500_000.0, 4_000_000.0, 500_330.0, 4_000_210.0))
        .cell_size(10.0)
        .altitude_factor(1500.0)
        .build()
        .unwrap();
    terrain.generate().unwrap();
    terrain
}

#[test]
fn test_asc_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.asc");
    let terrain = generated("EPSG:32631");

    export(&terrain, &path, ExportFormat::Asc).unwrap();
    let (header, grid) = read_asc_grid(&path).unwrap();

    assert_eq!((header.nrows, header.ncols), (21, 33));
    assert_eq!(header.nodata_value, Some(-9999.0));
    assert_eq!(header.extent(), terrain.extent());
    assert_eq!(grid.dimensions(), terrain.grid().dimensions());
    for (read, written) in grid.as_slice().iter().zip(terrain.grid().as_slice()) {
        assert_relative_eq!(*read, *written);
    }
}

#[test]
fn test_asc_metadata_uses_prj_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.asc");
    AscWriter::default()
        .write(&generated("EPSG:32631"), &path)
        .unwrap();

    let metadata = read_metadata(&path, FileKind::Raster).unwrap();
    assert_eq!(metadata.format, SourceFormat::Asc);
    assert_eq!(metadata.projection_name, "EPSG:3857");

    fs::write(
        dir.path().join("dem.prj"),
        r#"PROJCS["WGS 84 / UTM zone 31N",AUTHORITY["EPSG","32631"]]"#,
    )
    .unwrap();
    let metadata = read_metadata(&path, FileKind::Raster).unwrap();
    assert_eq!(metadata.projection_name, "EPSG:32631");
}

#[test]
fn test_asc_value_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2\n3\n",
    )
    .unwrap();

    assert!(matches!(
        read_asc_grid(&path),
        Err(GeoIoError::InvalidAscii { .. })
    ));
}

#[test]
fn test_geotiff_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    let terrain = generated("EPSG:32631");

    export(&terrain, &path, ExportFormat::from_path(&path).unwrap()).unwrap();
    let metadata = read_metadata(&path, FileKind::Raster).unwrap();

    assert_eq!(metadata.format, SourceFormat::GeoTiff);
    assert_eq!(metadata.projection_name, "EPSG:32631");
    assert_relative_eq!(metadata.extent.x_min, terrain.x_min());
    assert_relative_eq!(metadata.extent.y_max, terrain.y_max());
    assert_relative_eq!(metadata.extent.x_max, terrain.x_max());
    assert_relative_eq!(metadata.extent.y_min, terrain.y_min());

    let grid = read_geotiff_grid(&path).unwrap();
    assert_eq!(&grid, terrain.grid());
}

#[test]
fn test_geotiff_keeps_non_epsg_projection_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.tiff");
    export(&generated("Local mine grid"), &path, ExportFormat::GeoTiff).unwrap();

    let metadata = read_metadata(&path, FileKind::Raster).unwrap();
    assert_eq!(metadata.projection_name, "Local mine grid");
}

#[test]
fn test_terrain_from_geotiff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dem.tif");
    export(&generated("EPSG:32631"), &path, ExportFormat::GeoTiff).unwrap();

    let terrain = terrain_from_file(&path, FileKind::Raster).unwrap();
    assert_eq!(terrain.projection_name(), "EPSG:32631");
    assert_eq!(terrain.cols(), 1000);
    assert_relative_eq!(terrain.cell_size(), 0.33);
    assert_eq!(terrain.method_name(), "perlinnoise");
}

#[test]
fn test_plain_tiff_is_rejected() {
    use tiff::encoder::{colortype, TiffEncoder};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.tif");
    let file = fs::File::create(&path).unwrap();
    let mut encoder = TiffEncoder::new(std::io::BufWriter::new(file)).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(2, 2, &[0.0, 1.0, 2.0, 3.0])
        .unwrap();
    drop(encoder);

    assert!(matches!(
        read_metadata(&path, FileKind::Raster),
        Err(GeoIoError::InvalidGeoTiff(_))
    ));
}
