//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use footprint::FootprintConfig;
use footprint_service::{router, AppState};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Write an ASCII grid into the temp dir and return its path.
fn write_grid(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn create_test_server() -> TestServer {
    let state = Arc::new(AppState {
        config: FootprintConfig::default(),
    });
    TestServer::new(router(state)).unwrap()
}

const FULL_GRID: &str = "\
ncols 4
nrows 4
xllcorner 10.0
yllcorner 50.0
cellsize 0.5
nodata_value -9999
1 1 1 1
1 1 1 1
1 1 1 1
1 1 1 1
";

const EMPTY_GRID: &str = "\
ncols 3
nrows 3
xllcorner 0
yllcorner 0
cellsize 1.0
nodata_value -9999
-9999 -9999 -9999
-9999 -9999 -9999
-9999 -9999 -9999
";

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["service"], "footprint-service");
    assert!(body["endpoints"].as_array().is_some());
}

#[tokio::test]
async fn test_footprint_success() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "scene.asc", FULL_GRID);
    let server = create_test_server();

    let response = server.post("/footprint").json(&json!({ "url": path })).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["geometry"]["type"], "Polygon");
    assert_eq!(body["properties"]["source_url"], path);

    // Fully valid 4x4 grid of 0.5-degree cells: the footprint is the
    // raster bounding box, a closed 5-position ring.
    let ring = body["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    let lons: Vec<f64> = ring.iter().map(|p| p[0].as_f64().unwrap()).collect();
    let lats: Vec<f64> = ring.iter().map(|p| p[1].as_f64().unwrap()).collect();
    assert_eq!(lons.iter().cloned().fold(f64::INFINITY, f64::min), 10.0);
    assert_eq!(lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 12.0);
    assert_eq!(lats.iter().cloned().fold(f64::INFINITY, f64::min), 50.0);
    assert_eq!(lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 52.0);
}

#[tokio::test]
async fn test_footprint_tolerance_override() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "scene.asc", FULL_GRID);
    let server = create_test_server();

    let response = server
        .post("/footprint")
        .json(&json!({ "url": path, "tolerance": 0.0 }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_footprint_invalid_tolerance() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "scene.asc", FULL_GRID);
    let server = create_test_server();

    let response = server
        .post("/footprint")
        .json(&json!({ "url": path, "tolerance": -1.0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_tolerance");
}

#[tokio::test]
async fn test_footprint_empty_raster() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "empty.asc", EMPTY_GRID);
    let server = create_test_server();

    let response = server.post("/footprint").json(&json!({ "url": path })).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "empty_mask");
}

#[tokio::test]
async fn test_footprint_malformed_grid() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "bad.asc", "ncols zero\nnot a grid\n");
    let server = create_test_server();

    let response = server.post("/footprint").json(&json!({ "url": path })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "shape");
}

#[tokio::test]
async fn test_footprint_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir
        .path()
        .join("missing.asc")
        .to_string_lossy()
        .into_owned();
    let server = create_test_server();

    let response = server.post("/footprint").json(&json!({ "url": path })).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "io");
}

#[tokio::test]
async fn test_footprint_unknown_epsg() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "scene.asc", FULL_GRID);
    let server = create_test_server();

    let response = server
        .post("/footprint")
        .json(&json!({ "url": path, "epsg": 65000 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "projection");
}

#[tokio::test]
async fn test_footprint_missing_url_field() {
    let server = create_test_server();

    let response = server
        .post("/footprint")
        .json(&json!({ "tolerance": 0.5 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_footprint_disjoint_regions_multipolygon() {
    let grid = "\
ncols 4
nrows 4
xllcorner 0
yllcorner 0
cellsize 1.0
nodata_value -9999
7 -9999 -9999 -9999
-9999 -9999 -9999 -9999
-9999 -9999 -9999 -9999
-9999 -9999 -9999 7
";
    let temp_dir = TempDir::new().unwrap();
    let path = write_grid(&temp_dir, "corners.asc", grid);
    let server = create_test_server();

    let response = server.post("/footprint").json(&json!({ "url": path })).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["geometry"]["type"], "MultiPolygon");
    assert_eq!(
        body["geometry"]["coordinates"].as_array().unwrap().len(),
        2
    );
}
