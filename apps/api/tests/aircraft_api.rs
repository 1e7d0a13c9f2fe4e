//! ADS-B pipeline tests: download, prepare and the read endpoints
//!
//! A local axum server stands in for the sample archive. It serves the
//! hours 00 and 02 of 2023-11-01 and answers 404 for the rest.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Path, http::Method, http::StatusCode, routing::get, Router};
use bdi_api::api::router;
use bdi_api::infrastructure::raw_store::LocalRawStore;
use common::{app_state, gzip, send, setup_app, InMemoryHr, InMemoryPositions};
use serde_json::json;

const HOUR_00: &str = r#"{
    "now": 1698796800.0,
    "aircraft": [
        {"hex": "a1b2c3", "r": "N123AB", "t": "B738", "lat": 40.0, "lon": -73.0,
         "alt_baro": 3200, "gs": 180.5, "seen_pos": 0.5, "emergency": "none"},
        {"hex": "0d0e0f", "r": "EC-ABC", "t": "A320", "lat": 41.0, "lon": 2.0,
         "alt_baro": 35000, "gs": 450.0, "seen_pos": 2.0},
        {"hex": "ffffff", "t": "GLID"}
    ]
}"#;

const HOUR_02: &str = r#"{
    "now": 1698804000.0,
    "aircraft": [
        {"hex": "a1b2c3", "r": "N123AC", "t": "B738", "lat": 40.5, "lon": -73.5,
         "alt_baro": "ground", "gs": 12.0, "seen_pos": 1.0, "emergency": "general"}
    ]
}"#;

async fn archive_file(
    Path((_, _, _, file)): Path<(String, String, String, String)>,
) -> Result<Vec<u8>, StatusCode> {
    match file.as_str() {
        "000000Z.json.gz" => Ok(gzip(HOUR_00.as_bytes())),
        "020000Z.json.gz" => Ok(gzip(HOUR_02.as_bytes())),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Starts the fake archive and returns its base URL
async fn spawn_archive() -> String {
    let app = Router::new().route("/readsb-hist/:year/:month/:day/:file", get(archive_file));
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/readsb-hist", addr)
}

fn raw_files(data_dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(data_dir.join("raw/day=20231101"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), "http://127.0.0.1:9");

    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_download_respects_file_limit() {
    let source = spawn_archive().await;
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), &source);

    let (status, body) = send(&app, Method::POST, "/api/s1/aircraft/download?file_limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
    assert_eq!(raw_files(dir.path()), vec!["000000Z.json.gz"]);

    // A second run starts from an empty folder and skips missing hours
    let (status, _) = send(&app, Method::POST, "/api/s1/aircraft/download").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        raw_files(dir.path()),
        vec!["000000Z.json.gz", "020000Z.json.gz"]
    );
}

#[tokio::test]
async fn test_invalid_file_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), "http://127.0.0.1:9");

    let (status, body) =
        send(&app, Method::POST, "/api/s1/aircraft/download?file_limit=lots").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_prepare_without_download_fails() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), "http://127.0.0.1:9");

    let (status, body) = send(&app, Method::POST, "/api/s1/aircraft/prepare").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("does not exist"));
}

#[tokio::test]
async fn test_reads_are_empty_before_prepare() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), "http://127.0.0.1:9");

    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/positions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"max_altitude_baro": null, "max_ground_speed": null, "had_emergency": false})
    );
}

#[tokio::test]
async fn test_download_prepare_and_query() {
    let source = spawn_archive().await;
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), &source);

    let (status, _) = send(&app, Method::POST, "/api/s1/aircraft/download?file_limit=5").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::POST, "/api/s1/aircraft/prepare").await;
    assert_eq!(status, StatusCode::OK, "prepare failed: {}", body);
    assert!(dir
        .path()
        .join("prepared/day=20231101/aircraft.db")
        .exists());

    // Aircraft ordered by ICAO, last registration wins
    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"icao": "0d0e0f", "registration": "EC-ABC", "type": "A320"},
            {"icao": "a1b2c3", "registration": "N123AC", "type": "B738"},
            {"icao": "ffffff", "registration": null, "type": "GLID"}
        ])
    );

    // 0-indexed paging
    let (_, body) = send(&app, Method::GET, "/api/s1/aircraft?num_results=2&page=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["icao"], "ffffff");

    // Positions ordered by timestamp = now - seen_pos
    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/positions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"timestamp": 1698796799.5, "lat": 40.0, "lon": -73.0,
             "alt_baro": 3200.0, "gs": 180.5, "emergency": false},
            {"timestamp": 1698803999.0, "lat": 40.5, "lon": -73.5,
             "alt_baro": 0.0, "gs": 12.0, "emergency": true}
        ])
    );

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/s1/aircraft/a1b2c3/positions?num_results=1&page=1",
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["emergency"], true);

    let (status, body) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"max_altitude_baro": 3200.0, "max_ground_speed": 180.5, "had_emergency": true})
    );

    // Aircraft without positions have no stats
    let (_, body) = send(&app, Method::GET, "/api/s1/aircraft/ffffff/stats").await;
    assert_eq!(
        body,
        json!({"max_altitude_baro": null, "max_ground_speed": null, "had_emergency": false})
    );
}

#[tokio::test]
async fn test_prepare_replaces_previous_dataset() {
    let source = spawn_archive().await;
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), &source);

    send(&app, Method::POST, "/api/s1/aircraft/download").await;
    send(&app, Method::POST, "/api/s1/aircraft/prepare").await;
    let (_, first) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/positions").await;

    let (status, _) = send(&app, Method::POST, "/api/s1/aircraft/prepare").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, Method::GET, "/api/s1/aircraft/a1b2c3/positions").await;
    assert_eq!(first, second);
    assert_eq!(second.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_prepare_skips_files_that_are_not_snapshots() {
    let source = spawn_archive().await;
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), &source);

    send(&app, Method::POST, "/api/s1/aircraft/download?file_limit=1").await;
    std::fs::write(dir.path().join("raw/day=20231101/010000Z.json"), "[]").unwrap();
    std::fs::write(dir.path().join("raw/day=20231101/015000Z.json"), r#"{"now": 1.0}"#).unwrap();

    let (status, body) = send(&app, Method::POST, "/api/s1/aircraft/prepare").await;
    assert_eq!(status, StatusCode::OK, "prepare failed: {}", body);

    let (_, body) = send(&app, Method::GET, "/api/s1/aircraft/").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_bucket_routes_need_a_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(Arc::new(InMemoryHr::default()), dir.path(), "http://127.0.0.1:9");

    for uri in ["/api/s4/aircraft/download", "/api/s4/aircraft/prepare"] {
        let (status, body) = send(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("BDI_S3_BUCKET"));
    }
}

#[tokio::test]
async fn test_bucket_download_and_prepare_feed_the_read_endpoints() {
    let source = spawn_archive().await;
    let dir = tempfile::tempdir().unwrap();
    let bucket_dir = dir.path().join("bucket/raw/day=20231101");
    let state = app_state(
        Arc::new(InMemoryHr::default()),
        Arc::new(InMemoryPositions::default()),
        dir.path(),
        &source,
    )
    .with_bucket_store(Arc::new(LocalRawStore::new(&bucket_dir)));
    let app = router(state);

    let (status, _) = send(&app, Method::POST, "/api/s4/aircraft/download?file_limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(bucket_dir.join("000000Z.json.gz").exists());
    assert!(!dir.path().join("raw").exists());

    let (status, body) = send(&app, Method::POST, "/api/s4/aircraft/prepare").await;
    assert_eq!(status, StatusCode::OK, "prepare failed: {}", body);

    let (_, body) = send(&app, Method::GET, "/api/s1/aircraft/").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[1]["registration"], "N123AB");
}
