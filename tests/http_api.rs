// tests/http_api.rs
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use boxoffice::{
    api::{build_api, AppState},
    store,
};

async fn test_server(dir: &tempfile::TempDir) -> TestServer {
    let url = format!("sqlite:{}", dir.path().join("events.sqlite").display());
    let pool = store::connect(&url).await.unwrap();
    TestServer::new(build_api(AppState::new(pool))).unwrap()
}

#[tokio::test]
async fn create_list_and_price_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let res = server
        .post("/api/v1/events")
        .json(&json!({
            "event_id": "rust-conf",
            "event_description": "annual meetup",
            "start_time": "2026-09-01T20:00:00Z",
            "capacity": 3,
            "price": 25.0
        }))
        .await;
    res.assert_status(StatusCode::CREATED);

    let res = server.get("/api/v1/events").await;
    res.assert_status_ok();
    let body: Value = res.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["event_id"], json!("rust-conf"));
    assert_eq!(rows[0]["sold"], json!(0));
    assert_eq!(rows[0]["tickets_left"], json!(true));

    let res = server
        .post("/api/v1/events/rust-conf/optimal-pricing")
        .json(&json!({ "prices": [10.0, 20.0, 30.0] }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["optimal_price"], json!(20.0));
    assert_eq!(body["tickets_sold"], json!(2));
    assert_eq!(body["max_profit"], json!(40.0));
}

#[tokio::test]
async fn sold_out_event_returns_the_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    server
        .post("/api/v1/events")
        .json(&json!({
            "event_id": "gone",
            "start_time": "2026-09-01T20:00:00Z",
            "capacity": 2,
            "price": 25.0,
            "sold": 2
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let res = server
        .post("/api/v1/events/gone/optimal-pricing")
        .json(&json!({ "prices": [100.0, 200.0] }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["optimal_price"], json!(-1.0));
    assert_eq!(body["tickets_sold"], json!(0));
    assert_eq!(body["max_profit"], json!(0.0));

    // No tickets left shows up in the listing as well.
    let res = server.get("/api/v1/events").await;
    let body: Value = res.json();
    assert_eq!(body[0]["tickets_left"], json!(false));
}

#[tokio::test]
async fn pricing_an_unknown_event_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let res = server
        .post("/api/v1/events/nope/optimal-pricing")
        .json(&json!({ "prices": [10.0] }))
        .await;
    res.assert_status(StatusCode::NOT_FOUND);
    let body: Value = res.json();
    assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn negative_prices_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    server
        .post("/api/v1/events")
        .json(&json!({
            "event_id": "strict",
            "start_time": "2026-09-01T20:00:00Z",
            "capacity": 10,
            "price": 5.0
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let res = server
        .post("/api/v1/events/strict/optimal-pricing")
        .json(&json!({ "prices": [10.0, -1.0] }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_event_id_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let ev = json!({
        "event_id": "twice",
        "start_time": "2026-09-01T20:00:00Z",
        "price": 5.0
    });
    server
        .post("/api/v1/events")
        .json(&ev)
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/v1/events")
        .json(&ev)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_start_time_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    let res = server
        .post("/api/v1/events")
        .json(&json!({
            "event_id": "bad-time",
            "start_time": "next tuesday",
            "price": 5.0
        }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metrics_count_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir).await;

    server
        .post("/api/v1/events")
        .json(&json!({
            "event_id": "observed",
            "start_time": "2026-09-01T20:00:00Z",
            "capacity": 5,
            "price": 5.0
        }))
        .await
        .assert_status(StatusCode::CREATED);

    for _ in 0..2 {
        server
            .post("/api/v1/events/observed/optimal-pricing")
            .json(&json!({ "prices": [4.0, 6.0] }))
            .await
            .assert_status_ok();
    }

    let res = server.get("/metrics").await;
    res.assert_status_ok();
    let text = res.text();
    assert!(text.contains("boxoffice_quotes_total 2"));
    assert!(text.contains("boxoffice_events_created_total 1"));
}
