//! Integration tests for the HTTP API, driven through the router with a
//! throwaway SQLite database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use homesense_lib::{build_router, config::Settings, db::Database, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

/// 2025-01-01T00:00:00Z
const DAY_START: i64 = 1_735_689_600;

fn setup_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut settings = Settings::default();
    settings.db_path = dir.path().join("homesense.sqlite3");
    settings.dwell.dwell_secs = 60;

    let db = Database::new(settings.db_path.clone()).expect("open database");
    (build_router(AppState::new(db, settings)), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn upload(app: &Router, beacon_id: &str, room: &str, samples: &[f64]) -> (StatusCode, Value) {
    send(
        app,
        post(
            "/calibration/upload",
            json!({
                "beacon_id": beacon_id,
                "room": room,
                "rssi_samples": samples,
                "window_start": DAY_START,
                "window_end": DAY_START + 60,
            }),
        ),
    )
    .await
}

/// Kitchen on B1 at -60 dBm, Office on B2 at -80 dBm.
async fn calibrate(app: &Router) {
    let (status, _) = upload(app, "B1", "Kitchen", &[-58.0, -62.0]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = upload(app, "B2", "Office", &[-80.0]).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app, post("/calibration/fit", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

async fn record(app: &Router, room: &str, start_ts: i64, end_ts: i64) -> (StatusCode, Value) {
    send(
        app,
        post(
            "/events/location",
            json!({"room": room, "start_ts": start_ts, "end_ts": end_ts, "confidence": 0.9}),
        ),
    )
    .await
}

#[tokio::test]
async fn health_reports_module_and_version() {
    let (app, _dir) = setup_app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "homesense");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn upload_binds_room_to_beacon() {
    let (app, _dir) = setup_app();
    let (status, body) = upload(&app, "B1", "Kitchen", &[-60.0]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "beacon_id": "B1", "room": "Kitchen"}));

    let (_, rooms) = send(&app, get("/rooms")).await;
    assert_eq!(rooms[0]["name"], "Kitchen");
    assert_eq!(rooms[0]["beacon_id"], "B1");
}

#[tokio::test]
async fn upload_without_samples_is_rejected() {
    let (app, _dir) = setup_app();
    let (status, body) = upload(&app, "B1", "Kitchen", &[]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No RSSI samples provided");
}

#[tokio::test]
async fn upload_cannot_take_another_beacons_room() {
    let (app, _dir) = setup_app();
    upload(&app, "B1", "Kitchen", &[-60.0]).await;
    upload(&app, "B2", "Office", &[-80.0]).await;

    let (status, _) = upload(&app, "B1", "Office", &[-70.0]).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn fit_without_data_is_a_client_error() {
    let (app, _dir) = setup_app();
    let (status, body) = send(&app, post("/calibration/fit", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "No calibration data available. Upload calibration data first."
    );
}

#[tokio::test]
async fn fit_returns_mean_per_beacon_and_persists_it() {
    let (app, _dir) = setup_app();
    upload(&app, "B1", "Kitchen", &[-58.0, -62.0]).await;
    upload(&app, "B2", "Office", &[-80.0]).await;

    let (status, body) = send(&app, post("/calibration/fit", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"B1": -60.0, "B2": -80.0}));

    let (status, centroids) = send(&app, get("/centroids")).await;
    assert_eq!(status, StatusCode::OK);
    let centroids = centroids.as_array().unwrap();
    assert_eq!(centroids.len(), 2);
    assert_eq!(centroids[0]["room"], "Kitchen");
    assert_eq!(centroids[0]["mean_rssi"], -60.0);
    assert!(centroids[0]["updated_at"].is_i64());
}

#[tokio::test]
async fn reupload_replaces_old_samples() {
    let (app, _dir) = setup_app();
    upload(&app, "B1", "Kitchen", &[-40.0]).await;
    send(&app, post("/calibration/fit", json!({}))).await;

    upload(&app, "B1", "Kitchen", &[-70.0, -72.0]).await;
    let (_, body) = send(&app, post("/calibration/fit", json!({}))).await;
    assert_eq!(body["B1"], -71.0);
}

#[tokio::test]
async fn infer_maps_nearest_beacon_to_room() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let (status, body) = send(
        &app,
        post(
            "/infer",
            json!({"readings": [
                {"beacon_id": "B1", "rssi": -61.0},
                {"beacon_id": "B2", "rssi": -90.0}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "Kitchen");
    assert_eq!(body["confidence"], 1.0);
}

#[tokio::test]
async fn infer_without_centroids_or_readings_is_unknown() {
    let (app, _dir) = setup_app();

    let (status, body) = send(
        &app,
        post("/infer", json!({"readings": [{"beacon_id": "B1", "rssi": -60.0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"room": "unknown", "confidence": 0.0}));

    calibrate(&app).await;
    let (status, body) = send(&app, post("/infer", json!({"readings": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "unknown");
}

#[tokio::test]
async fn tracking_records_a_stable_dwell() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let kitchen = json!([{"beacon_id": "B1", "rssi": -60.0}, {"beacon_id": "B2", "rssi": -95.0}]);
    let office = json!([{"beacon_id": "B1", "rssi": -75.0}, {"beacon_id": "B2", "rssi": -80.0}]);

    for offset in [0, 30, 90] {
        let (status, body) = send(
            &app,
            post(
                "/infer/track",
                json!({"readings": kitchen, "timestamp": DAY_START + offset}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["room"], "Kitchen");
        assert!(body.get("event").is_none());
    }

    let (_, body) = send(
        &app,
        post(
            "/infer/track",
            json!({"readings": office, "timestamp": DAY_START + 120}),
        ),
    )
    .await;
    assert_eq!(body["room"], "Office");
    assert_eq!(body["event"]["room"], "Kitchen");
    assert_eq!(body["event"]["start_ts"], DAY_START);
    assert_eq!(body["event"]["end_ts"], DAY_START + 120);
    assert!(body["event"]["id"].is_i64());

    let (_, summary) = send(&app, get("/insights/daily?date=2025-01-01")).await;
    assert_eq!(summary["room_durations"]["Kitchen"], 120);
}

#[tokio::test]
async fn events_for_unknown_rooms_are_not_found() {
    let (app, _dir) = setup_app();
    let (status, body) = record(&app, "Attic", DAY_START, DAY_START + 60).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Attic"));
}

#[tokio::test]
async fn events_ending_before_they_start_are_rejected() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let (status, _) = record(&app, "Kitchen", DAY_START + 60, DAY_START).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn daily_summary_aggregates_the_day() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let (status, created) = record(&app, "Kitchen", DAY_START, DAY_START + 1800).await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["id"].is_i64());
    record(&app, "Kitchen", DAY_START + 1800, DAY_START + 3600).await;
    record(&app, "Office", DAY_START + 3600, DAY_START + 7200).await;
    // next day, excluded
    record(&app, "Office", DAY_START + 86_400, DAY_START + 90_000).await;

    let (status, body) = send(&app, get("/insights/daily?date=2025-01-01")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-01-01");
    assert_eq!(body["room_durations"], json!({"Kitchen": 3600, "Office": 3600}));
    assert_eq!(body["total_duration"], 7200);
    assert_eq!(
        body["transitions"],
        json!([{"from_room": "Kitchen", "to_room": "Office", "timestamp": DAY_START + 3600}])
    );
    assert_eq!(body["summary"]["active_hours"], 2.0);
    assert_eq!(body["summary"]["most_visited_room"], "Kitchen");
    assert_eq!(body["summary"]["most_visited_duration"], 3600);
    assert_eq!(body["dwell"], json!({"Kitchen": 0.5, "Office": 0.5}));
    assert_eq!(body["accuracy"], Value::Null);
}

#[tokio::test]
async fn empty_day_has_zero_summary() {
    let (app, _dir) = setup_app();
    let (status, body) = send(&app, get("/insights/daily?date=2025-01-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_duration"], 0);
    assert_eq!(body["room_durations"], json!({}));
    assert_eq!(body["transitions"], json!([]));
    assert_eq!(body["summary"]["most_visited_room"], Value::Null);
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (app, _dir) = setup_app();
    let (status, body) = send(&app, get("/insights/daily?date=01-01-2025")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format '01-01-2025'. Use YYYY-MM-DD");
}

#[tokio::test]
async fn transition_counts_group_room_pairs() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;
    record(&app, "Kitchen", DAY_START, DAY_START + 10).await;
    record(&app, "Office", DAY_START + 10, DAY_START + 20).await;
    record(&app, "Kitchen", DAY_START + 20, DAY_START + 30).await;
    record(&app, "Office", DAY_START + 30, DAY_START + 40).await;

    let (status, body) = send(&app, get("/insights/daily/transitions?date=2025-01-01")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"from_room": "Kitchen", "to_room": "Office", "count": 2},
            {"from_room": "Office", "to_room": "Kitchen", "count": 1}
        ])
    );
}

#[tokio::test]
async fn events_with_out_of_range_timestamps_are_rejected() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let (status, _) = record(&app, "Kitchen", 0, i64::MAX).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = record(&app, "Office", 1, i64::MAX).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/insights/daily?date=1970-01-01")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_duration"], 0);
}

#[tokio::test]
async fn tracking_rejects_out_of_range_timestamps() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let (status, body) = send(
        &app,
        post(
            "/infer/track",
            json!({"readings": [{"beacon_id": "B1", "rssi": -60.0}], "timestamp": -1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "timestamp -1 is outside the supported range");
}

#[tokio::test]
async fn dwell_survives_a_room_rename_mid_run() {
    let (app, _dir) = setup_app();
    calibrate(&app).await;

    let kitchen = json!([{"beacon_id": "B1", "rssi": -60.0}, {"beacon_id": "B2", "rssi": -95.0}]);
    for offset in [0, 30] {
        let (status, body) = send(
            &app,
            post(
                "/infer/track",
                json!({"readings": kitchen, "timestamp": DAY_START + offset}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["room"], "Kitchen");
    }

    let (status, _) = upload(&app, "B1", "Cuisine", &[-58.0, -62.0]).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post(
            "/infer/track",
            json!({"readings": [], "timestamp": DAY_START + 600}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "unknown");
    assert_eq!(body["event"]["room"], "Cuisine");
    assert_eq!(body["event"]["start_ts"], DAY_START);
    assert_eq!(body["event"]["end_ts"], DAY_START + 600);

    let (_, summary) = send(&app, get("/insights/daily?date=2025-01-01")).await;
    assert_eq!(summary["total_duration"], 600);
    assert_eq!(summary["room_durations"]["Cuisine"], 600);
}
