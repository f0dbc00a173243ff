use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn setup_app_with(config: Config) -> axum::Router {
    let state = Arc::new(AppState::new(config.clone()));
    api::routes(&config).with_state(state)
}

fn setup_app() -> axum::Router {
    let mut config = Config::from_env();
    config.max_samples = 5_000;
    config.default_profile = tf_core::ProfileConfig::default();
    setup_app_with(config)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn health_check_and_request_id() {
    let app = setup_app();
    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn flat_profile_is_one_level_segment() {
    let app = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/profile",
            json!({ "samples": [0.0, 0.0, 0.0, 0.0, 0.0] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body = read_json(res).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["path"], json!([70.0, 70.0, 70.0, 70.0, 70.0]));
    assert_eq!(body["control_points"], json!([true, false, false, false, true]));
    assert_eq!(body["stats"]["inside_pct"], 100.0);
    assert_eq!(body["vertices"].as_array().unwrap().len(), 2);
    assert_eq!(body["vertices"][1]["distance_m"], 400.0);
}

#[tokio::test]
async fn explicit_config_and_waypoints_are_honoured() {
    let app = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/profile",
            json!({
                "samples": [0.0, 0.0, 0.0, 0.0],
                "waypoints": [false, true, false, false],
                "config": { "step_m": 50.0, "follow_height_m": 100.0, "tolerance_m": 10.0 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = read_json(res).await;
    assert_eq!(body["path"], json!([100.0, 100.0, 100.0, 100.0]));
    assert_eq!(body["mandatory"], json!([true, true, false, true]));
    assert_eq!(body["slope_breaks"], json!([true, false, false, true]));
    assert_eq!(body["config"]["speed_mps"], 26.0);
}

#[tokio::test]
async fn invalid_envelope_is_rejected() {
    let app = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/profile",
            json!({ "samples": [0.0, 0.0, 0.0], "config": { "speed_mps": 0.0 } }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["error"], "invalid_configuration");
}

#[tokio::test]
async fn mismatched_waypoints_are_rejected() {
    let app = setup_app();
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/profile",
            json!({ "samples": [0.0, 0.0, 0.0], "waypoints": [true, true] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn oversized_trace_is_rejected() {
    let mut config = Config::from_env();
    config.max_samples = 4;
    let app = setup_app_with(config);
    let res = app
        .oneshot(json_request(
            "POST",
            "/v1/profile",
            json!({ "samples": [0.0, 0.0, 0.0, 0.0, 0.0] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn seeded_generation_is_reproducible() {
    let app = setup_app();
    let request = json!({ "length": 50, "grid_m": 10.0, "seed": 42 });

    let first = read_json(
        app.clone()
            .oneshot(json_request("POST", "/v1/terrain/generate", request.clone()))
            .await
            .unwrap(),
    )
    .await;
    let second = read_json(
        app.oneshot(json_request("POST", "/v1/terrain/generate", request))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["values"].as_array().unwrap().len(), 50);
    assert_eq!(first, second);
}

#[tokio::test]
async fn terrain_edit_and_profile_lifecycle() {
    let app = setup_app();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/terrains",
            json!({ "values": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0], "grid_m": 10.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = read_json(res).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Drag from sample 1 to sample 4, ending at 30 m.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/terrains/{}/points", id),
            json!({ "index": 4, "height_m": 30.0, "from_index": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let edited = read_json(res).await;
    assert_eq!(
        edited["terrain"]["values"],
        json!([0.0, 0.0, 10.0, 20.0, 30.0, 0.0])
    );

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/terrains/{}/points", id),
            json!({ "index": 99, "height_m": 1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/terrains/{}/profile", id),
            json!({ "config": { "step_m": 10.0 } }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile = read_json(res).await;
    assert_eq!(profile["samples"].as_array().unwrap().len(), 6);
    assert_eq!(profile["ok"], true);

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/terrains/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/terrains/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn terrain_with_bad_grid_is_rejected() {
    let app = setup_app();
    for body in [
        json!({ "values": [0.0, 0.0, 0.0], "grid_m": -10.0 }),
        json!({ "length": 3, "grid_m": 0.0 }),
        json!({ "generate": true, "length": 3, "grid_m": -1.0 }),
    ] {
        let res = app
            .clone()
            .oneshot(json_request("POST", "/v1/terrains", body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(res).await["error"], "invalid_input");
    }

    let res = app
        .oneshot(
            Request::builder()
                .uri("/v1/terrains")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read_json(res).await, json!([]));
}

#[tokio::test]
async fn finer_step_profiles_upsampled_terrain() {
    let app = setup_app();
    let created = read_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/v1/terrains",
                json!({ "values": [0.0, 10.0, 20.0, 30.0], "grid_m": 10.0 }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("POST")
        .uri(format!("/v1/terrains/{}/profile", id))
        .header("content-type", "application/json")
        .header("x-request-id", "upsample-1")
        .body(Body::from(json!({ "config": { "step_m": 5.0 } }).to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "upsample-1");

    let profile = read_json(res).await;
    assert_eq!(
        profile["samples"],
        json!([0.0, 0.0, 10.0, 10.0, 20.0, 20.0, 30.0, 30.0])
    );
    let last = profile["vertices"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["distance_m"], 35.0);
}

#[tokio::test]
async fn rejected_ramp_leaves_terrain_unchanged() {
    let app = setup_app();
    let created = read_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/v1/terrains",
                json!({ "values": [0.0, 0.0, 0.0, 0.0], "grid_m": 10.0 }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/terrains/{}/points", id),
            json!({ "index": 2, "height_m": 42.0, "from_index": 99 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = read_json(
        app.oneshot(
            Request::builder()
                .uri(format!("/v1/terrains/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(stored["terrain"]["values"], json!([0.0, 0.0, 0.0, 0.0]));
    assert_eq!(stored["updated_at"], created["updated_at"]);
}

#[tokio::test]
async fn oversized_resample_is_rejected_before_allocation() {
    let app = setup_app();
    let created = read_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/v1/terrains",
                json!({ "length": 10, "grid_m": 10.0 }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/v1/terrains/{}/profile", id),
            json!({ "config": { "step_m": 0.001 } }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
