//! Integration test: Server API endpoints

mod common;

use house_price_api::server::{AppState, ServerConfig, create_router};
use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "house-price-test-boundary";

fn test_app() -> (axum::Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: dir.path().join("data").display().to_string(),
        models_dir: dir.path().join("models").display().to_string(),
        max_upload_size: 10 * 1024 * 1024,
        cors_origin: None,
    };
    let state = Arc::new(AppState::new(config.clone()));
    (create_router(state, &config), dir)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn upload(field: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"houses.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        csv = csv,
    );
    Request::builder()
        .method(Method::POST)
        .uri("/upload-csv")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_ui_serves_form() {
    let (app, _dir) = test_app();
    let response = app.oneshot(get("/ui")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("sqft_living"));
    assert!(html.contains("Estimated Price"));
}

#[tokio::test]
async fn test_predict_before_train() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, post_json("/predict", json!({"record": {"sqft_living": 1200}}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("Train first"));
}

#[tokio::test]
async fn test_predict_without_records() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, post_json("/predict", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_malformed_predict_body_is_json_error() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, post_json("/predict", json!({"record": {"sqft_living": null}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_numeric_strings_and_encoded_keys() {
    let (app, _dir) = test_app();
    send(&app, upload("file", &common::housing_csv(100))).await;
    let (status, _) = send(&app, post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_json(
            "/predict",
            json!({"records": [
                {"bedrooms": 3, "bathrooms": 2.0, "sqft_living": 1500, "district": "south"},
                {"bedrooms": "3", "bathrooms": "2.0", "sqft_living": "1500", "district_south": 1}
            ]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let predictions = body["predictions"].as_array().unwrap();
    let a = predictions[0].as_f64().unwrap();
    let b = predictions[1].as_f64().unwrap();
    assert!((a - b).abs() < 1e-6 * a.abs().max(1.0), "{} vs {}", a, b);
}

#[tokio::test]
async fn test_train_without_dataset() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, post_empty("/train")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_evaluate_without_model() {
    let (app, _dir) = test_app();
    send(&app, upload("file", &common::housing_csv(20))).await;

    let (status, _) = send(&app, get("/evaluate")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, upload("dataset", &common::housing_csv(5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_upload_train_evaluate_predict() {
    let (app, dir) = test_app();

    let (status, body) = send(&app, upload("file", &common::housing_csv(100))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["detail"].as_str().unwrap().contains("data.csv"));
    assert!(dir.path().join("data").join("data.csv").is_file());

    let (status, report) = send(&app, post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["test_size"], 20);
    assert_eq!(report["train_size"], 80);
    assert!(report["r2"].as_f64().unwrap().is_finite());

    let (status, eval) = send(&app, get("/evaluate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(eval["samples"], 100);
    assert!(eval["r2"].as_f64().unwrap() >= 0.0);

    let (status, single) = send(
        &app,
        post_json(
            "/predict",
            json!({"record": {"bedrooms": 3, "bathrooms": 2.0, "sqft_living": 1500, "district": "north"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["predictions"].as_array().unwrap().len(), 1);

    let (status, batch) = send(
        &app,
        post_json(
            "/predict",
            json!({"records": [
                {"bedrooms": 3, "bathrooms": 2.0, "sqft_living": 1500, "district": "north"},
                {"sqft_living": 900, "district": "nowhere"}
            ]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let predictions = batch["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    let first = predictions[0].as_f64().unwrap();
    let alone = single["predictions"][0].as_f64().unwrap();
    assert!((first - alone).abs() < 1e-6 * alone.abs().max(1.0));
}

#[tokio::test]
async fn test_train_with_explicit_path() {
    let (app, dir) = test_app();
    let csv = common::write_housing_csv(dir.path(), 40);
    let uri = format!("/train?csv_path={}", csv.display());

    let (status, report) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["test_size"], 8);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/nonexistent")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_wrong_method() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, get("/train")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], true);
}
