//! End-to-end HTTP tests against a live server on an ephemeral port

use std::net::SocketAddr;
use std::sync::Arc;

use base64::Engine;
use poise_runtime::{serve, AppState, ServerConfig};
use poise_vision::NoopDetector;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(ServerConfig::default(), Arc::new(NoopDetector));
    tokio::spawn(async move {
        serve(listener, state).await.unwrap();
    });
    addr
}

fn png_data_uri() -> String {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(8, 8)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
    )
}

async fn get_json(addr: SocketAddr, path: &str) -> Value {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    assert!(response.status().is_success(), "{path}: {}", response.status());
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let addr = spawn_server().await;

    let root = get_json(addr, "/").await;
    assert_eq!(root["message"], "Interview Practice API is running");

    let health = get_json(addr, "/health").await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["connections"], 0);
}

#[tokio::test]
async fn test_questions() {
    let addr = spawn_server().await;

    let questions = get_json(addr, "/questions?count=5").await;
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 5);
    let beginners = questions
        .iter()
        .filter(|q| q["difficulty"] == "beginner")
        .count();
    assert_eq!(beginners, 3);

    let capped = get_json(addr, "/questions?count=100").await;
    assert_eq!(capped.as_array().unwrap().len(), 15);

    let default = get_json(addr, "/questions").await;
    assert_eq!(default.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_random_question() {
    let addr = spawn_server().await;

    let question = get_json(addr, "/questions/random?difficulty=advanced").await;
    assert_eq!(question["difficulty"], "advanced");
    assert!(!question["question"].as_str().unwrap().is_empty());

    let fallback = get_json(addr, "/questions/random?difficulty=expert").await;
    assert_eq!(fallback["difficulty"], "beginner");
}

#[tokio::test]
async fn test_analyze_frame() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/analyze"))
        .json(&json!({ "image": png_data_uri() }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let analysis: Value = response.json().await.unwrap();
    assert_eq!(analysis["face_detected"], false);
    assert_eq!(analysis["facial_expression"], Value::Null);
    assert_eq!(analysis["confidence_score"]["score"], 60);
    assert_eq!(analysis["confidence_score"]["level"], "moderate");
}

#[tokio::test]
async fn test_analyze_rejects_bad_image() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/analyze"))
        .json(&json!({ "image": "not base64!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("decode"));
}

#[tokio::test]
async fn test_ws_route_requires_upgrade() {
    let addr = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/ws/bad%20id")).await.unwrap();
    assert!(response.status().is_client_error());
}
