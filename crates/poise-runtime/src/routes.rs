//! HTTP routes and the WebSocket upgrade

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use poise_core::{Difficulty, PoiseError, Question, UserId};
use poise_vision::FrameAnalysis;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::session::run_session;
use crate::AppState;

/// Default and maximum number of questions per request
pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 15;

/// Floor for the WebSocket transport message limit
pub const MIN_TRANSPORT_MESSAGE_BYTES: usize = 1024 * 1024;

/// Transport-level WebSocket message limit.
///
/// Sits well above `max_frame_bytes` so oversize messages reach the
/// session and get an error reply instead of a dropped connection.
pub fn transport_message_limit(max_frame_bytes: usize) -> usize {
    max_frame_bytes
        .saturating_mul(4)
        .max(MIN_TRANSPORT_MESSAGE_BYTES)
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_frame_bytes;
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/questions", get(list_questions))
        .route("/questions/random", get(random_question))
        .route("/analyze", post(analyze_frame))
        .route("/ws/:user_id", get(ws_upgrade))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// JSON error response `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl From<PoiseError> for ApiError {
    fn from(err: PoiseError) -> Self {
        let status = match &err {
            PoiseError::Decode(_) | PoiseError::InvalidIdentity(_) | PoiseError::InvalidMessage(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Interview Practice API is running" }))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    connections: usize,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        connections: state.relay.len(),
    })
}

#[derive(Debug, Deserialize)]
struct QuestionsQuery {
    count: Option<usize>,
}

async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> Json<Vec<Question>> {
    let count = query
        .count
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .min(MAX_QUESTION_COUNT);
    Json(state.questions.questions(count))
}

#[derive(Debug, Deserialize)]
struct RandomQuery {
    difficulty: Option<String>,
}

async fn random_question(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Json<Question> {
    let difficulty = query
        .difficulty
        .as_deref()
        .map(Difficulty::from_name_lenient)
        .unwrap_or_default();
    Json(state.questions.random_question(difficulty))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    image: String,
}

async fn analyze_frame(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<FrameAnalysis>, ApiError> {
    let permit = Arc::clone(&state.analysis_permits)
        .acquire_owned()
        .await
        .map_err(|_| ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "analysis unavailable"))?;

    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || {
        let analysis = analyzer.analyze(&request.image);
        drop(permit);
        analysis
    })
    .await
    .map_err(|e| {
        warn!("analysis task failed: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "analysis failed")
    })?;

    let analysis = result.map_err(PoiseError::from)?;
    Ok(Json(analysis))
}

async fn ws_upgrade(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let identity = UserId::parse(&user_id)?;
    debug!(%identity, "WebSocket upgrade");
    let limit = transport_message_limit(state.config.max_frame_bytes);
    Ok(ws
        .max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| run_session(socket, identity, state))
        .into_response())
}
