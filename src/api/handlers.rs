//! HTTP request handlers

use super::types::{
    ConversationListResponse, ErrorResponse, MessageRequest, MessageResponse, RootResponse,
    StatusResponse,
};
use super::AppState;
use crate::runtime::CoordinatorError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/message", post(handle_message))
        .route("/status/:thread_ts", get(get_status))
        .route("/conversations", get(list_conversations))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Banner
// ============================================================

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "threadline is running".to_string(),
        endpoints: vec!["/message", "/status/{thread_ts}", "/conversations", "/version"],
    })
}

// ============================================================
// Messages
// ============================================================

async fn handle_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    // Missing content type keeps axum's 415; every other body problem is a 400
    let Json(req) = payload.map_err(|e| match e.status() {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(e.body_text()),
        _ => AppError::BadRequest(e.body_text()),
    })?;
    if req.thread_ts.trim().is_empty() {
        return Err(AppError::BadRequest("thread_ts must not be empty".to_string()));
    }

    tracing::debug!(thread_id = %req.thread_ts, "Message received");

    let outcome = state
        .coordinator
        .handle(&req.thread_ts, &req.text)
        .await
        .map_err(|e| {
            tracing::error!(thread_id = %req.thread_ts, error = %e, "Failed to handle message");
            AppError::from(e)
        })?;

    tracing::debug!(
        thread_id = %outcome.thread_id,
        state = %outcome.state,
        changed = outcome.changed,
        version = outcome.version,
        "Message handled"
    );

    Ok(Json(outcome.into()))
}

// ============================================================
// Status
// ============================================================

async fn get_status(
    State(state): State<AppState>,
    Path(thread_ts): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let record = state
        .coordinator
        .status(&thread_ts)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Conversation not found: {thread_ts}")))?;

    Ok(Json(StatusResponse {
        status: record.state.into(),
        conversation: record,
    }))
}

async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let conversations = state
        .coordinator
        .store()
        .db()
        .list_conversations()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ConversationListResponse { conversations }))
}

async fn get_version() -> &'static str {
    concat!("threadline ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    UnsupportedMediaType(String),
    NotFound(String),
    Internal(String),
}

impl From<CoordinatorError> for AppError {
    fn from(e: CoordinatorError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
