//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse, SkillRequest, SkillResponse};
use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Voice-platform dispatch
        .route("/skill", post(handle_skill_request))
        // Operations
        .route("/health", get(health))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Skill Dispatch
// ============================================================

async fn handle_skill_request(
    State(state): State<AppState>,
    Json(req): Json<SkillRequest>,
) -> Json<SkillResponse> {
    let turn = req.into_turn();
    tracing::info!(
        user_id = %turn.user_id,
        session_id = %turn.session_id,
        new_session = turn.new_session,
        event = turn.event.kind(),
        "Skill request"
    );

    let reply = state.runtime.handle(turn).await;
    let response = SkillResponse::from_reply(reply);

    tracing::info!(response = ?response, "Response");
    Json(response)
}

// ============================================================
// Operations
// ============================================================

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let users = state
        .runtime
        .store()
        .session_count()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(HealthResponse { status: "ok", users }))
}

async fn get_version() -> &'static str {
    concat!("incoherent ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
