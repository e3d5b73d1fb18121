use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        board::BoardSnapshot,
        session::{LinkRequest, SaveStatusResponse, SessionCreated},
        social::AckResponse,
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes handling the guest session lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(close_session))
        .route("/sessions/{id}/link", post(link_session))
        .route("/sessions/{id}/save-status", get(save_status))
}

/// Open a fresh guest session.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    responses((status = 200, description = "Session created", body = SessionCreated))
)]
pub async fn create_session(State(state): State<SharedState>) -> Json<SessionCreated> {
    let session = session_service::create_session(&state);
    Json(SessionCreated {
        session_id: session.id,
    })
}

/// Link a guest session to a durable account, merging its board into the
/// account's remote board.
#[utoipa::path(
    post,
    path = "/sessions/{id}/link",
    tag = "session",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Session linked; merged board returned", body = BoardSnapshot),
        (status = 409, description = "Session is already linked"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn link_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let board = session_service::link_session(&state, &session, payload.uid).await?;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Close a session, tearing down its feed and save scheduler.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "session",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session closed", body = AckResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn close_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckResponse>, AppError> {
    session_service::close_session(&state, id)?;
    Ok(Json(AckResponse::ok()))
}

/// Current save indicator of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}/save-status",
    tag = "session",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Current indicator", body = SaveStatusResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn save_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveStatusResponse>, AppError> {
    let session = session_service::require_session(&state, id)?;
    Ok(Json(SaveStatusResponse {
        status: session.save_status(),
    }))
}
