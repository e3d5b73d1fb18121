use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::social::{AckResponse, BlockRequest, FollowRequest, RelationshipsResponse, TargetRequest},
    error::AppError,
    services::{session_service, social_service},
    state::SharedState,
};

/// Routes mutating the caller's relationship collections. All of them require
/// a session linked to an account.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/social/follow", post(follow))
        .route("/sessions/{id}/social/unfollow", post(unfollow))
        .route("/sessions/{id}/social/block", post(block))
        .route("/sessions/{id}/social/unblock", post(unblock))
        .route("/sessions/{id}/social/relationships", get(relationships))
}

/// Follow a target profile; invite-only targets receive a pending request.
#[utoipa::path(
    post,
    path = "/sessions/{id}/social/follow",
    tag = "social",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = FollowRequest,
    responses(
        (status = 200, description = "Follow recorded", body = AckResponse),
        (status = 401, description = "Session is not linked"),
        (status = 409, description = "Blocked in either direction")
    )
)]
pub async fn follow(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FollowRequest>,
) -> Result<Json<AckResponse>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let caller = session_service::require_identity(&session).await?;
    social_service::follow(&state, &caller, payload).await?;
    Ok(Json(AckResponse::ok()))
}

/// Remove the caller's following entry and the target's followers entry.
#[utoipa::path(
    post,
    path = "/sessions/{id}/social/unfollow",
    tag = "social",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = TargetRequest,
    responses(
        (status = 200, description = "Unfollow recorded", body = AckResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn unfollow(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TargetRequest>,
) -> Result<Json<AckResponse>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let caller = session_service::require_identity(&session).await?;
    social_service::unfollow(&state, &caller, payload).await?;
    Ok(Json(AckResponse::ok()))
}

/// Block a target and sever the relationship in both directions.
#[utoipa::path(
    post,
    path = "/sessions/{id}/social/block",
    tag = "social",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Block recorded", body = AckResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn block(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BlockRequest>,
) -> Result<Json<AckResponse>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let caller = session_service::require_identity(&session).await?;
    social_service::block(&state, &caller, payload).await?;
    Ok(Json(AckResponse::ok()))
}

/// Remove the caller's blocked entry; no prior relationship is restored.
#[utoipa::path(
    post,
    path = "/sessions/{id}/social/unblock",
    tag = "social",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = TargetRequest,
    responses(
        (status = 200, description = "Unblock recorded", body = AckResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn unblock(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TargetRequest>,
) -> Result<Json<AckResponse>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let caller = session_service::require_identity(&session).await?;
    social_service::unblock(&state, &caller, payload).await?;
    Ok(Json(AckResponse::ok()))
}

/// All four relationship collections of the caller.
#[utoipa::path(
    get,
    path = "/sessions/{id}/social/relationships",
    tag = "social",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Relationship collections", body = RelationshipsResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn relationships(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RelationshipsResponse>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let caller = session_service::require_identity(&session).await?;
    let response = social_service::relationships(&state, &caller).await?;
    Ok(Json(response))
}
