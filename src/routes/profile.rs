use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::profile::{ProfileSearchResponse, SettingsResponse, UpdateSettingsRequest},
    error::AppError,
    services::{profile_service, session_service},
    state::SharedState,
};

/// Routes for user settings and the public profile directory.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/sessions/{id}/settings",
            get(get_settings).put(update_settings),
        )
        .route("/profiles", get(search_profiles))
}

/// Query string of the profile directory search.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// Substring matched against display names.
    #[serde(default)]
    pub query: String,
}

/// Current settings of the linked account.
#[utoipa::path(
    get,
    path = "/sessions/{id}/settings",
    tag = "profile",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn get_settings(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SettingsResponse>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let uid = session_service::require_identity(&session).await?;
    let settings = profile_service::get_settings(&state, &uid).await?;
    Ok(Json(SettingsResponse::from(settings)))
}

/// Update the linked account's settings and refresh its public profile.
#[utoipa::path(
    put,
    path = "/sessions/{id}/settings",
    tag = "profile",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 401, description = "Session is not linked")
    )
)]
pub async fn update_settings(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let uid = session_service::require_identity(&session).await?;
    let settings = profile_service::update_settings(&state, &uid, payload).await?;
    Ok(Json(SettingsResponse::from(settings)))
}

/// Search listed public profiles by display name substring.
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profile",
    params(("query" = String, Query, description = "Display name substring")),
    responses((status = 200, description = "Matching profiles", body = ProfileSearchResponse))
)]
pub async fn search_profiles(
    State(state): State<SharedState>,
    Query(params): Query<ProfileQuery>,
) -> Result<Json<ProfileSearchResponse>, AppError> {
    let results = profile_service::search_profiles(&state, &params.query).await?;
    Ok(Json(ProfileSearchResponse { results }))
}
