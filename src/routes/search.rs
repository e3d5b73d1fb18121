use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    dto::search::SearchResultsResponse, error::AppError, services::search_service,
    state::SharedState,
};

/// Route forwarding metadata searches to the configured proxy.
pub fn router() -> Router<SharedState> {
    Router::new().route("/search", get(search_games))
}

/// Query string of a metadata search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text game title query.
    pub search: String,
}

/// Search the external game database through the proxy.
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(("search" = String, Query, description = "Game title query")),
    responses(
        (status = 200, description = "Matching games", body = SearchResultsResponse),
        (status = 409, description = "No search proxy configured"),
        (status = 502, description = "Proxy call failed")
    )
)]
pub async fn search_games(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResultsResponse>, AppError> {
    let results = search_service::search_games(&state, &params.search).await?;
    Ok(Json(results))
}
