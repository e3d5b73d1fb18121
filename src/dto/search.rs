use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::search::SearchHit;

/// One flattened game hit returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchHitDto {
    /// External database identifier.
    pub id: i64,
    /// Game title.
    pub name: String,
    /// Platform names.
    pub platforms: Vec<String>,
    /// Genre names.
    pub genres: Vec<String>,
    /// Release date as "YYYY-MM-DD".
    pub released: Option<String>,
    /// Cover image URL.
    pub background_image: Option<String>,
    /// Metacritic score.
    pub metacritic: Option<i32>,
}

impl From<SearchHit> for SearchHitDto {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.id,
            name: hit.name,
            platforms: hit
                .platforms
                .into_iter()
                .map(|entry| entry.platform.name)
                .collect(),
            genres: hit.genres.into_iter().map(|entry| entry.name).collect(),
            released: hit.released,
            background_image: hit.background_image,
            metacritic: hit.metacritic,
        }
    }
}

/// Envelope of a metadata search; empty results are a normal answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResultsResponse {
    /// Matching games.
    pub results: Vec<SearchHitDto>,
}
