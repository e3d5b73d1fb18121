//! Game-metadata search, forwarded through the configured proxy.

use crate::{
    dao::search::SearchError,
    dto::search::{SearchHitDto, SearchResultsResponse},
    error::ServiceError,
    state::SharedState,
};

/// Query the metadata proxy. An empty result set is a normal answer, not an
/// error; a missing proxy configuration is reported as an invalid state.
pub async fn search_games(
    state: &SharedState,
    query: &str,
) -> Result<SearchResultsResponse, ServiceError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput("search query is empty".into()));
    }

    let client = state.search_client().ok_or(SearchError::NotConfigured)?;

    let hits = client.search(trimmed).await?;
    Ok(SearchResultsResponse {
        results: hits.into_iter().map(SearchHitDto::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;

    #[tokio::test]
    async fn unconfigured_proxy_is_an_invalid_state() {
        let state = AppState::new(AppConfig::default());

        let err = search_games(&state, "zelda").await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_network_call() {
        let mut config = AppConfig::default();
        config.search_endpoint = Some("http://localhost:9/search".into());
        let state = AppState::new(config);

        let err = search_games(&state, "   ").await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
