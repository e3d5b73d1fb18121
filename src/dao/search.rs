//! Thin client for the game-metadata search proxy.
//!
//! The proxy hides the third-party API key behind a single
//! `GET <endpoint>?search=<query>` call; this client only shapes the request
//! and decodes the response. A non-2xx status or an undecodable body is a
//! generic search failure; an empty `results` array is a normal empty answer.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Result alias for search proxy calls.
pub type SearchResult<T> = Result<T, SearchError>;

/// Failures surfaced by the search proxy client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No proxy endpoint is configured.
    #[error("no search endpoint configured")]
    NotConfigured,
    /// Building the HTTP client failed.
    #[error("failed to build search client")]
    ClientBuilder {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent.
    #[error("failed to reach search proxy")]
    RequestSend {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The proxy answered with a non-success status.
    #[error("search proxy returned status {status}")]
    RequestStatus {
        /// Returned status code.
        status: reqwest::StatusCode,
    },
    /// The response body could not be decoded.
    #[error("failed to decode search proxy response")]
    DecodeResponse {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

/// Envelope returned by the search proxy.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Matching games; empty when nothing was found.
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One game entry from the external metadata database.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// External database identifier.
    pub id: i64,
    /// Game title.
    pub name: String,
    /// Platforms the game was released on.
    #[serde(default)]
    pub platforms: Vec<PlatformEntry>,
    /// Genres assigned by the external database.
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
    /// Release date as "YYYY-MM-DD", when known.
    #[serde(default)]
    pub released: Option<String>,
    /// Cover/backdrop image URL.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Metacritic score, when available.
    #[serde(default)]
    pub metacritic: Option<i32>,
}

/// Wrapper object the external database uses around each platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformEntry {
    /// The wrapped platform.
    pub platform: NamedEntry,
}

/// Genre entry carrying only the name we use.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreEntry {
    /// Genre name.
    pub name: String,
}

/// Generic named object.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntry {
    /// Display name.
    pub name: String,
}

/// HTTP client bound to one search proxy endpoint.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    /// Build a client targeting `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> SearchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| SearchError::ClientBuilder { source })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Query the proxy and return the decoded hits.
    pub async fn search(&self, query: &str) -> SearchResult<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("search", query)])
            .send()
            .await
            .map_err(|source| SearchError::RequestSend { source })?;

        if !response.status().is_success() {
            return Err(SearchError::RequestStatus {
                status: response.status(),
            });
        }

        let payload = response
            .json::<SearchResponse>()
            .await
            .map_err(|source| SearchError::DecodeResponse { source })?;

        Ok(payload.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_proxy_envelope() {
        let body = r#"{
            "results": [{
                "id": 42,
                "name": "Foo",
                "platforms": [{"platform": {"name": "PC"}}, {"platform": {"name": "Switch"}}],
                "genres": [{"name": "RPG"}],
                "released": "2020-05-01",
                "background_image": "http://x/y.png",
                "metacritic": 87
            }]
        }"#;

        let decoded: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.results.len(), 1);
        let hit = &decoded.results[0];
        assert_eq!(hit.name, "Foo");
        assert_eq!(hit.platforms[0].platform.name, "PC");
        assert_eq!(hit.genres[0].name, "RPG");
        assert_eq!(hit.released.as_deref(), Some("2020-05-01"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body = r#"{"results": [{"id": 1, "name": "Bare"}]}"#;
        let decoded: SearchResponse = serde_json::from_str(body).unwrap();
        let hit = &decoded.results[0];
        assert!(hit.platforms.is_empty());
        assert!(hit.genres.is_empty());
        assert!(hit.released.is_none());
        assert!(hit.background_image.is_none());
    }

    #[test]
    fn empty_results_is_not_an_error() {
        let decoded: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(decoded.results.is_empty());

        let decoded: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.results.is_empty());
    }
}
