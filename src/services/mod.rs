/// Board mutations and the search-hit mapping.
pub mod board_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Guest-to-account board migration and merge.
pub mod migration;
/// User settings and the public profile projection.
pub mod profile_service;
/// Debounced board persistence.
pub mod save_scheduler;
/// Game metadata search via the configured proxy.
pub mod search_service;
/// Session lifecycle and account linking.
pub mod session_service;
/// Relationship mutations across users' collections.
pub mod social_service;
/// Server-Sent Events board feed.
pub mod sse_service;
/// Storage connection supervision and degraded mode.
pub mod storage_supervisor;
