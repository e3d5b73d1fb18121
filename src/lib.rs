//! Library crate for backlog-board, exposing modules for binaries and integration tests.

/// Runtime configuration loading.
pub mod config;
/// Storage and search collaborators.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Error taxonomy and HTTP mapping.
pub mod error;
/// HTTP route handlers.
pub mod routes;
/// Application services.
pub mod services;
/// Shared state, sessions, and the board model.
pub mod state;
