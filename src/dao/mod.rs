/// Board, settings, profile, and relationship document storage.
pub mod board_store;
/// Persisted entity definitions shared across layers.
pub mod models;
/// Game-metadata search proxy client.
pub mod search;
/// Storage abstraction layer for database operations.
pub mod storage;
