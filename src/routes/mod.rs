use axum::Router;

use crate::state::SharedState;

pub mod board;
pub mod docs;
pub mod health;
pub mod profile;
pub mod search;
pub mod session;
pub mod social;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(session::router())
        .merge(board::router())
        .merge(sse::router())
        .merge(social::router())
        .merge(profile::router())
        .merge(search::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
