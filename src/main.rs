//! Backlog Board binary entrypoint wiring REST, SSE, and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backlog_board::{
    config::AppConfig,
    dao::board_store::memory::MemoryBoardStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    bootstrap_storage(&app_state).await;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start the CouchDB supervisor when the backend is configured, otherwise fall
/// back to the in-memory store so the service stays usable for guests.
async fn bootstrap_storage(state: &SharedState) {
    #[cfg(feature = "couch-store")]
    {
        use backlog_board::dao::board_store::BoardStore;
        use backlog_board::dao::board_store::couchdb::{CouchBoardStore, CouchConfig};
        use backlog_board::dao::storage::StorageError;
        use backlog_board::services::storage_supervisor;

        match CouchConfig::from_env() {
            Ok(couch_config) => {
                tokio::spawn(storage_supervisor::run(state.clone(), move || {
                    let couch_config = couch_config.clone();
                    async move {
                        CouchBoardStore::connect(couch_config)
                            .await
                            .map(|store| Arc::new(store) as Arc<dyn BoardStore>)
                            .map_err(StorageError::from)
                    }
                }));
                return;
            }
            Err(err) => {
                warn!(error = %err, "CouchDB not configured; using in-memory storage");
            }
        }
    }

    state
        .install_board_store(Arc::new(MemoryBoardStore::new()))
        .await;
    info!("in-memory storage installed; data will not survive a restart");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
