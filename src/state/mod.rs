pub mod board;
pub mod session;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{board_store::BoardStore, search::SearchClient},
    error::ServiceError,
    state::{board::Board, session::SessionState},
};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the document-store handle, the session
/// registry, and the degraded flag.
pub struct AppState {
    config: AppConfig,
    store: RwLock<Option<Arc<dyn BoardStore>>>,
    degraded: watch::Sender<bool>,
    sessions: DashMap<Uuid, Arc<SessionState>>,
    search: Option<SearchClient>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply. The application starts in degraded mode until a storage
    /// backend is installed by the supervisor.
    pub fn new(config: AppConfig) -> SharedState {
        let search = match config.search_endpoint.as_deref() {
            Some(endpoint) => match SearchClient::new(endpoint) {
                Ok(client) => Some(client),
                Err(err) => {
                    warn!(error = %err, "failed to build search client; search disabled");
                    None
                }
            },
            None => None,
        };

        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            store: RwLock::new(None),
            degraded: degraded_tx,
            sessions: DashMap::new(),
            search,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fresh board seeded with the configured default columns.
    pub fn default_board(&self) -> Board {
        Board::with_columns(&self.config.default_columns)
    }

    /// Obtain a handle to the current board store, if one is installed.
    pub async fn board_store(&self) -> Option<Arc<dyn BoardStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the board store or fail with a degraded-mode error.
    pub async fn require_board_store(&self) -> Result<Arc<dyn BoardStore>, ServiceError> {
        self.board_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new board store implementation and leave degraded mode.
    pub async fn install_board_store(&self, store: Arc<dyn BoardStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current board store and enter degraded mode.
    pub async fn clear_board_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Search proxy client, when an endpoint is configured.
    pub fn search_client(&self) -> Option<&SearchClient> {
        self.search.as_ref()
    }

    /// Register a new session.
    pub fn insert_session(&self, session: Arc<SessionState>) {
        self.sessions.insert(session.id, session);
    }

    /// Look up a session by id.
    pub fn session(&self, id: Uuid) -> Option<Arc<SessionState>> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// Remove a session, dropping its feed and save scheduler.
    pub fn remove_session(&self, id: Uuid) -> Option<Arc<SessionState>> {
        self.sessions.remove(&id).map(|(_, session)| session)
    }

    /// Update and broadcast the degraded flag when the value changes.
    fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}
