//! Session lifecycle: creating guest sessions, linking them to a durable
//! account (triggering the guest merge), and tearing them down.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    services::{migration, save_scheduler},
    state::{SharedState, board::Board, session::SessionState},
};

/// Create a fresh guest session seeded with the default board and spawn its
/// save scheduler.
pub fn create_session(state: &SharedState) -> Arc<SessionState> {
    let (save_tx, save_rx) = mpsc::unbounded_channel();
    let session = Arc::new(SessionState::new(state.default_board(), save_tx));
    state.insert_session(session.clone());

    tokio::spawn(save_scheduler::run(
        state.clone(),
        session.clone(),
        save_rx,
    ));

    info!(session = %session.id, "guest session created");
    session
}

/// Link a guest session to the account identified by `uid`.
///
/// The guest board is merged into the account's remote board and the merged
/// result replaces the session's local state. The remote round-trip is bounded
/// by the configured initial-load timeout: when it elapses, the session is
/// linked anyway and keeps its guest board, but it is flagged so the first
/// flush re-runs the load-and-merge. The account's stored board is never
/// replaced without merging it first.
pub async fn link_session(
    state: &SharedState,
    session: &SessionState,
    uid: String,
) -> Result<Board, ServiceError> {
    if session.identity().await.is_some() {
        return Err(ServiceError::InvalidState(
            "session is already linked to an account".into(),
        ));
    }

    let guest = session.board().await;
    let timeout = state.config().initial_load_timeout;

    match tokio::time::timeout(timeout, migration::migrate_guest_board(state, &uid, guest)).await {
        Ok(Ok(board)) => {
            session.link_identity(uid.clone()).await;
            session.replace_board(board.clone()).await;
            info!(session = %session.id, uid = %uid, "session linked");
            Ok(board)
        }
        Ok(Err(err)) => Err(err),
        Err(_elapsed) => {
            warn!(
                session = %session.id,
                uid = %uid,
                "initial board load timed out; deferring the merge to the next flush"
            );
            session.link_identity(uid).await;
            session.set_needs_merge(true);
            Ok(session.board().await)
        }
    }
}

/// Remove a session, dropping its realtime feed and save scheduler. Sign-out
/// is modelled as closing the session; the client starts a fresh guest one.
pub fn close_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    match state.remove_session(id) {
        Some(session) => {
            info!(session = %session.id, "session closed");
            Ok(())
        }
        None => Err(ServiceError::NotFound(format!("session {id}"))),
    }
}

/// Linked identity of a session, or an unauthorized error for guests.
pub async fn require_identity(session: &SessionState) -> Result<String, ServiceError> {
    session.identity().await.ok_or_else(|| {
        ServiceError::Unauthorized("session is not linked to an account".into())
    })
}

/// Look up a session or fail with a not-found error.
pub fn require_session(
    state: &SharedState,
    id: Uuid,
) -> Result<Arc<SessionState>, ServiceError> {
    state
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session {id}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::BoxFuture;
    use tokio::time::timeout;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::board_store::{BoardStore, memory::MemoryBoardStore};
    use crate::dao::models::{
        PublicProfileEntity, RelationKind, RelationRecordEntity, UserSettingsEntity,
    };
    use crate::dao::storage::StorageResult;
    use crate::dto::board::AddGameRequest;
    use crate::services::board_service;
    use crate::state::AppState;
    use crate::state::board::{DEFAULT_COLUMN_TO_PLAY, Game};
    use crate::state::session::SaveStatus;

    fn add_request(name: &str) -> AddGameRequest {
        AddGameRequest {
            name: name.into(),
            platforms: vec![],
            genres: vec![],
            released: None,
            background_image: None,
            column_id: Some(DEFAULT_COLUMN_TO_PLAY.to_string()),
        }
    }

    #[tokio::test]
    async fn linking_merges_guest_board_and_replaces_local_state() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let session = create_session(&state);
        board_service::add_game(&session, add_request("Guest Game")).await;

        let board = link_session(&state, &session, "user-1".into())
            .await
            .unwrap();

        assert_eq!(session.identity().await.as_deref(), Some("user-1"));
        assert_eq!(board.games.len(), 1);
        let stored = store.load_board("user-1".into()).await.unwrap().unwrap();
        assert_eq!(stored, board);
    }

    #[tokio::test]
    async fn linking_twice_is_rejected() {
        let state = AppState::new(AppConfig::default());
        state
            .install_board_store(Arc::new(MemoryBoardStore::new()))
            .await;

        let session = create_session(&state);
        link_session(&state, &session, "user-1".into())
            .await
            .unwrap();

        let err = link_session(&state, &session, "user-2".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert_eq!(session.identity().await.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn closing_a_session_removes_it_from_the_registry() {
        let state = AppState::new(AppConfig::default());
        let session = create_session(&state);
        let id = session.id;

        close_session(&state, id).unwrap();

        assert!(state.session(id).is_none());
        assert!(matches!(
            close_session(&state, id),
            Err(ServiceError::NotFound(_))
        ));
    }

    /// Store whose board reads lag (or never complete), standing in for a
    /// slow or unreachable backend during the initial load. Writes go
    /// straight through to the wrapped in-memory store.
    #[derive(Clone)]
    struct SlowLoadStore {
        inner: MemoryBoardStore,
        delay: Option<Duration>,
    }

    impl BoardStore for SlowLoadStore {
        fn load_board(&self, uid: String) -> BoxFuture<'static, StorageResult<Option<Board>>> {
            let inner = self.inner.clone();
            let delay = self.delay;
            Box::pin(async move {
                match delay {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => futures::future::pending().await,
                }
                inner.load_board(uid).await
            })
        }

        fn save_board(&self, uid: String, board: Board) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.save_board(uid, board)
        }

        fn load_settings(
            &self,
            uid: String,
        ) -> BoxFuture<'static, StorageResult<Option<UserSettingsEntity>>> {
            self.inner.load_settings(uid)
        }

        fn save_settings(
            &self,
            uid: String,
            settings: UserSettingsEntity,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.save_settings(uid, settings)
        }

        fn get_public_profile(
            &self,
            uid: String,
        ) -> BoxFuture<'static, StorageResult<Option<PublicProfileEntity>>> {
            self.inner.get_public_profile(uid)
        }

        fn put_public_profile(
            &self,
            profile: PublicProfileEntity,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.put_public_profile(profile)
        }

        fn delete_public_profile(&self, uid: String) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.delete_public_profile(uid)
        }

        fn list_public_profiles(
            &self,
        ) -> BoxFuture<'static, StorageResult<Vec<PublicProfileEntity>>> {
            self.inner.list_public_profiles()
        }

        fn get_relation(
            &self,
            owner: String,
            kind: RelationKind,
            uid: String,
        ) -> BoxFuture<'static, StorageResult<Option<RelationRecordEntity>>> {
            self.inner.get_relation(owner, kind, uid)
        }

        fn put_relation(
            &self,
            owner: String,
            kind: RelationKind,
            record: RelationRecordEntity,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.put_relation(owner, kind, record)
        }

        fn delete_relation(
            &self,
            owner: String,
            kind: RelationKind,
            uid: String,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.delete_relation(owner, kind, uid)
        }

        fn list_relations(
            &self,
            owner: String,
            kind: RelationKind,
        ) -> BoxFuture<'static, StorageResult<Vec<RelationRecordEntity>>> {
            self.inner.list_relations(owner, kind)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.try_reconnect()
        }
    }

    async fn wait_for_saved(session: &SessionState) {
        let mut watcher = session.save_status_watcher();
        timeout(Duration::from_secs(30), async {
            while *watcher.borrow() != SaveStatus::Saved {
                watcher.changed().await.expect("status channel closed");
            }
        })
        .await
        .expect("save status never reached saved");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_initial_load_links_with_local_state_and_flags_the_merge() {
        let state = AppState::new(AppConfig::default());
        state
            .install_board_store(Arc::new(SlowLoadStore {
                inner: MemoryBoardStore::new(),
                delay: None,
            }))
            .await;

        let session = create_session(&state);
        board_service::add_game(&session, add_request("Guest Game")).await;
        let local = session.board().await;

        let board = link_session(&state, &session, "user-1".into())
            .await
            .unwrap();

        assert_eq!(board, local);
        assert_eq!(session.identity().await.as_deref(), Some("user-1"));
        assert!(session.needs_merge());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_initial_load_merges_on_first_flush_instead_of_overwriting() {
        let state = AppState::new(AppConfig::default());
        let inner = MemoryBoardStore::new();

        // The account already has a board on record.
        let account_game = Game {
            id: uuid::Uuid::new_v4(),
            title: "Account Game".into(),
            platform: "PC".into(),
            genre: "RPG".into(),
            year: "2019".into(),
            cover: None,
            cover_index: 0,
            rating: 0,
            is_favorite: false,
        };
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();
        let existing = state
            .default_board()
            .with_game_added(account_game, Some(&to_play));
        inner.save_board("user-1".into(), existing).await.unwrap();

        // Loads answer slower than the initial-load timeout, so linking
        // falls back to the local board with the merge still owed.
        state
            .install_board_store(Arc::new(SlowLoadStore {
                inner: inner.clone(),
                delay: Some(Duration::from_secs(5)),
            }))
            .await;

        let session = create_session(&state);
        link_session(&state, &session, "user-1".into())
            .await
            .unwrap();
        assert!(session.needs_merge());

        board_service::add_game(&session, add_request("Guest Game")).await;
        wait_for_saved(&session).await;

        let stored = inner.load_board("user-1".into()).await.unwrap().unwrap();
        let titles: Vec<&str> = stored
            .games
            .values()
            .map(|game| game.title.as_str())
            .collect();
        assert!(titles.contains(&"Account Game"));
        assert!(titles.contains(&"Guest Game"));
        assert!(!session.needs_merge());
        assert_eq!(session.board().await, stored);
    }
}
