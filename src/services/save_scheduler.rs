//! Debounced persistence writer.
//!
//! One task per session coalesces bursts of local mutations into a single
//! remote write per quiet interval: every incoming snapshot re-arms the timer,
//! so only the last snapshot inside a debounce window is ever flushed. Guest
//! sessions never write remotely. A failed flush is reported through the save
//! status and retried implicitly by the next mutation, never automatically.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::services::migration;
use crate::state::{SharedState, board::Board, session::SaveStatus, session::SessionState};

/// Drive the save loop for one session until its mutation channel closes.
pub async fn run(
    state: SharedState,
    session: Arc<SessionState>,
    mut rx: UnboundedReceiver<Board>,
) {
    let debounce = state.config().save_debounce;
    let saved_display = state.config().saved_display;

    // Snapshot carried over from the saved-display wait, when a mutation
    // arrived while the indicator was still showing "saved".
    let mut pending: Option<Board> = None;

    loop {
        let snapshot = match pending.take() {
            Some(snapshot) => snapshot,
            None => match rx.recv().await {
                Some(snapshot) => snapshot,
                None => return,
            },
        };

        // Guest mode: local state only, indicator stays idle.
        let Some(uid) = session.identity().await else {
            session.set_save_status(SaveStatus::Idle);
            continue;
        };

        session.set_save_status(SaveStatus::Saving);

        // Trailing-edge debounce: keep replacing the snapshot until the
        // channel stays quiet for a full window.
        let mut snapshot = snapshot;
        let mut channel_open = true;
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(board) => snapshot = board,
                    None => {
                        channel_open = false;
                        break;
                    }
                },
                _ = sleep(debounce) => break,
            }
        }

        match flush(&state, &session, &uid, snapshot).await {
            Ok(()) => {
                session.set_save_status(SaveStatus::Saved);
                debug!(session = %session.id, uid = %uid, "board flushed");
                if !channel_open {
                    return;
                }
                // Show "saved" briefly, unless a newer mutation cuts it short.
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(board) => pending = Some(board),
                        None => return,
                    },
                    _ = sleep(saved_display) => session.set_save_status(SaveStatus::Idle),
                }
            }
            Err(err) => {
                warn!(session = %session.id, uid = %uid, error = %err, "board flush failed");
                session.set_save_status(SaveStatus::Error);
                if !channel_open {
                    return;
                }
            }
        }
    }
}

/// Merge-write one snapshot to the linked identity's board document.
///
/// A session whose initial load timed out at link time still owes a merge with
/// the account's stored board; that merge happens here, on the first flush,
/// instead of overwriting the remote document with local-only state.
async fn flush(
    state: &SharedState,
    session: &SessionState,
    uid: &str,
    snapshot: Board,
) -> anyhow::Result<()> {
    if session.needs_merge() {
        let merged = migration::migrate_guest_board(state, uid, snapshot).await?;
        session.set_needs_merge(false);
        session.replace_board(merged).await;
        return Ok(());
    }

    let Some(store) = state.board_store().await else {
        anyhow::bail!("storage unavailable (degraded mode)");
    };
    store.save_board(uid.to_string(), snapshot).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::board_store::{BoardStore, memory::MemoryBoardStore};
    use crate::state::AppState;
    use crate::state::board::DEFAULT_COLUMN_TO_PLAY;

    async fn wait_for_status(session: &SessionState, wanted: SaveStatus) {
        let mut watcher = session.save_status_watcher();
        timeout(Duration::from_secs(30), async {
            while *watcher.borrow() != wanted {
                watcher.changed().await.expect("status channel closed");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("save status never reached {wanted:?}"));
    }

    fn spawn_session(state: &SharedState) -> (Arc<SessionState>, mpsc::UnboundedSender<Board>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(SessionState::new(state.default_board(), tx.clone()));
        tokio::spawn(run(state.clone(), session.clone(), rx));
        (session, tx)
    }

    fn board_with_games(state: &SharedState, titles: &[&str]) -> Board {
        let mut board = state.default_board();
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();
        for title in titles {
            let game = crate::state::board::Game {
                id: uuid::Uuid::new_v4(),
                title: (*title).into(),
                platform: "PC".into(),
                genre: "RPG".into(),
                year: "2020".into(),
                cover: None,
                cover_index: 0,
                rating: 0,
                is_favorite: false,
            };
            board = board.with_game_added(game, Some(&to_play));
        }
        board
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_mutations_yields_a_single_write_of_the_last_snapshot() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let (session, tx) = spawn_session(&state);
        session.link_identity("user-1".into()).await;

        let first = board_with_games(&state, &["One"]);
        let second = board_with_games(&state, &["One", "Two"]);
        let last = board_with_games(&state, &["One", "Two", "Three"]);
        tx.send(first).unwrap();
        tx.send(second).unwrap();
        tx.send(last.clone()).unwrap();

        wait_for_status(&session, SaveStatus::Saved).await;

        assert_eq!(store.board_saves(), 1);
        let stored = store
            .load_board("user-1".into())
            .await
            .unwrap()
            .expect("board written");
        assert_eq!(stored, last);
    }

    #[tokio::test(start_paused = true)]
    async fn guest_mutations_never_write_and_stay_idle() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let (session, tx) = spawn_session(&state);
        tx.send(board_with_games(&state, &["One"])).unwrap();

        // Give the scheduler time to process well past the debounce window.
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(store.board_saves(), 0);
        assert_eq!(session.save_status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_indicator_reverts_to_idle_after_display_interval() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let (session, tx) = spawn_session(&state);
        session.link_identity("user-1".into()).await;
        tx.send(board_with_games(&state, &["One"])).unwrap();

        wait_for_status(&session, SaveStatus::Saved).await;
        wait_for_status(&session, SaveStatus::Idle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_flush_reports_error_and_next_mutation_retries() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;
        store.set_fail_writes(true);

        let (session, tx) = spawn_session(&state);
        session.link_identity("user-1".into()).await;
        tx.send(board_with_games(&state, &["One"])).unwrap();

        wait_for_status(&session, SaveStatus::Error).await;
        assert_eq!(store.board_saves(), 0);

        // Error persists until the next mutation succeeds.
        store.set_fail_writes(false);
        let recovered = board_with_games(&state, &["One", "Two"]);
        tx.send(recovered.clone()).unwrap();

        wait_for_status(&session, SaveStatus::Saved).await;
        assert_eq!(store.board_saves(), 1);
        let stored = store
            .load_board("user-1".into())
            .await
            .unwrap()
            .expect("board written");
        assert_eq!(stored, recovered);
    }
}
