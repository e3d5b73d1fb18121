//! Per-session state: the authoritative board copy, the linked identity, the
//! realtime feed, and the save-status indicator.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, mpsc, watch};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::board::Board;

/// Save indicator state machine: `Idle → Saving → (Saved | Error)`, with
/// `Saved` auto-reverting to `Idle` after a short display interval and `Error`
/// sticking until the next successful flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// Nothing pending.
    Idle,
    /// A flush is scheduled or in flight.
    Saving,
    /// The last flush succeeded.
    Saved,
    /// The last flush failed; the next mutation retries implicitly.
    Error,
}

/// State bundle for one connected client session.
///
/// A session starts as a guest (no identity) and may later be linked to a
/// durable user id, at which point its board is persisted remotely.
pub struct SessionState {
    /// Session identifier handed to the client.
    pub id: Uuid,
    identity: RwLock<Option<String>>,
    board: RwLock<Board>,
    feed: watch::Sender<Board>,
    save_status: watch::Sender<SaveStatus>,
    save_tx: mpsc::UnboundedSender<Board>,
    needs_merge: AtomicBool,
}

impl SessionState {
    /// Build a fresh guest session around an initial board. `save_tx` feeds
    /// the session's save scheduler task.
    pub fn new(initial: Board, save_tx: mpsc::UnboundedSender<Board>) -> Self {
        let (feed, _rx) = watch::channel(initial.clone());
        let (save_status, _rx) = watch::channel(SaveStatus::Idle);
        Self {
            id: Uuid::new_v4(),
            identity: RwLock::new(None),
            board: RwLock::new(initial),
            feed,
            save_status,
            save_tx,
            needs_merge: AtomicBool::new(false),
        }
    }

    /// Linked user id, if the session has claimed an account.
    pub async fn identity(&self) -> Option<String> {
        self.identity.read().await.clone()
    }

    /// Record the linked user id. Only ever transitions guest → linked.
    pub async fn link_identity(&self, uid: String) {
        let mut guard = self.identity.write().await;
        *guard = Some(uid);
    }

    /// Snapshot of the current board.
    pub async fn board(&self) -> Board {
        self.board.read().await.clone()
    }

    /// Replace the board and broadcast the new snapshot on the feed without
    /// scheduling a save. Used for store-originated replacements.
    pub async fn replace_board(&self, board: Board) {
        {
            let mut guard = self.board.write().await;
            *guard = board.clone();
        }
        self.feed.send_replace(board);
    }

    /// Replace the board, broadcast it, and hand the snapshot to the save
    /// scheduler. This is the single entry point for local mutations: state
    /// is visible on the feed before any remote write is attempted.
    pub async fn publish(&self, board: Board) {
        self.replace_board(board.clone()).await;
        let _ = self.save_tx.send(board);
    }

    /// Subscribe to the realtime board feed. The receiver immediately holds
    /// the current snapshot, making the stream restartable.
    pub fn subscribe_board(&self) -> watch::Receiver<Board> {
        self.feed.subscribe()
    }

    /// Current save indicator value.
    pub fn save_status(&self) -> SaveStatus {
        *self.save_status.borrow()
    }

    /// Subscribe to save indicator updates.
    pub fn save_status_watcher(&self) -> watch::Receiver<SaveStatus> {
        self.save_status.subscribe()
    }

    /// Whether the account's remote board still has to be merged in.
    ///
    /// Set when the initial load timed out during linking: the session keeps
    /// its local board, and the next flush must load-and-merge instead of
    /// writing over whatever the account already had stored.
    pub fn needs_merge(&self) -> bool {
        self.needs_merge.load(Ordering::SeqCst)
    }

    /// Mark or clear the pending remote merge.
    pub fn set_needs_merge(&self, pending: bool) {
        self.needs_merge.store(pending, Ordering::SeqCst);
    }

    /// Update the save indicator, notifying watchers on change.
    pub fn set_save_status(&self, status: SaveStatus) {
        self.save_status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
