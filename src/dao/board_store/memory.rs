//! In-memory [`BoardStore`] used by the test suite and as a fallback when the
//! service is started without a document database.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::board_store::BoardStore;
use crate::dao::models::{
    PublicProfileEntity, RelationKind, RelationRecordEntity, UserSettingsEntity,
};
use crate::dao::storage::{StorageError, StorageResult};
use crate::state::board::Board;

/// Process-local document store keyed the same way the hosted backend is.
#[derive(Clone)]
pub struct MemoryBoardStore {
    boards: Arc<DashMap<String, Board>>,
    settings: Arc<DashMap<String, UserSettingsEntity>>,
    profiles: Arc<DashMap<String, PublicProfileEntity>>,
    relations: Arc<DashMap<(String, RelationKind, String), RelationRecordEntity>>,
    fail_writes: Arc<AtomicBool>,
    // Remaining writes before failures kick in; negative means unlimited.
    write_allowance: Arc<AtomicIsize>,
    board_saves: Arc<AtomicUsize>,
}

impl Default for MemoryBoardStore {
    fn default() -> Self {
        Self {
            boards: Arc::default(),
            settings: Arc::default(),
            profiles: Arc::default(),
            relations: Arc::default(),
            fail_writes: Arc::default(),
            write_allowance: Arc::new(AtomicIsize::new(-1)),
            board_saves: Arc::default(),
        }
    }
}

impl MemoryBoardStore {
    /// Build an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, mimicking a lost backend connection.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Let `count` more writes succeed, then fail every one after, mimicking
    /// a backend dying in the middle of a write sequence.
    pub fn fail_writes_after(&self, count: usize) {
        self.write_allowance
            .store(count as isize, Ordering::SeqCst);
    }

    /// Number of successful board writes since construction.
    pub fn board_saves(&self) -> usize {
        self.board_saves.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> StorageResult<()> {
        let allowed = !self.fail_writes.load(Ordering::SeqCst)
            && self
                .write_allowance
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                    match remaining {
                        remaining if remaining < 0 => Some(remaining),
                        0 => None,
                        remaining => Some(remaining - 1),
                    }
                })
                .is_ok();
        if !allowed {
            return Err(StorageError::unavailable(
                "simulated write failure".into(),
                io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            ));
        }
        Ok(())
    }
}

impl BoardStore for MemoryBoardStore {
    fn load_board(&self, uid: String) -> BoxFuture<'static, StorageResult<Option<Board>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.boards.get(&uid).map(|entry| entry.clone())) })
    }

    fn save_board(&self, uid: String, board: Board) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store.boards.insert(uid, board);
            store.board_saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn load_settings(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserSettingsEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.settings.get(&uid).map(|entry| entry.clone())) })
    }

    fn save_settings(
        &self,
        uid: String,
        settings: UserSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store.settings.insert(uid, settings);
            Ok(())
        })
    }

    fn get_public_profile(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<PublicProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.profiles.get(&uid).map(|entry| entry.clone())) })
    }

    fn put_public_profile(
        &self,
        profile: PublicProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store.profiles.insert(profile.uid.clone(), profile);
            Ok(())
        })
    }

    fn delete_public_profile(&self, uid: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store.profiles.remove(&uid);
            Ok(())
        })
    }

    fn list_public_profiles(&self) -> BoxFuture<'static, StorageResult<Vec<PublicProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .profiles
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn get_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<RelationRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .relations
                .get(&(owner, kind, uid))
                .map(|entry| entry.clone()))
        })
    }

    fn put_relation(
        &self,
        owner: String,
        kind: RelationKind,
        record: RelationRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store
                .relations
                .insert((owner, kind, record.uid.clone()), record);
            Ok(())
        })
    }

    fn delete_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_writable()?;
            store.relations.remove(&(owner, kind, uid));
            Ok(())
        })
    }

    fn list_relations(
        &self,
        owner: String,
        kind: RelationKind,
    ) -> BoxFuture<'static, StorageResult<Vec<RelationRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .relations
                .iter()
                .filter(|entry| {
                    let (entry_owner, entry_kind, _) = entry.key();
                    *entry_owner == owner && *entry_kind == kind
                })
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
