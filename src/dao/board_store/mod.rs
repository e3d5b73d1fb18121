#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::models::{PublicProfileEntity, RelationKind, RelationRecordEntity, UserSettingsEntity};
use crate::dao::storage::StorageResult;
use crate::state::board::Board;

/// Abstraction over the hosted document database holding board, settings,
/// profile, and relationship documents.
///
/// Writes follow the backend's last-write-wins-per-document semantics; there
/// is no cross-document transaction, and multi-document operations are issued
/// as independent calls by the service layer.
pub trait BoardStore: Send + Sync {
    /// Fetch the board document of `uid`, if one was ever written.
    fn load_board(&self, uid: String) -> BoxFuture<'static, StorageResult<Option<Board>>>;
    /// Merge-write the board document of `uid`: combine the snapshot into the
    /// existing document rather than blindly replacing it.
    fn save_board(&self, uid: String, board: Board) -> BoxFuture<'static, StorageResult<()>>;

    /// Fetch the settings document of `uid`.
    fn load_settings(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserSettingsEntity>>>;
    /// Write the settings document of `uid`.
    fn save_settings(
        &self,
        uid: String,
        settings: UserSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Fetch a single public profile.
    fn get_public_profile(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<PublicProfileEntity>>>;
    /// Write or replace a public profile projection.
    fn put_public_profile(
        &self,
        profile: PublicProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove a public profile projection; removing an absent one is a no-op.
    fn delete_public_profile(&self, uid: String) -> BoxFuture<'static, StorageResult<()>>;
    /// List every projected public profile. Filtering happens client-side.
    fn list_public_profiles(&self) -> BoxFuture<'static, StorageResult<Vec<PublicProfileEntity>>>;

    /// Fetch one entry of `owner`'s `kind` collection.
    fn get_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<RelationRecordEntity>>>;
    /// Write or replace one entry of `owner`'s `kind` collection.
    fn put_relation(
        &self,
        owner: String,
        kind: RelationKind,
        record: RelationRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete one entry of `owner`'s `kind` collection; absent entries are a no-op.
    fn delete_relation(
        &self,
        owner: String,
        kind: RelationKind,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// List `owner`'s whole `kind` collection.
    fn list_relations(
        &self,
        owner: String,
        kind: RelationKind,
    ) -> BoxFuture<'static, StorageResult<Vec<RelationRecordEntity>>>;

    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
