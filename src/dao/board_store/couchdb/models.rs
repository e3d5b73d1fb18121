use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::models::{PublicProfileEntity, RelationKind, RelationRecordEntity, UserSettingsEntity};
use crate::state::board::Board;

pub const BOARD_PREFIX: &str = "board::";
pub const SETTINGS_PREFIX: &str = "settings::";
pub const PROFILE_PREFIX: &str = "profile::";
pub const RELATION_PREFIX: &str = "relation::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[allow(dead_code)]
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// One identity's board stored as a single document; the `_rev` round-trip is
/// what turns our writes into merge-writes instead of blind overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchBoardDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub board: Board,
}

impl CouchBoardDocument {
    pub fn from_board(uid: &str, board: Board) -> Self {
        Self {
            id: board_doc_id(uid),
            rev: None,
            board,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchSettingsDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub settings: UserSettingsEntity,
}

impl CouchSettingsDocument {
    pub fn from_settings(uid: &str, settings: UserSettingsEntity) -> Self {
        Self {
            id: settings_doc_id(uid),
            rev: None,
            settings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchProfileDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub profile: PublicProfileEntity,
}

impl CouchProfileDocument {
    pub fn from_profile(profile: PublicProfileEntity) -> Self {
        Self {
            id: profile_doc_id(&profile.uid),
            rev: None,
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchRelationDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub owner: String,
    pub kind: RelationKind,
    #[serde(flatten)]
    pub record: RelationRecordEntity,
}

impl CouchRelationDocument {
    pub fn from_record(owner: &str, kind: RelationKind, record: RelationRecordEntity) -> Self {
        Self {
            id: relation_doc_id(owner, kind, &record.uid),
            rev: None,
            owner: owner.to_string(),
            kind,
            record,
        }
    }
}

pub fn board_doc_id(uid: &str) -> String {
    format!("{BOARD_PREFIX}{uid}")
}

pub fn settings_doc_id(uid: &str) -> String {
    format!("{SETTINGS_PREFIX}{uid}")
}

pub fn profile_doc_id(uid: &str) -> String {
    format!("{PROFILE_PREFIX}{uid}")
}

pub fn relation_doc_id(owner: &str, kind: RelationKind, uid: &str) -> String {
    format!("{RELATION_PREFIX}{owner}:{}:{uid}", kind.as_str())
}

/// Key prefix selecting one owner's whole relation collection.
pub fn relation_list_prefix(owner: &str, kind: RelationKind) -> String {
    format!("{RELATION_PREFIX}{owner}:{}:", kind.as_str())
}
