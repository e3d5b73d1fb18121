use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{Privacy, RelationRecordEntity};

/// Target profile passed when following a user, as the caller sees it in the
/// profile search results.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct FollowRequest {
    /// Target user id.
    #[validate(length(min = 1, message = "uid must not be empty"))]
    pub uid: String,
    /// Target display name at the time of the request.
    pub display_name: String,
    /// Target avatar URL.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Target's declared visibility; invite-only turns the follow into a request.
    pub privacy: Privacy,
}

/// Target profile passed when blocking a user.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct BlockRequest {
    /// Target user id.
    #[validate(length(min = 1, message = "uid must not be empty"))]
    pub uid: String,
    /// Target display name at the time of the request.
    pub display_name: String,
    /// Target avatar URL.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Bare target reference used by unfollow/unblock.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct TargetRequest {
    /// Target user id.
    #[validate(length(min = 1, message = "uid must not be empty"))]
    pub uid: String,
}

/// Uniform success payload for relationship mutators.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    /// Always true; failures answer with `{ok: false, error}` instead.
    pub ok: bool,
}

impl AckResponse {
    /// Success acknowledgement.
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// All four relationship collections of one user, refreshed wholesale.
#[derive(Debug, Serialize, ToSchema)]
pub struct RelationshipsResponse {
    /// Users this user follows (or asked to follow).
    pub following: Vec<RelationRecordEntity>,
    /// Users following this user.
    pub followers: Vec<RelationRecordEntity>,
    /// Users this user blocked.
    pub blocked: Vec<RelationRecordEntity>,
    /// Pending follow requests awaiting approval.
    pub requests: Vec<RelationRecordEntity>,
}
