use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profile visibility chosen by a user in their settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    /// Profile is listed publicly and can be followed immediately.
    Public,
    /// Profile is listed, but follows land in the requests collection first.
    InviteOnly,
    /// Profile is not projected into the public collection at all.
    Private,
}

/// Per-user settings persisted alongside the board document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettingsEntity {
    /// Chosen visibility; `None` until the user picked one.
    pub privacy: Option<Privacy>,
    /// Free-form biography shown on the public profile.
    pub bio: String,
    /// Name shown to other users.
    pub display_name: String,
}

/// Projection of a user's settings into the public profile collection.
///
/// Written only while the user's privacy is not [`Privacy::Private`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PublicProfileEntity {
    /// Identity the profile belongs to.
    pub uid: String,
    /// Name shown to other users.
    pub display_name: String,
    /// Avatar URL, when the auth provider supplied one.
    pub photo_url: Option<String>,
    /// Declared visibility (public or invite-only).
    pub privacy: Privacy,
    /// Free-form biography.
    pub bio: String,
}

/// The four relationship collections mirrored per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Users this user follows (or asked to follow).
    Following,
    /// Users following this user.
    Followers,
    /// Users this user blocked.
    Blocked,
    /// Pending follow requests awaiting this user's approval.
    Requests,
}

impl RelationKind {
    /// Stable collection name used in document paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Following => "following",
            RelationKind::Followers => "followers",
            RelationKind::Blocked => "blocked",
            RelationKind::Requests => "requests",
        }
    }
}

/// Relationship status recorded on a following entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationStatus {
    /// The relationship is active.
    Following,
    /// The follow awaits approval on the target side.
    Pending,
    /// Entry in the blocked collection.
    Blocked,
}

/// One entry inside a relationship collection.
///
/// A relationship between A and B is represented by up to two independent
/// records (A's following entry for B, B's followers entry for A); there is no
/// canonical edge, so the two sides can drift after a partial write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RelationRecordEntity {
    /// The other user's identity.
    pub uid: String,
    /// The other user's display name at the time of the write.
    pub display_name: String,
    /// The other user's avatar at the time of the write.
    pub photo_url: Option<String>,
    /// Relationship status.
    pub status: RelationStatus,
    /// RFC 3339 timestamp of the write.
    pub timestamp: String,
}
