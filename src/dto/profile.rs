use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{Privacy, PublicProfileEntity, UserSettingsEntity};

/// Payload updating the caller's settings.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    /// Chosen visibility; omitted keeps the profile unlisted.
    #[serde(default)]
    pub privacy: Option<Privacy>,
    /// Free-form biography.
    #[validate(length(max = 500, message = "bio must be at most 500 characters"))]
    #[serde(default)]
    pub bio: String,
    /// Name shown to other users.
    #[validate(length(min = 1, max = 60, message = "display name must be 1-60 characters"))]
    pub display_name: String,
    /// Avatar URL from the auth provider, forwarded into the projection.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Current settings of a user.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    /// Chosen visibility.
    pub privacy: Option<Privacy>,
    /// Free-form biography.
    pub bio: String,
    /// Name shown to other users.
    pub display_name: String,
}

impl From<UserSettingsEntity> for SettingsResponse {
    fn from(settings: UserSettingsEntity) -> Self {
        Self {
            privacy: settings.privacy,
            bio: settings.bio,
            display_name: settings.display_name,
        }
    }
}

/// Result of a public profile search.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileSearchResponse {
    /// Profiles whose display name matched the query.
    pub results: Vec<PublicProfileEntity>,
}
