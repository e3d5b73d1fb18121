//! User settings and the derived public profile projection.
//!
//! Settings are the private source of truth; a profile document is projected
//! into the public collection only while the chosen privacy is public or
//! invite-only, and withdrawn otherwise.

use tracing::info;

use crate::{
    dao::models::{Privacy, PublicProfileEntity, UserSettingsEntity},
    dto::profile::UpdateSettingsRequest,
    error::ServiceError,
    state::SharedState,
};

/// Fetch a user's settings, defaulting to an empty record for new accounts.
pub async fn get_settings(
    state: &SharedState,
    uid: &str,
) -> Result<UserSettingsEntity, ServiceError> {
    let store = state.require_board_store().await?;
    let settings = store.load_settings(uid.to_string()).await?;
    Ok(settings.unwrap_or(UserSettingsEntity {
        privacy: None,
        bio: String::new(),
        display_name: String::new(),
    }))
}

/// Persist a user's settings and refresh the public profile projection.
pub async fn update_settings(
    state: &SharedState,
    uid: &str,
    request: UpdateSettingsRequest,
) -> Result<UserSettingsEntity, ServiceError> {
    let store = state.require_board_store().await?;

    let settings = UserSettingsEntity {
        privacy: request.privacy,
        bio: request.bio,
        display_name: request.display_name,
    };
    store
        .save_settings(uid.to_string(), settings.clone())
        .await?;

    match settings.privacy {
        Some(privacy @ (Privacy::Public | Privacy::InviteOnly)) => {
            let profile = PublicProfileEntity {
                uid: uid.to_string(),
                display_name: settings.display_name.clone(),
                photo_url: request.photo_url,
                privacy,
                bio: settings.bio.clone(),
            };
            store.put_public_profile(profile).await?;
            info!(uid = %uid, privacy = ?privacy, "public profile projected");
        }
        Some(Privacy::Private) | None => {
            store.delete_public_profile(uid.to_string()).await?;
            info!(uid = %uid, "public profile withdrawn");
        }
    }

    Ok(settings)
}

/// Search listed profiles by case-insensitive substring on the display name.
///
/// Only fully public profiles are returned; invite-only profiles are listed
/// for direct follows but hidden from search.
pub async fn search_profiles(
    state: &SharedState,
    query: &str,
) -> Result<Vec<PublicProfileEntity>, ServiceError> {
    let store = state.require_board_store().await?;
    let needle = query.to_lowercase();

    let mut profiles: Vec<_> = store
        .list_public_profiles()
        .await?
        .into_iter()
        .filter(|profile| profile.privacy == Privacy::Public)
        .filter(|profile| profile.display_name.to_lowercase().contains(&needle))
        .collect();
    profiles.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::board_store::{BoardStore, memory::MemoryBoardStore};
    use crate::state::AppState;

    async fn profile_state() -> (SharedState, MemoryBoardStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn settings_request(
        display_name: &str,
        privacy: Option<Privacy>,
    ) -> UpdateSettingsRequest {
        UpdateSettingsRequest {
            privacy,
            bio: "hi".into(),
            display_name: display_name.into(),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn new_accounts_get_empty_settings() {
        let (state, _store) = profile_state().await;

        let settings = get_settings(&state, "alice").await.unwrap();

        assert_eq!(settings.privacy, None);
        assert!(settings.display_name.is_empty());
    }

    #[tokio::test]
    async fn public_privacy_projects_a_profile() {
        let (state, store) = profile_state().await;

        update_settings(&state, "alice", settings_request("Alice", Some(Privacy::Public)))
            .await
            .unwrap();

        let profile = store
            .get_public_profile("alice".into())
            .await
            .unwrap()
            .expect("projected profile");
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.privacy, Privacy::Public);
    }

    #[tokio::test]
    async fn switching_to_private_withdraws_the_profile() {
        let (state, store) = profile_state().await;

        update_settings(&state, "alice", settings_request("Alice", Some(Privacy::Public)))
            .await
            .unwrap();
        update_settings(
            &state,
            "alice",
            settings_request("Alice", Some(Privacy::Private)),
        )
        .await
        .unwrap();

        assert!(
            store
                .get_public_profile("alice".into())
                .await
                .unwrap()
                .is_none()
        );
        let settings = get_settings(&state, "alice").await.unwrap();
        assert_eq!(settings.privacy, Some(Privacy::Private));
    }

    #[tokio::test]
    async fn search_matches_substring_case_insensitively() {
        let (state, _store) = profile_state().await;

        update_settings(&state, "alice", settings_request("Alice", Some(Privacy::Public)))
            .await
            .unwrap();
        update_settings(&state, "bob", settings_request("Bob", Some(Privacy::Public)))
            .await
            .unwrap();
        update_settings(
            &state,
            "carol",
            settings_request("Alicia", Some(Privacy::InviteOnly)),
        )
        .await
        .unwrap();

        let results = search_profiles(&state, "ali").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uid, "alice");
    }
}
