//! Relationship mutations across the four per-user collections.
//!
//! A follow or block touches two users' collections with sequential,
//! independent writes: the first failure aborts the sequence and leaves the
//! earlier writes applied, with no compensating rollback. Callers receive a
//! uniform acknowledgement either way.

use tracing::{info, warn};

use crate::{
    dao::{
        board_store::BoardStore,
        models::{Privacy, RelationKind, RelationRecordEntity, RelationStatus},
    },
    dto::{
        now_rfc3339,
        social::{BlockRequest, FollowRequest, RelationshipsResponse, TargetRequest},
    },
    error::ServiceError,
    state::SharedState,
};

/// Follow a target profile.
///
/// Invite-only targets receive a pending request instead of an immediate
/// follower entry. Follows are refused in either direction of a block.
pub async fn follow(
    state: &SharedState,
    caller_uid: &str,
    request: FollowRequest,
) -> Result<(), ServiceError> {
    if request.uid == caller_uid {
        return Err(ServiceError::InvalidInput("cannot follow yourself".into()));
    }

    let store = state.require_board_store().await?;
    ensure_not_blocked(store.as_ref(), caller_uid, &request.uid).await?;

    let (status, target_kind) = match request.privacy {
        Privacy::InviteOnly => (RelationStatus::Pending, RelationKind::Requests),
        Privacy::Public | Privacy::Private => (RelationStatus::Following, RelationKind::Followers),
    };
    let timestamp = now_rfc3339();

    let following = RelationRecordEntity {
        uid: request.uid.clone(),
        display_name: request.display_name,
        photo_url: request.photo_url,
        status,
        timestamp: timestamp.clone(),
    };
    write_relation(store.as_ref(), caller_uid, RelationKind::Following, following).await?;

    let caller = caller_card(store.as_ref(), caller_uid).await?;
    let mirrored = RelationRecordEntity {
        uid: caller_uid.to_string(),
        display_name: caller.0,
        photo_url: caller.1,
        status,
        timestamp,
    };
    write_relation(store.as_ref(), &request.uid, target_kind, mirrored).await?;

    info!(caller = %caller_uid, target = %request.uid, status = ?status, "follow recorded");
    Ok(())
}

/// Remove the caller's following entry and the target's followers entry.
pub async fn unfollow(
    state: &SharedState,
    caller_uid: &str,
    request: TargetRequest,
) -> Result<(), ServiceError> {
    let store = state.require_board_store().await?;

    delete_relation(store.as_ref(), caller_uid, RelationKind::Following, &request.uid).await?;
    delete_relation(store.as_ref(), &request.uid, RelationKind::Followers, caller_uid).await?;

    info!(caller = %caller_uid, target = %request.uid, "unfollow recorded");
    Ok(())
}

/// Block a target and sever the relationship in both directions.
pub async fn block(
    state: &SharedState,
    caller_uid: &str,
    request: BlockRequest,
) -> Result<(), ServiceError> {
    if request.uid == caller_uid {
        return Err(ServiceError::InvalidInput("cannot block yourself".into()));
    }

    let store = state.require_board_store().await?;
    let record = RelationRecordEntity {
        uid: request.uid.clone(),
        display_name: request.display_name,
        photo_url: request.photo_url,
        status: RelationStatus::Blocked,
        timestamp: now_rfc3339(),
    };
    write_relation(store.as_ref(), caller_uid, RelationKind::Blocked, record).await?;

    // Sever every cross-reference between the two users, pending requests
    // included. Each delete is independent; a failure aborts the rest.
    let severed: [(&str, RelationKind, &str); 6] = [
        (caller_uid, RelationKind::Following, &request.uid),
        (caller_uid, RelationKind::Followers, &request.uid),
        (caller_uid, RelationKind::Requests, &request.uid),
        (&request.uid, RelationKind::Following, caller_uid),
        (&request.uid, RelationKind::Followers, caller_uid),
        (&request.uid, RelationKind::Requests, caller_uid),
    ];
    for (owner, kind, uid) in severed {
        delete_relation(store.as_ref(), owner, kind, uid).await?;
    }

    info!(caller = %caller_uid, target = %request.uid, "block recorded");
    Ok(())
}

/// Delete only the caller's blocked entry; no prior relationship is restored.
pub async fn unblock(
    state: &SharedState,
    caller_uid: &str,
    request: TargetRequest,
) -> Result<(), ServiceError> {
    let store = state.require_board_store().await?;
    delete_relation(store.as_ref(), caller_uid, RelationKind::Blocked, &request.uid).await?;
    info!(caller = %caller_uid, target = %request.uid, "unblock recorded");
    Ok(())
}

/// Fetch all four relationship collections of the caller.
pub async fn relationships(
    state: &SharedState,
    caller_uid: &str,
) -> Result<RelationshipsResponse, ServiceError> {
    let store = state.require_board_store().await?;
    let owner = caller_uid.to_string();

    Ok(RelationshipsResponse {
        following: store
            .list_relations(owner.clone(), RelationKind::Following)
            .await?,
        followers: store
            .list_relations(owner.clone(), RelationKind::Followers)
            .await?,
        blocked: store
            .list_relations(owner.clone(), RelationKind::Blocked)
            .await?,
        requests: store.list_relations(owner, RelationKind::Requests).await?,
    })
}

/// Refuse the follow when either side has blocked the other.
async fn ensure_not_blocked(
    store: &dyn BoardStore,
    caller_uid: &str,
    target_uid: &str,
) -> Result<(), ServiceError> {
    let caller_blocked = store
        .get_relation(
            caller_uid.to_string(),
            RelationKind::Blocked,
            target_uid.to_string(),
        )
        .await?;
    if caller_blocked.is_some() {
        return Err(ServiceError::InvalidState(
            "target is on your blocked list".into(),
        ));
    }

    let target_blocked = store
        .get_relation(
            target_uid.to_string(),
            RelationKind::Blocked,
            caller_uid.to_string(),
        )
        .await?;
    if target_blocked.is_some() {
        return Err(ServiceError::InvalidState(
            "you are blocked by this user".into(),
        ));
    }

    Ok(())
}

/// Display name and avatar to mirror into the target's collection, taken from
/// the caller's public profile when present, else their settings.
async fn caller_card(
    store: &dyn BoardStore,
    caller_uid: &str,
) -> Result<(String, Option<String>), ServiceError> {
    if let Some(profile) = store.get_public_profile(caller_uid.to_string()).await? {
        return Ok((profile.display_name, profile.photo_url));
    }
    if let Some(settings) = store.load_settings(caller_uid.to_string()).await? {
        return Ok((settings.display_name, None));
    }
    Ok((caller_uid.to_string(), None))
}

async fn write_relation(
    store: &dyn BoardStore,
    owner: &str,
    kind: RelationKind,
    record: RelationRecordEntity,
) -> Result<(), ServiceError> {
    store
        .put_relation(owner.to_string(), kind, record)
        .await
        .map_err(|err| {
            warn!(owner = %owner, kind = kind.as_str(), error = %err, "relation write failed");
            ServiceError::from(err)
        })
}

async fn delete_relation(
    store: &dyn BoardStore,
    owner: &str,
    kind: RelationKind,
    uid: &str,
) -> Result<(), ServiceError> {
    store
        .delete_relation(owner.to_string(), kind, uid.to_string())
        .await
        .map_err(|err| {
            warn!(owner = %owner, kind = kind.as_str(), error = %err, "relation delete failed");
            ServiceError::from(err)
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::board_store::memory::MemoryBoardStore;
    use crate::state::AppState;

    async fn social_state() -> (SharedState, MemoryBoardStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn follow_request(uid: &str, privacy: Privacy) -> FollowRequest {
        FollowRequest {
            uid: uid.into(),
            display_name: format!("{uid} name"),
            photo_url: None,
            privacy,
        }
    }

    async fn relation(
        store: &MemoryBoardStore,
        owner: &str,
        kind: RelationKind,
        uid: &str,
    ) -> Option<RelationRecordEntity> {
        store
            .get_relation(owner.to_string(), kind, uid.to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn following_a_public_profile_mirrors_a_followers_entry() {
        let (state, store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap();

        let following = relation(&store, "alice", RelationKind::Following, "bob")
            .await
            .expect("following entry");
        assert_eq!(following.status, RelationStatus::Following);

        let follower = relation(&store, "bob", RelationKind::Followers, "alice")
            .await
            .expect("followers entry");
        assert_eq!(follower.status, RelationStatus::Following);
        assert!(
            relation(&store, "bob", RelationKind::Requests, "alice")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn following_an_invite_only_profile_lands_in_requests() {
        let (state, store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::InviteOnly))
            .await
            .unwrap();

        let following = relation(&store, "alice", RelationKind::Following, "bob")
            .await
            .expect("following entry");
        assert_eq!(following.status, RelationStatus::Pending);

        let request = relation(&store, "bob", RelationKind::Requests, "alice")
            .await
            .expect("requests entry");
        assert_eq!(request.status, RelationStatus::Pending);
        assert!(
            relation(&store, "bob", RelationKind::Followers, "alice")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn self_follow_is_rejected() {
        let (state, _store) = social_state().await;

        let err = follow(&state, "alice", follow_request("alice", Privacy::Public))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn follow_is_refused_when_target_blocked_the_caller() {
        let (state, _store) = social_state().await;

        block(
            &state,
            "bob",
            BlockRequest {
                uid: "alice".into(),
                display_name: "Alice".into(),
                photo_url: None,
            },
        )
        .await
        .unwrap();

        let err = follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn failed_mirror_write_keeps_the_earlier_following_entry() {
        let (state, store) = social_state().await;
        // The caller's write lands; the target's mirror write finds the
        // backend gone.
        store.fail_writes_after(1);

        let err = follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable(_)));

        // No compensating rollback: the half-applied state stays.
        assert!(
            relation(&store, "alice", RelationKind::Following, "bob")
                .await
                .is_some()
        );
        assert!(
            relation(&store, "bob", RelationKind::Followers, "alice")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn blocking_severs_the_relationship_in_both_directions() {
        let (state, store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap();
        follow(&state, "bob", follow_request("alice", Privacy::Public))
            .await
            .unwrap();

        block(
            &state,
            "alice",
            BlockRequest {
                uid: "bob".into(),
                display_name: "Bob".into(),
                photo_url: None,
            },
        )
        .await
        .unwrap();

        let blocked = relation(&store, "alice", RelationKind::Blocked, "bob")
            .await
            .expect("blocked entry");
        assert_eq!(blocked.status, RelationStatus::Blocked);

        assert!(
            relation(&store, "alice", RelationKind::Following, "bob")
                .await
                .is_none()
        );
        assert!(
            relation(&store, "alice", RelationKind::Followers, "bob")
                .await
                .is_none()
        );
        assert!(
            relation(&store, "bob", RelationKind::Following, "alice")
                .await
                .is_none()
        );
        assert!(
            relation(&store, "bob", RelationKind::Followers, "alice")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn unblock_does_not_restore_prior_relationships() {
        let (state, store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap();
        block(
            &state,
            "alice",
            BlockRequest {
                uid: "bob".into(),
                display_name: "Bob".into(),
                photo_url: None,
            },
        )
        .await
        .unwrap();
        unblock(&state, "alice", TargetRequest { uid: "bob".into() })
            .await
            .unwrap();

        assert!(
            relation(&store, "alice", RelationKind::Blocked, "bob")
                .await
                .is_none()
        );
        assert!(
            relation(&store, "alice", RelationKind::Following, "bob")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn unfollow_removes_both_sides() {
        let (state, store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap();
        unfollow(&state, "alice", TargetRequest { uid: "bob".into() })
            .await
            .unwrap();

        assert!(
            relation(&store, "alice", RelationKind::Following, "bob")
                .await
                .is_none()
        );
        assert!(
            relation(&store, "bob", RelationKind::Followers, "alice")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn relationships_lists_all_four_collections() {
        let (state, _store) = social_state().await;

        follow(&state, "alice", follow_request("bob", Privacy::Public))
            .await
            .unwrap();
        follow(&state, "carol", follow_request("alice", Privacy::Public))
            .await
            .unwrap();

        let response = relationships(&state, "alice").await.unwrap();

        assert_eq!(response.following.len(), 1);
        assert_eq!(response.followers.len(), 1);
        assert!(response.blocked.is_empty());
        assert!(response.requests.is_empty());
    }
}
