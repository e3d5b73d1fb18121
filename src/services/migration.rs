//! Guest-to-account migration: merging a guest session's locally accumulated
//! board into the claimed account's existing remote board.
//!
//! The merged result is written directly through the store, bypassing the
//! debounce scheduler, so the migration cannot race a pending timer flush.

use tracing::info;

use crate::{
    error::ServiceError,
    state::{SharedState, board::Board},
};

/// Merge a guest board into an existing target board.
///
/// Games merge with guest precedence on id collision. For columns present on
/// both sides, target ordering is kept and guest-only ids are appended,
/// skipping ids already referenced. Guest-only columns are carried over and
/// appended to the display order; target-only columns stay untouched.
pub fn merge_boards(target: &Board, guest: &Board) -> Board {
    let mut merged = target.clone();

    for (id, game) in &guest.games {
        merged.games.insert(*id, game.clone());
    }

    for (column_id, guest_column) in &guest.columns {
        match merged.columns.get_mut(column_id) {
            Some(column) => {
                for id in &guest_column.item_ids {
                    if !column.item_ids.contains(id) {
                        column.item_ids.push(*id);
                    }
                }
            }
            None => {
                merged
                    .columns
                    .insert(column_id.clone(), guest_column.clone());
                merged.column_order.push(column_id.clone());
            }
        }
    }

    if merged.column_order.is_empty() {
        merged.column_order = guest.column_order.clone();
    }

    merged
}

/// Migrate a guest board to the account identified by `uid` and return the
/// board the session should continue with.
///
/// When the account has no remote board yet, the guest snapshot is written
/// unmodified. The write is a one-shot direct write, not a scheduled one.
pub async fn migrate_guest_board(
    state: &SharedState,
    uid: &str,
    guest: Board,
) -> Result<Board, ServiceError> {
    let store = state.require_board_store().await?;

    let existing = store.load_board(uid.to_string()).await?;
    let merged = match existing {
        Some(target) => {
            info!(
                uid = %uid,
                guest_games = guest.games.len(),
                target_games = target.games.len(),
                "merging guest board into existing account board"
            );
            merge_boards(&target, &guest)
        }
        None => {
            info!(uid = %uid, games = guest.games.len(), "claiming account with guest board");
            guest
        }
    };

    store.save_board(uid.to_string(), merged.clone()).await?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::board_store::{BoardStore, memory::MemoryBoardStore};
    use crate::state::AppState;
    use crate::state::board::{Column, ColumnTemplate, Game};

    fn board_with_column(column_id: &str) -> Board {
        Board::with_columns(&[ColumnTemplate {
            id: column_id.to_string(),
            title: column_id.to_string(),
            icon: "stack".into(),
        }])
    }

    fn game(id: Uuid, title: &str) -> Game {
        Game {
            id,
            title: title.into(),
            platform: "PC".into(),
            genre: "RPG".into(),
            year: "2020".into(),
            cover: None,
            cover_index: 0,
            rating: 0,
            is_favorite: false,
        }
    }

    #[test]
    fn merge_appends_guest_ids_after_target_ids_in_shared_columns() {
        let backlog = "backlog".to_string();
        let g1 = Uuid::new_v4();
        let g2 = Uuid::new_v4();

        let guest = board_with_column(&backlog).with_game_added(game(g1, "guest"), Some(&backlog));
        let target = board_with_column(&backlog).with_game_added(game(g2, "target"), Some(&backlog));

        let merged = merge_boards(&target, &guest);

        assert_eq!(merged.games.len(), 2);
        assert_eq!(merged.columns[&backlog].item_ids, vec![g2, g1]);
        assert_eq!(merged.column_order, vec![backlog]);
    }

    #[test]
    fn merge_collision_keeps_guest_game() {
        let backlog = "backlog".to_string();
        let g1 = Uuid::new_v4();

        let guest = board_with_column(&backlog).with_game_added(game(g1, "A"), Some(&backlog));
        let target = board_with_column(&backlog).with_game_added(game(g1, "B"), Some(&backlog));

        let merged = merge_boards(&target, &guest);

        assert_eq!(merged.games[&g1].title, "A");
        assert_eq!(merged.columns[&backlog].item_ids, vec![g1]);
    }

    #[test]
    fn merge_carries_guest_only_columns_over() {
        let backlog = "backlog".to_string();
        let g1 = Uuid::new_v4();

        let mut guest = board_with_column(&backlog);
        let extra = Column::new("Abandoned", "trash");
        let extra_id = extra.id.clone();
        guest = guest.with_column_added(extra);
        guest = guest.with_game_added(game(g1, "guest"), Some(&extra_id));

        let target = board_with_column(&backlog);

        let merged = merge_boards(&target, &guest);

        assert!(merged.columns.contains_key(&extra_id));
        assert_eq!(merged.columns[&extra_id].item_ids, vec![g1]);
        assert_eq!(merged.column_order, vec![backlog, extra_id]);
    }

    #[test]
    fn merge_keeps_target_column_titles() {
        let backlog = "backlog".to_string();
        let guest = board_with_column(&backlog);
        let target = board_with_column(&backlog).with_column_edited(&backlog, "Queue", "hourglass");

        let merged = merge_boards(&target, &guest);

        assert_eq!(merged.columns[&backlog].title, "Queue");
    }

    #[tokio::test]
    async fn migrating_into_empty_account_writes_guest_board_verbatim() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let backlog = "backlog".to_string();
        let guest = board_with_column(&backlog)
            .with_game_added(game(Uuid::new_v4(), "guest"), Some(&backlog));

        let result = migrate_guest_board(&state, "user-1", guest.clone())
            .await
            .unwrap();

        assert_eq!(result, guest);
        let stored = store.load_board("user-1".into()).await.unwrap().unwrap();
        assert_eq!(stored, guest);
    }

    #[tokio::test]
    async fn migrating_merges_with_existing_account_board() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::new();
        state.install_board_store(Arc::new(store.clone())).await;

        let backlog = "backlog".to_string();
        let g1 = Uuid::new_v4();
        let g2 = Uuid::new_v4();
        let target = board_with_column(&backlog).with_game_added(game(g2, "target"), Some(&backlog));
        store
            .save_board("user-1".into(), target)
            .await
            .unwrap();

        let guest = board_with_column(&backlog).with_game_added(game(g1, "guest"), Some(&backlog));
        let result = migrate_guest_board(&state, "user-1", guest).await.unwrap();

        assert_eq!(result.columns[&backlog].item_ids, vec![g2, g1]);
        let stored = store.load_board("user-1".into()).await.unwrap().unwrap();
        assert_eq!(stored, result);
    }

    #[tokio::test]
    async fn migrating_without_storage_fails_with_degraded() {
        let state = AppState::new(AppConfig::default());
        let guest = board_with_column("backlog");

        let err = migrate_guest_board(&state, "user-1", guest)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Degraded));
    }
}
