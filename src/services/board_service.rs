//! Board operations: the single entry point applying pure mutations to a
//! session's board, broadcasting the result, and scheduling a save.

use uuid::Uuid;

use crate::{
    dto::board::{
        AddGameRequest, CreateColumnRequest, DeleteColumnRequest, EditColumnRequest,
        EditGameRequest, MoveGameRequest,
    },
    error::ServiceError,
    state::{
        SharedState,
        board::{Board, Column, ColumnId, Game, GameId},
        session::SessionState,
    },
};

/// Build a game record from a forwarded search hit.
///
/// Up to the first two platform names are joined with ", ", the first genre is
/// kept, and the year is the leading "YYYY" of the release date.
pub fn game_from_request(request: &AddGameRequest) -> Game {
    let platform = request
        .platforms
        .iter()
        .take(2)
        .map(|entry| entry.platform.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let genre = request
        .genres
        .first()
        .map(|entry| entry.name.clone())
        .unwrap_or_default();
    let year = request
        .released
        .as_deref()
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_default();

    Game {
        id: Uuid::new_v4(),
        title: request.name.clone(),
        platform,
        genre,
        year,
        cover: request.background_image.clone(),
        cover_index: 0,
        rating: 0,
        is_favorite: false,
    }
}

/// Add a game to the session's board, prepending it to the focused column.
pub async fn add_game(session: &SessionState, request: AddGameRequest) -> Board {
    let game = game_from_request(&request);
    let board = session.board().await;
    let next = board.with_game_added(game, request.column_id.as_ref());
    session.publish(next.clone()).await;
    next
}

/// Move a game to another column. Stale ids and unknown destinations leave
/// the board untouched rather than failing.
pub async fn move_game(session: &SessionState, game_id: GameId, request: MoveGameRequest) -> Board {
    let board = session.board().await;
    let next = board.with_game_moved(game_id, &request.column_id);
    publish_if_changed(session, board, next).await
}

/// Delete a game; idempotent on unknown ids.
pub async fn delete_game(session: &SessionState, game_id: GameId) -> Board {
    let board = session.board().await;
    let next = board.with_game_deleted(game_id);
    publish_if_changed(session, board, next).await
}

/// Flip a game's favorite flag.
pub async fn toggle_favorite(session: &SessionState, game_id: GameId) -> Board {
    let board = session.board().await;
    let next = board.with_favorite_toggled(game_id);
    publish_if_changed(session, board, next).await
}

/// Replace a game's record with an edited copy. Editing a game that no longer
/// exists is a no-op rather than an insert.
pub async fn edit_game(
    session: &SessionState,
    game_id: GameId,
    request: EditGameRequest,
) -> Board {
    let board = session.board().await;
    let next = board.with_game_edited(request.into_game(game_id));
    publish_if_changed(session, board, next).await
}

/// Create a new column, enforcing the configured column cap.
pub async fn create_column(
    state: &SharedState,
    session: &SessionState,
    request: CreateColumnRequest,
) -> Result<Board, ServiceError> {
    let board = session.board().await;
    let cap = state.config().max_columns;
    if board.column_order.len() >= cap {
        return Err(ServiceError::InvalidState(format!(
            "board already holds the maximum of {cap} columns"
        )));
    }

    let next = board.with_column_added(Column::new(request.title, request.icon));
    session.publish(next.clone()).await;
    Ok(next)
}

/// Rename or re-icon a column.
pub async fn edit_column(
    session: &SessionState,
    column_id: ColumnId,
    request: EditColumnRequest,
) -> Result<Board, ServiceError> {
    let board = session.board().await;
    if !board.columns.contains_key(&column_id) {
        return Err(ServiceError::NotFound(format!("column {column_id}")));
    }

    let next = board.with_column_edited(&column_id, request.title, request.icon);
    session.publish(next.clone()).await;
    Ok(next)
}

/// Delete a column. The request must carry the column as the client's current
/// edit target; deletion is irreversible and its games become orphans.
pub async fn delete_column(
    session: &SessionState,
    column_id: ColumnId,
    request: DeleteColumnRequest,
) -> Result<Board, ServiceError> {
    if request.editing_column_id.as_ref() != Some(&column_id) {
        return Err(ServiceError::InvalidState(
            "column must be selected for editing before it can be deleted".into(),
        ));
    }

    let board = session.board().await;
    if !board.columns.contains_key(&column_id) {
        return Err(ServiceError::NotFound(format!("column {column_id}")));
    }

    let next = board.with_column_deleted(&column_id);
    session.publish(next.clone()).await;
    Ok(next)
}

/// Publish only when the operation actually changed something, so defensive
/// no-ops do not schedule pointless remote writes.
async fn publish_if_changed(session: &SessionState, previous: Board, next: Board) -> Board {
    if next != previous {
        session.publish(next.clone()).await;
    }
    next
}
