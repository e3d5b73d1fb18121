use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::board::{
        AddGameRequest, BoardSnapshot, CreateColumnRequest, DeleteColumnRequest,
        EditColumnRequest, EditGameRequest, MoveGameRequest,
    },
    error::AppError,
    services::{board_service, session_service},
    state::{SharedState, board::ColumnId},
};

/// Routes applying board mutations to one session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/board", get(get_board))
        .route("/sessions/{id}/board/games", post(add_game))
        .route(
            "/sessions/{id}/board/games/{game_id}",
            put(edit_game).delete(delete_game),
        )
        .route("/sessions/{id}/board/games/{game_id}/move", post(move_game))
        .route(
            "/sessions/{id}/board/games/{game_id}/favorite",
            post(toggle_favorite),
        )
        .route("/sessions/{id}/board/columns", post(create_column))
        .route(
            "/sessions/{id}/board/columns/{column_id}",
            put(edit_column).delete(delete_column),
        )
}

/// Snapshot of the session's current board.
#[utoipa::path(
    get,
    path = "/sessions/{id}/board",
    tag = "board",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Current board", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_board(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let board = session.board().await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Add a game from a forwarded search hit (or a manual entry in the same shape).
#[utoipa::path(
    post,
    path = "/sessions/{id}/board/games",
    tag = "board",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = AddGameRequest,
    responses(
        (status = 200, description = "Board with the game added", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn add_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddGameRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let board = board_service::add_game(&session, payload).await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Move a game to another column.
#[utoipa::path(
    post,
    path = "/sessions/{id}/board/games/{game_id}/move",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("game_id" = Uuid, Path, description = "Game to move")
    ),
    request_body = MoveGameRequest,
    responses(
        (status = 200, description = "Board after the move", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn move_game(
    State(state): State<SharedState>,
    Path((id, game_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MoveGameRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let board = board_service::move_game(&session, game_id, payload).await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Replace a game's record with an edited copy.
#[utoipa::path(
    put,
    path = "/sessions/{id}/board/games/{game_id}",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("game_id" = Uuid, Path, description = "Game to edit")
    ),
    request_body = EditGameRequest,
    responses(
        (status = 200, description = "Board after the edit", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn edit_game(
    State(state): State<SharedState>,
    Path((id, game_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EditGameRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let board = board_service::edit_game(&session, game_id, payload).await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Delete a game from the board.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/board/games/{game_id}",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("game_id" = Uuid, Path, description = "Game to delete")
    ),
    responses(
        (status = 200, description = "Board after the deletion", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path((id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let board = board_service::delete_game(&session, game_id).await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Flip a game's favorite flag.
#[utoipa::path(
    post,
    path = "/sessions/{id}/board/games/{game_id}/favorite",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("game_id" = Uuid, Path, description = "Game to toggle")
    ),
    responses(
        (status = 200, description = "Board after the toggle", body = BoardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn toggle_favorite(
    State(state): State<SharedState>,
    Path((id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let board = board_service::toggle_favorite(&session, game_id).await;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Create a new column, subject to the configured cap.
#[utoipa::path(
    post,
    path = "/sessions/{id}/board/columns",
    tag = "board",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = CreateColumnRequest,
    responses(
        (status = 200, description = "Board with the new column", body = BoardSnapshot),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Column cap reached")
    )
)]
pub async fn create_column(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateColumnRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let board = board_service::create_column(&state, &session, payload).await?;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Rename or re-icon a column.
#[utoipa::path(
    put,
    path = "/sessions/{id}/board/columns/{column_id}",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("column_id" = String, Path, description = "Column to edit")
    ),
    request_body = EditColumnRequest,
    responses(
        (status = 200, description = "Board after the edit", body = BoardSnapshot),
        (status = 404, description = "Unknown session or column")
    )
)]
pub async fn edit_column(
    State(state): State<SharedState>,
    Path((id, column_id)): Path<(Uuid, ColumnId)>,
    Json(payload): Json<EditColumnRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    payload.validate()?;
    let session = session_service::require_session(&state, id)?;
    let board = board_service::edit_column(&session, column_id, payload).await?;
    Ok(Json(BoardSnapshot::from(&board)))
}

/// Delete a column; its games become orphans and stay on the board snapshot.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/board/columns/{column_id}",
    tag = "board",
    params(
        ("id" = Uuid, Path, description = "Session identifier"),
        ("column_id" = String, Path, description = "Column to delete")
    ),
    request_body = DeleteColumnRequest,
    responses(
        (status = 200, description = "Board after the deletion", body = BoardSnapshot),
        (status = 404, description = "Unknown session or column"),
        (status = 409, description = "Column is not the client's edit target")
    )
)]
pub async fn delete_column(
    State(state): State<SharedState>,
    Path((id, column_id)): Path<(Uuid, ColumnId)>,
    Json(payload): Json<DeleteColumnRequest>,
) -> Result<Json<BoardSnapshot>, AppError> {
    let session = session_service::require_session(&state, id)?;
    let board = board_service::delete_column(&session, column_id, payload).await?;
    Ok(Json(BoardSnapshot::from(&board)))
}
