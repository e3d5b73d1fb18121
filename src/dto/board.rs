use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::board::{Board, ColumnId, Game, GameId};

/// Payload adding a game to the board from a metadata search result.
///
/// The nested platform/genre wrappers mirror the search proxy's response so a
/// client can forward a hit verbatim.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddGameRequest {
    /// Game title from the metadata source.
    #[validate(length(min = 1, message = "game name must not be empty"))]
    pub name: String,
    /// Platforms the game was released on.
    #[serde(default)]
    pub platforms: Vec<PlatformInput>,
    /// Genres assigned by the metadata source.
    #[serde(default)]
    pub genres: Vec<GenreInput>,
    /// Release date as "YYYY-MM-DD", when known.
    #[serde(default)]
    pub released: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Column the user had focused; falls back to the first column.
    #[serde(default)]
    pub column_id: Option<ColumnId>,
}

/// Platform wrapper mirroring the search proxy shape.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlatformInput {
    /// The wrapped platform.
    pub platform: NamedInput,
}

/// Genre entry mirroring the search proxy shape.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenreInput {
    /// Genre name.
    pub name: String,
}

/// Generic named object.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NamedInput {
    /// Display name.
    pub name: String,
}

/// Payload moving a game to another column.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveGameRequest {
    /// Destination column.
    pub column_id: ColumnId,
}

/// Whole-record replacement for a game entry; the id comes from the path.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EditGameRequest {
    /// Display title.
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// Platform label.
    pub platform: String,
    /// Genre label.
    pub genre: String,
    /// Release year.
    pub year: String,
    /// Cover art URL.
    pub cover: Option<String>,
    /// Placeholder cover index.
    pub cover_index: u8,
    /// User rating from 0 to 10.
    #[validate(range(max = 10, message = "rating must be between 0 and 10"))]
    pub rating: u8,
    /// Favorite flag.
    pub is_favorite: bool,
}

impl EditGameRequest {
    /// Combine the edited fields with the path id into a full game record.
    pub fn into_game(self, id: GameId) -> Game {
        Game {
            id,
            title: self.title,
            platform: self.platform,
            genre: self.genre,
            year: self.year,
            cover: self.cover,
            cover_index: self.cover_index,
            rating: self.rating,
            is_favorite: self.is_favorite,
        }
    }
}

/// Payload creating a new column.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateColumnRequest {
    /// Display title.
    #[validate(length(min = 1, max = 40, message = "column title must be 1-40 characters"))]
    pub title: String,
    /// Symbolic icon name.
    pub icon: String,
}

/// Payload renaming or re-iconing a column.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EditColumnRequest {
    /// Display title.
    #[validate(length(min = 1, max = 40, message = "column title must be 1-40 characters"))]
    pub title: String,
    /// Symbolic icon name.
    pub icon: String,
}

/// Confirmation payload for the irreversible column deletion.
///
/// Deletion is only permitted when the client has the column explicitly
/// selected as its edit target; a missing or mismatched id is rejected.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteColumnRequest {
    /// Column currently selected for editing on the client.
    #[serde(default)]
    pub editing_column_id: Option<ColumnId>,
}

/// One game entry as rendered on the board.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameDto {
    /// Stable identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Platform label.
    pub platform: String,
    /// Genre label.
    pub genre: String,
    /// Release year.
    pub year: String,
    /// Cover art URL.
    pub cover: Option<String>,
    /// Placeholder cover index.
    pub cover_index: u8,
    /// User rating.
    pub rating: u8,
    /// Favorite flag.
    pub is_favorite: bool,
}

impl From<&Game> for GameDto {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            title: game.title.clone(),
            platform: game.platform.clone(),
            genre: game.genre.clone(),
            year: game.year.clone(),
            cover: game.cover.clone(),
            cover_index: game.cover_index,
            rating: game.rating,
            is_favorite: game.is_favorite,
        }
    }
}

/// One column with its ordered game references.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ColumnDto {
    /// Stable identifier.
    pub id: ColumnId,
    /// Display title.
    pub title: String,
    /// Symbolic icon name.
    pub icon: String,
    /// Ordered game membership.
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub item_ids: Vec<GameId>,
}

/// Full board snapshot sent over the REST API and the SSE feed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoardSnapshot {
    /// Every tracked game.
    pub games: Vec<GameDto>,
    /// Columns in display order.
    pub columns: Vec<ColumnDto>,
    /// Column display order.
    pub column_order: Vec<ColumnId>,
    /// Games referenced by no column (e.g. left behind by a column deletion).
    pub orphans: Vec<GameDto>,
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        let columns = board
            .column_order
            .iter()
            .filter_map(|id| board.columns.get(id))
            .map(|column| ColumnDto {
                id: column.id.clone(),
                title: column.title.clone(),
                icon: column.icon.clone(),
                item_ids: column.item_ids.clone(),
            })
            .collect();

        Self {
            games: board.games.values().map(GameDto::from).collect(),
            columns,
            column_order: board.column_order.clone(),
            orphans: board.orphaned_games().into_iter().map(GameDto::from).collect(),
        }
    }
}
