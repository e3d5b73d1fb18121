//! Board domain model: games, columns, and the pure mutation operations
//! applied to them. Every operation takes the previous board by reference and
//! returns the next board value, leaving the input untouched so callers can
//! diff, broadcast, and persist snapshots independently.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a game entry on the board.
pub type GameId = Uuid;

/// Identifier of a board column.
///
/// Default columns use stable slugs so boards created on different devices
/// align during a guest merge; user-created columns get a fresh UUID string.
pub type ColumnId = String;

/// Column slug every fresh board starts its backlog in.
pub const DEFAULT_COLUMN_TO_PLAY: &str = "to_play";
/// Column slug for games currently being played.
pub const DEFAULT_COLUMN_PLAYING: &str = "playing";
/// Column slug for finished games.
pub const DEFAULT_COLUMN_COMPLETED: &str = "completed";

/// A single tracked game and its user-editable metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    /// Stable identifier for the game entry.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Platform label, up to two platform names joined by ", ".
    pub platform: String,
    /// Primary genre label.
    pub genre: String,
    /// Release year ("YYYY"), empty when unknown.
    pub year: String,
    /// Cover art URL when the metadata source provided one.
    pub cover: Option<String>,
    /// Index into the client's placeholder cover set, used when `cover` is absent.
    pub cover_index: u8,
    /// User rating from 0 to 10, 0 meaning unrated.
    pub rating: u8,
    /// Favorite flag toggled from the board.
    pub is_favorite: bool,
}

/// Named, ordered bucket of game references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Stable identifier for the column.
    pub id: ColumnId,
    /// Display title.
    pub title: String,
    /// Symbolic icon name rendered by clients.
    pub icon: String,
    /// Ordered game membership. A game id appears in at most one column.
    pub item_ids: Vec<GameId>,
}

impl Column {
    /// Build a user-created column with a fresh identifier and no games.
    pub fn new(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            icon: icon.into(),
            item_ids: Vec::new(),
        }
    }
}

/// The full persisted state of one identity's tracker. The board is the atomic
/// unit of persistence: it is written and read as a single document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    /// Every tracked game, keyed by id, whether or not a column references it.
    pub games: IndexMap<GameId, Game>,
    /// Columns keyed by id.
    pub columns: IndexMap<ColumnId, Column>,
    /// Display order of the columns; every key of `columns` appears exactly once.
    pub column_order: Vec<ColumnId>,
}

/// Title and icon pair used to seed the default columns of a fresh board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTemplate {
    /// Stable slug identifying the column across devices.
    pub id: ColumnId,
    /// Display title.
    pub title: String,
    /// Symbolic icon name.
    pub icon: String,
}

impl Board {
    /// Build an empty board seeded with the given column templates.
    pub fn with_columns(templates: &[ColumnTemplate]) -> Self {
        let mut columns = IndexMap::new();
        let mut column_order = Vec::with_capacity(templates.len());
        for template in templates {
            columns.insert(
                template.id.clone(),
                Column {
                    id: template.id.clone(),
                    title: template.title.clone(),
                    icon: template.icon.clone(),
                    item_ids: Vec::new(),
                },
            );
            column_order.push(template.id.clone());
        }
        Self {
            games: IndexMap::new(),
            columns,
            column_order,
        }
    }

    /// Insert `game` into the board, prepending its id to `target` when that
    /// column exists, else to the first column in display order. A board with
    /// no columns still records the game (it shows up as an orphan).
    pub fn with_game_added(&self, game: Game, target: Option<&ColumnId>) -> Board {
        let mut next = self.clone();
        let game_id = game.id;
        next.games.insert(game_id, game);

        let column_id = target
            .filter(|id| next.columns.contains_key(*id))
            .cloned()
            .or_else(|| next.column_order.first().cloned());
        if let Some(column_id) = column_id
            && let Some(column) = next.columns.get_mut(&column_id)
        {
            column.item_ids.insert(0, game_id);
        }
        next
    }

    /// Move a game to `dest`, removing it from whichever column currently
    /// holds it and appending it to the destination. No-op when the game is
    /// not referenced by any column, the destination does not exist, or the
    /// source and destination are the same column.
    pub fn with_game_moved(&self, game_id: GameId, dest: &ColumnId) -> Board {
        if !self.columns.contains_key(dest) {
            return self.clone();
        }
        let Some(source) = self.column_of(game_id) else {
            return self.clone();
        };
        if &source == dest {
            return self.clone();
        }

        let mut next = self.clone();
        if let Some(column) = next.columns.get_mut(&source) {
            column.item_ids.retain(|id| *id != game_id);
        }
        if let Some(column) = next.columns.get_mut(dest) {
            column.item_ids.push(game_id);
        }
        next
    }

    /// Remove a game from the board and from whichever column references it.
    /// Deleting an id that is not present leaves the board unchanged.
    pub fn with_game_deleted(&self, game_id: GameId) -> Board {
        let mut next = self.clone();
        next.games.shift_remove(&game_id);
        for column in next.columns.values_mut() {
            column.item_ids.retain(|id| *id != game_id);
        }
        next
    }

    /// Flip the favorite flag of a game; no-op when the id is stale.
    pub fn with_favorite_toggled(&self, game_id: GameId) -> Board {
        let mut next = self.clone();
        if let Some(game) = next.games.get_mut(&game_id) {
            game.is_favorite = !game.is_favorite;
        }
        next
    }

    /// Replace the full record of the game carrying `edited.id`. Editing an id
    /// that no longer exists is a no-op rather than an insert.
    pub fn with_game_edited(&self, edited: Game) -> Board {
        let mut next = self.clone();
        if let Some(slot) = next.games.get_mut(&edited.id) {
            *slot = edited;
        }
        next
    }

    /// Append a new column to the board and its display order.
    pub fn with_column_added(&self, column: Column) -> Board {
        let mut next = self.clone();
        next.column_order.push(column.id.clone());
        next.columns.insert(column.id.clone(), column);
        next
    }

    /// Rename and/or re-icon a column; id and membership stay untouched.
    /// No-op on a stale column id.
    pub fn with_column_edited(
        &self,
        column_id: &ColumnId,
        title: impl Into<String>,
        icon: impl Into<String>,
    ) -> Board {
        let mut next = self.clone();
        if let Some(column) = next.columns.get_mut(column_id) {
            column.title = title.into();
            column.icon = icon.into();
        }
        next
    }

    /// Remove a column from the board and the display order. Games referenced
    /// only by that column are kept in `games` and become orphans; surfacing
    /// them is the caller's job via [`Board::orphaned_games`].
    pub fn with_column_deleted(&self, column_id: &ColumnId) -> Board {
        let mut next = self.clone();
        next.columns.shift_remove(column_id);
        next.column_order.retain(|id| id != column_id);
        next
    }

    /// Id of the first column (in map iteration order) referencing `game_id`.
    pub fn column_of(&self, game_id: GameId) -> Option<ColumnId> {
        self.columns
            .values()
            .find(|column| column.item_ids.contains(&game_id))
            .map(|column| column.id.clone())
    }

    /// Games present in the `games` map but referenced by no column, typically
    /// left behind by a column deletion.
    pub fn orphaned_games(&self) -> Vec<&Game> {
        self.games
            .values()
            .filter(|game| self.column_of(game.id).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str) -> ColumnTemplate {
        ColumnTemplate {
            id: id.to_string(),
            title: id.to_string(),
            icon: "gamepad".into(),
        }
    }

    fn three_column_board() -> Board {
        Board::with_columns(&[
            template(DEFAULT_COLUMN_TO_PLAY),
            template(DEFAULT_COLUMN_PLAYING),
            template(DEFAULT_COLUMN_COMPLETED),
        ])
    }

    fn sample_game(title: &str) -> Game {
        Game {
            id: Uuid::new_v4(),
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

    fn assert_membership_invariant(board: &Board) {
        for column in board.columns.values() {
            for id in &column.item_ids {
                assert!(
                    board.games.contains_key(id),
                    "column `{}` references unknown game `{id}`",
                    column.id
                );
            }
        }
        for id in board.games.keys() {
            let referencing = board
                .columns
                .values()
                .filter(|column| column.item_ids.contains(id))
                .count();
            assert!(
                referencing <= 1,
                "game `{id}` appears in {referencing} columns"
            );
        }
    }

    #[test]
    fn add_game_prepends_to_target_column() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let playing = DEFAULT_COLUMN_PLAYING.to_string();

        let board = board.with_game_added(sample_game("earlier"), Some(&playing));
        let board = board.with_game_added(game, Some(&playing));

        assert_eq!(board.columns[&playing].item_ids.first(), Some(&game_id));
        assert_eq!(board.columns[&playing].item_ids.len(), 2);
        assert_membership_invariant(&board);
    }

    #[test]
    fn add_game_falls_back_to_first_column() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;

        let missing = "nope".to_string();
        let board = board.with_game_added(game, Some(&missing));

        assert_eq!(
            board.columns[DEFAULT_COLUMN_TO_PLAY].item_ids,
            vec![game_id]
        );
    }

    #[test]
    fn add_game_without_columns_keeps_game_as_orphan() {
        let board = Board::default();
        let game = sample_game("Foo");
        let game_id = game.id;

        let board = board.with_game_added(game, None);

        assert!(board.games.contains_key(&game_id));
        assert_eq!(board.orphaned_games().len(), 1);
    }

    #[test]
    fn move_game_appends_to_destination() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();
        let playing = DEFAULT_COLUMN_PLAYING.to_string();

        let board = board.with_game_added(game, Some(&to_play));
        let board = board.with_game_moved(game_id, &playing);

        assert!(board.columns[&to_play].item_ids.is_empty());
        assert_eq!(board.columns[&playing].item_ids, vec![game_id]);
        assert_membership_invariant(&board);
    }

    #[test]
    fn move_game_to_same_column_is_noop() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();

        let board = board.with_game_added(game, Some(&to_play));
        let moved = board.with_game_moved(game_id, &to_play);

        assert_eq!(moved, board);
    }

    #[test]
    fn move_unreferenced_game_is_noop() {
        let board = three_column_board();
        let playing = DEFAULT_COLUMN_PLAYING.to_string();

        let moved = board.with_game_moved(Uuid::new_v4(), &playing);

        assert_eq!(moved, board);
    }

    #[test]
    fn delete_game_removes_map_entry_and_column_reference() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();

        let board = board.with_game_added(game, Some(&to_play));
        let board = board.with_game_deleted(game_id);

        assert!(board.games.is_empty());
        assert!(board.columns[&to_play].item_ids.is_empty());
    }

    #[test]
    fn delete_missing_game_is_idempotent() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let board = board.with_game_added(game, None);

        let deleted = board.with_game_deleted(Uuid::new_v4());

        assert_eq!(deleted, board);
    }

    #[test]
    fn toggle_favorite_flips_flag_and_ignores_stale_ids() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let board = board.with_game_added(game, None);

        let board = board.with_favorite_toggled(game_id);
        assert!(board.games[&game_id].is_favorite);

        let untouched = board.with_favorite_toggled(Uuid::new_v4());
        assert_eq!(untouched, board);
    }

    #[test]
    fn edit_game_replaces_whole_record() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let board = board.with_game_added(game, None);

        let mut edited = board.games[&game_id].clone();
        edited.title = "Bar".into();
        edited.rating = 8;
        let board = board.with_game_edited(edited);

        assert_eq!(board.games[&game_id].title, "Bar");
        assert_eq!(board.games[&game_id].rating, 8);
    }

    #[test]
    fn edit_stale_game_does_not_insert() {
        let board = three_column_board();
        let edited = sample_game("Ghost");

        let board = board.with_game_edited(edited);

        assert!(board.games.is_empty());
    }

    #[test]
    fn delete_column_orphans_its_games_without_losing_them() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let playing = DEFAULT_COLUMN_PLAYING.to_string();

        let board = board.with_game_added(game, Some(&playing));
        let board = board.with_column_deleted(&playing);

        assert!(!board.columns.contains_key(&playing));
        assert!(!board.column_order.contains(&playing));
        assert!(board.games.contains_key(&game_id));
        for column in board.columns.values() {
            assert!(!column.item_ids.contains(&game_id));
        }
        let orphans = board.orphaned_games();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, game_id);
    }

    #[test]
    fn column_order_tracks_additions() {
        let board = three_column_board();
        let column = Column::new("Abandoned", "trash");
        let column_id = column.id.clone();

        let board = board.with_column_added(column);

        assert_eq!(board.column_order.last(), Some(&column_id));
        assert!(board.columns.contains_key(&column_id));
    }

    #[test]
    fn edit_column_keeps_membership() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let game_id = game.id;
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();

        let board = board.with_game_added(game, Some(&to_play));
        let board = board.with_column_edited(&to_play, "Queue", "hourglass");

        assert_eq!(board.columns[&to_play].title, "Queue");
        assert_eq!(board.columns[&to_play].icon, "hourglass");
        assert_eq!(board.columns[&to_play].item_ids, vec![game_id]);
    }

    #[test]
    fn mutations_leave_the_input_board_untouched() {
        let board = three_column_board();
        let game = sample_game("Foo");
        let to_play = DEFAULT_COLUMN_TO_PLAY.to_string();

        let snapshot = board.clone();
        let _ = board.with_game_added(game, Some(&to_play));
        let _ = board.with_column_deleted(&to_play);

        assert_eq!(board, snapshot);
    }
}
