#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Pushbox.
//!
//! A [`Level`] owns its tile grid, metadata, free-form header lines and
//! notes, and the move log. Collaborators populate it tile by tile, call
//! [`Level::validate`] once, and then drive play either through the inherent
//! move methods or through [`apply`], which reports every outcome as an
//! [`Event`].
//!
//! Tile coordinates are zero-based on both the write path
//! ([`Level::insert_tile`]) and the read path ([`Level::tile`]).

use std::{collections::BTreeMap, fmt};

use pushbox_core::{
    CellCoord, Command, Direction, Event, LevelError, MoveRecord, Rejection, Tile,
};
use tracing::{debug, trace};

mod engine;
mod grid;
mod history;
mod validation;

pub use history::Cursor;

use grid::TileGrid;
use history::MoveLog;
use validation::Verdict;

/// Separator placed between board rows when tiles are streamed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RowLayout {
    /// Every row is terminated by a newline.
    #[default]
    Lines,
    /// Every row is terminated by `|` and the board ends with a single newline.
    Compact,
}

/// A single playable level.
#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    grid: TileGrid,
    metadata: BTreeMap<String, String>,
    headers: Vec<String>,
    notes: Vec<String>,
    log: MoveLog,
    player: Option<CellCoord>,
}

impl Level {
    /// Creates an empty, unvalidated level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            grid: TileGrid::new(),
            metadata: BTreeMap::new(),
            headers: Vec::new(),
            notes: Vec::new(),
            log: MoveLog::new(),
            player: None,
        }
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the display name of the level.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Writes the tile for `symbol` at zero-based `[x][y]`.
    ///
    /// The grid grows as needed so that it stays rectangular; newly exposed
    /// cells are floor. Symbols outside the tile alphabet are refused and the
    /// grid is left unchanged.
    pub fn insert_tile(&mut self, x: u32, y: u32, symbol: char) -> Result<(), LevelError> {
        let tile = Tile::from_symbol(symbol).ok_or(LevelError::InvalidTile { symbol, x, y })?;
        self.grid.insert(x, y, tile);
        Ok(())
    }

    /// Writes each character of `tiles` on row `y`, starting at column zero.
    ///
    /// The whole line is checked first, so an invalid symbol leaves the grid
    /// unchanged.
    pub fn insert_tile_line(&mut self, y: u32, tiles: &str) -> Result<(), LevelError> {
        let parsed = tiles
            .chars()
            .zip(0u32..)
            .map(|(symbol, x)| {
                Tile::from_symbol(symbol)
                    .map(|tile| (x, tile))
                    .ok_or(LevelError::InvalidTile { symbol, x, y })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (x, tile) in parsed {
            self.grid.insert(x, y, tile);
        }
        Ok(())
    }

    /// Tile at the zero-based cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.grid.get(cell)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn size_x(&self) -> u32 {
        self.grid.size_x()
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn size_y(&self) -> u32 {
        self.grid.size_y()
    }

    /// Column-major view of the tiles, indexed `[x][y]`.
    #[must_use]
    pub fn columns(&self) -> &[Vec<Tile>] {
        self.grid.columns()
    }

    /// Streams the board row by row using the requested separator.
    pub fn write_tiles<W: fmt::Write>(&self, out: &mut W, layout: RowLayout) -> fmt::Result {
        let rows = self.grid.size_y() as usize;
        for row in 0..rows {
            for tile in self.grid.row(row) {
                out.write_char(tile.symbol())?;
            }
            out.write_char(match layout {
                RowLayout::Lines => '\n',
                RowLayout::Compact => '|',
            })?;
        }
        if layout == RowLayout::Compact && rows > 0 {
            out.write_char('\n')?;
        }
        Ok(())
    }

    /// Registers a metadata entry. Keys are case-sensitive and unique.
    pub fn add_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), LevelError> {
        let key = key.into();
        if self.metadata.contains_key(&key) {
            return Err(LevelError::DuplicateMetadataKey(key));
        }
        let _ = self.metadata.insert(key, value.into());
        Ok(())
    }

    /// Value stored under `key`.
    pub fn metadata(&self, key: &str) -> Result<&str, LevelError> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LevelError::MetadataKeyNotFound(key.to_owned()))
    }

    /// Iterates metadata entries in key order.
    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Streams every metadata entry as a `key: value` line.
    pub fn write_metadata<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (key, value) in &self.metadata {
            writeln!(out, "{key}: {value}")?;
        }
        Ok(())
    }

    /// Appends a free-form header line kept for round-trip emission.
    pub fn add_header(&mut self, header: impl Into<String>) {
        self.headers.push(header.into());
    }

    /// Removes the first header line equal to `header`, if any.
    pub fn remove_header(&mut self, header: &str) {
        remove_first(&mut self.headers, header);
    }

    /// Header lines in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Streams the header lines verbatim.
    pub fn write_headers<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write_lines(out, &self.headers)
    }

    /// Appends a free-form note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Removes the first note equal to `note`, if any.
    pub fn remove_note(&mut self, note: &str) {
        remove_first(&mut self.notes, note);
    }

    /// Notes in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Streams the notes verbatim.
    pub fn write_notes<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write_lines(out, &self.notes)
    }

    /// Makes the level playable if it holds exactly one player.
    ///
    /// The scan only checks player uniqueness (`@` or `+`); it does not look
    /// at box reachability, wall enclosure or solvability. The verdict is
    /// memoized: once the level is valid, later calls return `true` without
    /// rescanning, even if tiles were inserted in the meantime.
    pub fn validate(&mut self) -> bool {
        matches!(self.run_validation(), Verdict::Unique(_))
    }

    fn run_validation(&mut self) -> Verdict {
        if let Some(player) = self.player {
            return Verdict::Unique(player);
        }

        let verdict = validation::locate_player(&self.grid);
        match verdict {
            Verdict::Unique(player) => {
                debug!(level = %self.name, %player, "level validated");
                self.player = Some(player);
            }
            Verdict::Invalid(players) => {
                debug!(level = %self.name, players, "level failed validation");
            }
        }
        verdict
    }

    /// Whether [`Level::validate`] has succeeded.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.player.is_some()
    }

    /// Cached player position, available once the level is validated.
    #[must_use]
    pub fn player(&self) -> Option<CellCoord> {
        self.player
    }

    /// Moves the player one cell up.
    pub fn move_up(&mut self) -> Result<MoveRecord, Rejection> {
        self.move_player(Direction::Up)
    }

    /// Moves the player one cell down.
    pub fn move_down(&mut self) -> Result<MoveRecord, Rejection> {
        self.move_player(Direction::Down)
    }

    /// Moves the player one cell left.
    pub fn move_left(&mut self) -> Result<MoveRecord, Rejection> {
        self.move_player(Direction::Left)
    }

    /// Moves the player one cell right.
    pub fn move_right(&mut self) -> Result<MoveRecord, Rejection> {
        self.move_player(Direction::Right)
    }

    /// Moves the player one cell, pushing a box if one is in the way.
    ///
    /// A refused move leaves the grid and the log untouched. A successful
    /// move discards any undone moves before it is logged.
    pub fn move_player(&mut self, direction: Direction) -> Result<MoveRecord, Rejection> {
        let player = self.player.ok_or(Rejection::NotValidated)?;
        let step = engine::plan(&self.grid, player, direction)?;
        engine::execute(&mut self.grid, &step);

        let record = step.record();
        self.log.record(record);
        self.player = Some(step.to);
        trace!(%record, from = %step.from, to = %step.to, "player moved");
        Ok(record)
    }

    /// Reverses the most recently applied move.
    pub fn undo(&mut self) -> Result<MoveRecord, Rejection> {
        let player = self.player.ok_or(Rejection::NotValidated)?;
        let record = self.log.current().ok_or(Rejection::NothingToUndo)?;
        let previous = engine::reverse(&mut self.grid, player, record)?;

        self.log.step_back();
        self.player = Some(previous);
        trace!(%record, from = %player, to = %previous, "move undone");
        Ok(record)
    }

    /// Applies the next undone move again.
    ///
    /// The move is re-derived from the grid; it is refused with
    /// [`Rejection::HistoryDiverged`] when the outcome would not match the
    /// logged record.
    pub fn redo(&mut self) -> Result<MoveRecord, Rejection> {
        let player = self.player.ok_or(Rejection::NotValidated)?;
        let record = self.log.upcoming().ok_or(Rejection::NothingToRedo)?;
        let step = engine::plan(&self.grid, player, record.direction())
            .map_err(|_| Rejection::HistoryDiverged)?;
        if step.record() != record {
            return Err(Rejection::HistoryDiverged);
        }
        engine::execute(&mut self.grid, &step);

        self.log.step_forward();
        self.player = Some(step.to);
        trace!(%record, from = %step.from, to = %step.to, "move redone");
        Ok(record)
    }

    /// Position of the undo/redo cursor.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.log.cursor()
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        self.log.applied()
    }

    /// Every logged move, including the redo tail.
    #[must_use]
    pub fn move_log(&self) -> &[MoveRecord] {
        self.log.records()
    }

    /// Applied moves in LURD notation.
    #[must_use]
    pub fn lurd(&self) -> String {
        self.history().iter().map(MoveRecord::letter).collect()
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tiles(f, RowLayout::Lines)
    }
}

fn remove_first(lines: &mut Vec<String>, needle: &str) {
    if let Some(index) = lines.iter().position(|line| line == needle) {
        let _ = lines.remove(index);
    }
}

fn write_lines<W: fmt::Write>(out: &mut W, lines: &[String]) -> fmt::Result {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Applies the provided command to the level, reporting the outcome as events.
pub fn apply(level: &mut Level, command: Command, out_events: &mut Vec<Event>) {
    let from = level.player;
    let outcome = match command {
        Command::Validate => {
            out_events.push(match level.run_validation() {
                Verdict::Unique(player) => Event::LevelValidated { player },
                Verdict::Invalid(players) => Event::ValidationFailed { players },
            });
            return;
        }
        Command::Move { direction } => level.move_player(direction),
        Command::Undo => level.undo(),
        Command::Redo => level.redo(),
    };

    let record = match outcome {
        Ok(record) => record,
        Err(reason) => {
            out_events.push(Event::MoveRejected { command, reason });
            return;
        }
    };

    let (Some(from), Some(to)) = (from, level.player) else {
        return;
    };
    out_events.push(match command {
        Command::Undo => Event::MoveUndone { record, from, to },
        Command::Redo => Event::MoveRedone { record, from, to },
        Command::Move { .. } | Command::Validate => Event::PlayerMoved { record, from, to },
    });
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use pushbox_core::{CellCoord, MoveRecord, Tile};

    use super::Level;

    /// Tile at the zero-based cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(level: &Level, cell: CellCoord) -> Option<Tile> {
        level.tile(cell)
    }

    /// Cached player position, available once the level is validated.
    #[must_use]
    pub fn player(level: &Level) -> Option<CellCoord> {
        level.player
    }

    /// Whether the level accepts moves.
    #[must_use]
    pub fn is_validated(level: &Level) -> bool {
        level.is_validated()
    }

    /// Number of boxes on the grid, on goals or not.
    #[must_use]
    pub fn box_count(level: &Level) -> usize {
        count_tiles(level, Tile::has_box)
    }

    /// Number of goal squares on the grid, occupied or not.
    #[must_use]
    pub fn goal_count(level: &Level) -> usize {
        count_tiles(level, Tile::is_goal)
    }

    /// Whether every box rests on a goal and every goal holds a box.
    #[must_use]
    pub fn is_solved(level: &Level) -> bool {
        box_count(level) > 0
            && level
                .grid
                .cells()
                .all(|(_, tile)| !matches!(tile, Tile::Box | Tile::Goal | Tile::PlayerOnGoal))
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(level: &Level) -> &[MoveRecord] {
        level.history()
    }

    /// Whether an applied move is available to undo.
    #[must_use]
    pub fn can_undo(level: &Level) -> bool {
        level.is_validated() && level.log.current().is_some()
    }

    /// Whether an undone move is available to redo.
    #[must_use]
    pub fn can_redo(level: &Level) -> bool {
        level.is_validated() && level.log.upcoming().is_some()
    }

    /// Number of applied moves.
    #[must_use]
    pub fn move_count(level: &Level) -> usize {
        level.history().len()
    }

    /// Number of applied moves that pushed a box.
    #[must_use]
    pub fn push_count(level: &Level) -> usize {
        level
            .history()
            .iter()
            .filter(|record| record.pushed())
            .count()
    }

    fn count_tiles(level: &Level, predicate: fn(Tile) -> bool) -> usize {
        level
            .grid
            .cells()
            .filter(|(_, tile)| predicate(*tile))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_from(rows: &[&str]) -> Level {
        let mut level = Level::new();
        for (y, row) in (0u32..).zip(rows) {
            level.insert_tile_line(y, row).expect("valid row");
        }
        level
    }

    fn board(level: &Level) -> String {
        let mut out = String::new();
        level
            .write_tiles(&mut out, RowLayout::Lines)
            .expect("string sink");
        out
    }

    #[test]
    fn new_level_is_empty_and_unvalidated() {
        let level = Level::new();
        assert_eq!(level.size_x(), 1);
        assert_eq!(level.size_y(), 0);
        assert!(!level.is_validated());
        assert_eq!(level.cursor(), Cursor::NoHistory);
    }

    #[test]
    fn invalid_symbol_is_refused_without_touching_the_grid() {
        let mut level = level_from(&["#@#"]);
        let before = board(&level);

        assert_eq!(
            level.insert_tile(5, 5, 'x'),
            Err(LevelError::InvalidTile {
                symbol: 'x',
                x: 5,
                y: 5
            })
        );
        assert_eq!(
            level.insert_tile_line(1, "##p##"),
            Err(LevelError::InvalidTile {
                symbol: 'p',
                x: 2,
                y: 1
            })
        );
        assert_eq!(board(&level), before);
        assert_eq!((level.size_x(), level.size_y()), (3, 1));
    }

    #[test]
    fn sizes_track_largest_inserted_coordinate() {
        let mut level = Level::new();
        level.insert_tile(4, 1, '#').expect("valid");
        level.insert_tile(2, 6, '.').expect("valid");
        assert_eq!(level.size_x(), 5);
        assert_eq!(level.size_y(), 7);
        assert_eq!(level.tile(CellCoord::new(0, 0)), Some(Tile::Floor));
        assert_eq!(level.tile(CellCoord::new(5, 0)), None);
        assert_eq!(level.tile(CellCoord::new(0, 7)), None);
    }

    #[test]
    fn reads_and_writes_share_zero_based_coordinates() {
        let mut level = Level::new();
        level.insert_tile(0, 0, '$').expect("valid");
        level.insert_tile(1, 2, '*').expect("valid");
        assert_eq!(level.tile(CellCoord::new(0, 0)), Some(Tile::Box));
        assert_eq!(level.tile(CellCoord::new(1, 2)), Some(Tile::BoxOnGoal));
        assert_eq!(level.columns()[1][2], Tile::BoxOnGoal);
    }

    #[test]
    fn compact_layout_terminates_rows_with_bars() {
        let level = level_from(&["###", "#@#", "###"]);
        let mut out = String::new();
        level
            .write_tiles(&mut out, RowLayout::Compact)
            .expect("string sink");
        assert_eq!(out, "###|#@#|###|\n");
        assert_eq!(level.to_string(), "###\n#@#\n###\n");
    }

    #[test]
    fn floor_alternate_is_written_back_as_space() {
        let level = level_from(&["#_@#"]);
        assert_eq!(board(&level), "# @#\n");
    }

    #[test]
    fn metadata_keys_are_unique_and_case_sensitive() {
        let mut level = Level::new();
        level.add_metadata("Author", "someone").expect("fresh key");
        level.add_metadata("author", "else").expect("distinct key");
        assert_eq!(
            level.add_metadata("Author", "again"),
            Err(LevelError::DuplicateMetadataKey("Author".to_owned()))
        );
        assert_eq!(level.metadata("Author"), Ok("someone"));
        assert_eq!(
            level.metadata("Title"),
            Err(LevelError::MetadataKeyNotFound("Title".to_owned()))
        );

        let mut out = String::new();
        level.write_metadata(&mut out).expect("string sink");
        assert_eq!(out, "Author: someone\nauthor: else\n");
    }

    #[test]
    fn headers_and_notes_remove_first_match_only() {
        let mut level = Level::new();
        level.add_header("; first");
        level.add_header("Title");
        level.add_header("; first");
        level.remove_header("; first");
        assert_eq!(level.headers(), &["Title".to_owned(), "; first".to_owned()]);

        level.add_note("solved in 12");
        level.add_note("hard");
        level.remove_note("missing");
        level.remove_note("solved in 12");
        assert_eq!(level.notes(), &["hard".to_owned()]);

        let mut out = String::new();
        level.write_headers(&mut out).expect("string sink");
        level.write_notes(&mut out).expect("string sink");
        assert_eq!(out, "Title\n; first\nhard\n");
    }

    #[test]
    fn validation_requires_exactly_one_player() {
        assert!(!level_from(&["# . #"]).validate());
        assert!(!level_from(&["#@ @#"]).validate());
        assert!(!level_from(&["#@ +#"]).validate());

        let mut level = level_from(&["# + #"]);
        assert!(level.validate());
        assert_eq!(level.player(), Some(CellCoord::new(2, 0)));
    }

    #[test]
    fn validation_is_memoized_after_success() {
        let mut level = level_from(&["#@ #"]);
        assert!(level.validate());

        level.insert_tile(2, 0, '@').expect("valid");
        assert!(level.validate());
        assert_eq!(level.player(), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn moves_are_ignored_before_validation() {
        let mut level = level_from(&["@ "]);
        assert_eq!(level.move_right(), Err(Rejection::NotValidated));
        assert_eq!(level.undo(), Err(Rejection::NotValidated));
        assert_eq!(level.redo(), Err(Rejection::NotValidated));
        assert_eq!(board(&level), "@ \n");
    }

    #[test]
    fn walking_into_wall_changes_nothing() {
        let mut level = level_from(&["#####", "#@  #", "#####"]);
        assert!(level.validate());
        let before = board(&level);

        assert_eq!(level.move_left(), Err(Rejection::BlockedByWall));
        assert_eq!(level.move_up(), Err(Rejection::BlockedByWall));
        assert_eq!(board(&level), before);
        assert!(level.move_log().is_empty());
        assert_eq!(level.cursor(), Cursor::NoHistory);
    }

    #[test]
    fn pushing_box_onto_goal_and_back() {
        let mut level = level_from(&["@$."]);
        assert!(level.validate());

        assert_eq!(level.move_right(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(board(&level), " @*\n");
        assert_eq!(level.lurd(), "R");

        assert_eq!(level.undo(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(board(&level), "@$.\n");
        assert_eq!(level.cursor(), Cursor::NoHistory);
        assert_eq!(level.undo(), Err(Rejection::NothingToUndo));
    }

    #[test]
    fn pushing_box_off_goal_restores_goal() {
        let mut level = level_from(&["#@*  #"]);
        assert!(level.validate());
        assert_eq!(level.move_right(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(board(&level), "# +$ #\n");
        assert_eq!(level.move_right(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(board(&level), "# .@$#\n");
        assert_eq!(level.move_right(), Err(Rejection::BoxBlocked));
    }

    #[test]
    fn box_against_box_or_wall_does_not_move() {
        let mut level = level_from(&["#@$$ #", "#  $##", "#    #"]);
        assert!(level.validate());
        let before = board(&level);

        assert_eq!(level.move_right(), Err(Rejection::BoxBlocked));
        assert_eq!(level.move_down(), Ok(MoveRecord::walk(Direction::Down)));
        assert_eq!(level.move_right(), Ok(MoveRecord::walk(Direction::Right)));
        assert_eq!(level.move_right(), Err(Rejection::BoxBlocked));
        assert_eq!(level.undo(), Ok(MoveRecord::walk(Direction::Right)));
        assert_eq!(level.undo(), Ok(MoveRecord::walk(Direction::Down)));
        assert_eq!(board(&level), before);
    }

    #[test]
    fn redo_replays_undone_moves() {
        let mut level = level_from(&["######", "#@$ .#", "######"]);
        assert!(level.validate());
        assert!(level.move_right().is_ok());
        assert!(level.move_right().is_ok());
        let after = board(&level);

        assert!(level.undo().is_ok());
        assert!(level.undo().is_ok());
        assert_eq!(level.redo(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(level.redo(), Ok(MoveRecord::push(Direction::Right)));
        assert_eq!(level.redo(), Err(Rejection::NothingToRedo));
        assert_eq!(board(&level), after);
        assert_eq!(level.lurd(), "RR");
    }

    #[test]
    fn new_move_after_undo_discards_redo_tail() {
        let mut level = level_from(&["#####", "#@  #", "#   #", "#####"]);
        assert!(level.validate());
        assert!(level.move_right().is_ok());
        assert!(level.move_right().is_ok());
        assert!(level.undo().is_ok());
        assert!(level.undo().is_ok());

        assert!(level.move_down().is_ok());
        assert_eq!(level.redo(), Err(Rejection::NothingToRedo));
        assert_eq!(level.move_log(), &[MoveRecord::walk(Direction::Down)]);
        assert_eq!(level.cursor(), Cursor::At(0));
    }

    #[test]
    fn redo_refuses_when_grid_diverged() {
        let mut level = level_from(&["#@  #"]);
        assert!(level.validate());
        assert!(level.move_right().is_ok());
        assert!(level.undo().is_ok());

        level.insert_tile(2, 0, '$').expect("valid");
        let before = board(&level);
        assert_eq!(level.redo(), Err(Rejection::HistoryDiverged));
        assert_eq!(board(&level), before);
        assert_eq!(level.cursor(), Cursor::NoHistory);
    }

    #[test]
    fn apply_reports_outcomes_as_events() {
        let mut level = level_from(&["#@$.#"]);
        let mut events = Vec::new();

        apply(
            &mut level,
            Command::Move {
                direction: Direction::Right,
            },
            &mut events,
        );
        apply(&mut level, Command::Validate, &mut events);
        apply(
            &mut level,
            Command::Move {
                direction: Direction::Right,
            },
            &mut events,
        );
        apply(&mut level, Command::Undo, &mut events);
        apply(&mut level, Command::Undo, &mut events);
        apply(&mut level, Command::Redo, &mut events);

        let push = MoveRecord::push(Direction::Right);
        assert_eq!(
            events,
            vec![
                Event::MoveRejected {
                    command: Command::Move {
                        direction: Direction::Right
                    },
                    reason: Rejection::NotValidated,
                },
                Event::LevelValidated {
                    player: CellCoord::new(1, 0)
                },
                Event::PlayerMoved {
                    record: push,
                    from: CellCoord::new(1, 0),
                    to: CellCoord::new(2, 0),
                },
                Event::MoveUndone {
                    record: push,
                    from: CellCoord::new(2, 0),
                    to: CellCoord::new(1, 0),
                },
                Event::MoveRejected {
                    command: Command::Undo,
                    reason: Rejection::NothingToUndo,
                },
                Event::MoveRedone {
                    record: push,
                    from: CellCoord::new(1, 0),
                    to: CellCoord::new(2, 0),
                },
            ]
        );
    }

    #[test]
    fn apply_reports_player_count_on_failed_validation() {
        let mut level = level_from(&["@@@"]);
        let mut events = Vec::new();
        apply(&mut level, Command::Validate, &mut events);
        assert_eq!(events, vec![Event::ValidationFailed { players: 3 }]);
    }

    #[test]
    fn queries_summarise_progress() {
        let mut level = level_from(&["#@$.#"]);
        assert!(level.validate());
        assert!(!query::is_solved(&level));
        assert_eq!(query::box_count(&level), 1);
        assert_eq!(query::goal_count(&level), 1);
        assert!(!query::can_undo(&level));

        assert!(level.move_right().is_ok());
        assert!(query::is_solved(&level));
        assert_eq!(query::move_count(&level), 1);
        assert_eq!(query::push_count(&level), 1);
        assert!(query::can_undo(&level));
        assert!(!query::can_redo(&level));
        assert_eq!(query::history(&level), &[MoveRecord::push(Direction::Right)]);
        assert_eq!(query::player(&level), Some(CellCoord::new(2, 0)));
        assert_eq!(query::tile(&level, CellCoord::new(3, 0)), Some(Tile::BoxOnGoal));
    }
}
