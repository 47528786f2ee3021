#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pushbox engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative level state, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the level executes those commands via
//! its `apply` entry point, and then reports the outcome as [`Event`] values.
//! Moves the game rules refuse are not errors: they surface as a
//! [`Rejection`] and leave the level untouched. Malformed input surfaces as a
//! [`LevelError`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every symbol accepted by the tile alphabet, in canonical order.
pub const TILE_SYMBOLS: [char; 8] = ['#', '@', '+', '$', '*', '.', ' ', '_'];

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable wall, `#`.
    Wall,
    /// Player standing on plain floor, `@`.
    Player,
    /// Player standing on a goal square, `+`.
    PlayerOnGoal,
    /// Box resting on plain floor, `$`.
    Box,
    /// Box resting on a goal square, `*`.
    BoxOnGoal,
    /// Empty goal square, `.`.
    Goal,
    /// Empty floor, written as a space. `_` is accepted as an alternate spelling.
    Floor,
}

impl Tile {
    /// Parses a tile from its textual symbol.
    ///
    /// Both ` ` and `_` map to [`Tile::Floor`]. Any symbol outside
    /// [`TILE_SYMBOLS`] yields `None`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            '@' => Some(Self::Player),
            '+' => Some(Self::PlayerOnGoal),
            '$' => Some(Self::Box),
            '*' => Some(Self::BoxOnGoal),
            '.' => Some(Self::Goal),
            ' ' | '_' => Some(Self::Floor),
            _ => None,
        }
    }

    /// Canonical symbol emitted when the tile is written out.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Player => '@',
            Self::PlayerOnGoal => '+',
            Self::Box => '$',
            Self::BoxOnGoal => '*',
            Self::Goal => '.',
            Self::Floor => ' ',
        }
    }

    /// Reports whether a goal square lies underneath the tile's occupant.
    #[must_use]
    pub const fn is_goal(self) -> bool {
        matches!(self, Self::Goal | Self::PlayerOnGoal | Self::BoxOnGoal)
    }

    /// Reports whether the tile holds a box, on a goal or not.
    #[must_use]
    pub const fn has_box(self) -> bool {
        matches!(self, Self::Box | Self::BoxOnGoal)
    }

    /// Reports whether the tile holds the player, on a goal or not.
    #[must_use]
    pub const fn has_player(self) -> bool {
        matches!(self, Self::Player | Self::PlayerOnGoal)
    }

    /// Reports whether the tile is a wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Tile left behind once the occupant departs: goal or floor.
    #[must_use]
    pub const fn vacated(self) -> Self {
        if self.is_goal() {
            Self::Goal
        } else {
            Self::Floor
        }
    }

    /// Tile produced when the player enters this cell.
    #[must_use]
    pub const fn with_player(self) -> Self {
        if self.is_goal() {
            Self::PlayerOnGoal
        } else {
            Self::Player
        }
    }

    /// Tile produced when a box comes to rest on this cell.
    #[must_use]
    pub const fn with_box(self) -> Self {
        if self.is_goal() {
            Self::BoxOnGoal
        } else {
            Self::Box
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in `u`, `d`, `l`, `r` order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Lowercase move letter used by move logs.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Up => 'u',
            Self::Down => 'd',
            Self::Left => 'l',
            Self::Right => 'r',
        }
    }

    /// Parses a direction from a move letter, ignoring case.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'u' => Some(Self::Up),
            'd' => Some(Self::Down),
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            _ => None,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Location of a single grid cell expressed as zero-based column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (the `x` coordinate).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (the `y` coordinate).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step away in `direction`.
    ///
    /// Returns `None` when the step would leave the coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        Some(Self::new(column?, row?))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Logged move: a direction plus whether a box was pushed.
///
/// The letter form is the direction letter, uppercase when a box moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    direction: Direction,
    pushed: bool,
}

impl MoveRecord {
    /// Creates a record for a plain walk.
    #[must_use]
    pub const fn walk(direction: Direction) -> Self {
        Self {
            direction,
            pushed: false,
        }
    }

    /// Creates a record for a move that pushed a box.
    #[must_use]
    pub const fn push(direction: Direction) -> Self {
        Self {
            direction,
            pushed: true,
        }
    }

    /// Direction the player travelled.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether a box was pushed by the move.
    #[must_use]
    pub const fn pushed(&self) -> bool {
        self.pushed
    }

    /// Letter form of the record: `udlr` for walks, `UDLR` for pushes.
    #[must_use]
    pub const fn letter(&self) -> char {
        let letter = self.direction.letter();
        if self.pushed {
            letter.to_ascii_uppercase()
        } else {
            letter
        }
    }

    /// Parses a record from its letter form.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match Direction::from_letter(letter) {
            Some(direction) => Some(Self {
                direction,
                pushed: letter.is_ascii_uppercase(),
            }),
            None => None,
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Commands that express all permissible level mutations during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Runs the one-shot validation scan that makes the level playable.
    Validate,
    /// Requests that the player walk or push one cell in the direction.
    Move {
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Requests that the most recent applied move be reversed.
    Undo,
    /// Requests that the next undone move be applied again.
    Redo,
}

/// Events reported by the level after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that validation located exactly one player.
    LevelValidated {
        /// Cell the player occupies.
        player: CellCoord,
    },
    /// Reports that validation did not find exactly one player.
    ValidationFailed {
        /// Number of player tiles found by the scan.
        players: usize,
    },
    /// Confirms that the player moved, possibly pushing a box.
    PlayerMoved {
        /// Record appended to the move log.
        record: MoveRecord,
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a logged move was reversed.
    MoveUndone {
        /// Record that was reversed.
        record: MoveRecord,
        /// Cell the player occupied before the undo.
        from: CellCoord,
        /// Cell the player occupies after the undo.
        to: CellCoord,
    },
    /// Confirms that an undone move was applied again.
    MoveRedone {
        /// Record that was applied again.
        record: MoveRecord,
        /// Cell the player occupied before the redo.
        from: CellCoord,
        /// Cell the player occupies after the redo.
        to: CellCoord,
    },
    /// Reports that the rules refused a command; the level is unchanged.
    MoveRejected {
        /// Command that was refused.
        command: Command,
        /// Specific reason the command had no effect.
        reason: Rejection,
    },
}

/// Reasons a move, undo or redo request may have no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The level has not been validated, so play is disabled.
    NotValidated,
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination is a wall.
    BlockedByWall,
    /// The box in the way cannot move: a wall, another box or the grid edge is behind it.
    BoxBlocked,
    /// The move log holds no applied move.
    NothingToUndo,
    /// No undone move is waiting to be applied again.
    NothingToRedo,
    /// The grid no longer matches the logged move, so it cannot be replayed or reversed.
    HistoryDiverged,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotValidated => "level has not been validated",
            Self::OutOfBounds => "destination lies outside the grid",
            Self::BlockedByWall => "destination is a wall",
            Self::BoxBlocked => "box cannot be pushed",
            Self::NothingToUndo => "nothing to undo",
            Self::NothingToRedo => "nothing to redo",
            Self::HistoryDiverged => "grid no longer matches the move log",
        })
    }
}

/// Errors raised when a level is fed malformed data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The symbol is not part of the tile alphabet.
    #[error("symbol {symbol:?} at ({x}, {y}) is not a valid tile")]
    InvalidTile {
        /// Offending symbol.
        symbol: char,
        /// Column the symbol was destined for.
        x: u32,
        /// Row the symbol was destined for.
        y: u32,
    },
    /// A metadata entry with the key already exists.
    #[error("metadata key `{0}` already exists")]
    DuplicateMetadataKey(String),
    /// No metadata entry with the key exists.
    #[error("metadata key `{0}` not found")]
    MetadataKeyNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, MoveRecord, Rejection, Tile, TILE_SYMBOLS};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn every_alphabet_symbol_parses() {
        for symbol in TILE_SYMBOLS {
            assert!(Tile::from_symbol(symbol).is_some(), "{symbol:?} rejected");
        }
        for symbol in ['p', 'P', 'b', 'B', '-', '1', '|', '\t'] {
            assert_eq!(Tile::from_symbol(symbol), None, "{symbol:?} accepted");
        }
    }

    #[test]
    fn floor_alternate_spelling_emits_as_space() {
        assert_eq!(Tile::from_symbol('_'), Some(Tile::Floor));
        assert_eq!(Tile::Floor.symbol(), ' ');
    }

    #[test]
    fn occupants_preserve_goal_underlay() {
        assert_eq!(Tile::Goal.with_player(), Tile::PlayerOnGoal);
        assert_eq!(Tile::Floor.with_player(), Tile::Player);
        assert_eq!(Tile::Goal.with_box(), Tile::BoxOnGoal);
        assert_eq!(Tile::Floor.with_box(), Tile::Box);
        assert_eq!(Tile::BoxOnGoal.vacated(), Tile::Goal);
        assert_eq!(Tile::PlayerOnGoal.vacated(), Tile::Goal);
        assert_eq!(Tile::Box.vacated(), Tile::Floor);
        assert_eq!(Tile::Player.vacated(), Tile::Floor);
    }

    #[test]
    fn step_stops_at_coordinate_origin() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Right), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::Down), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn record_letters_encode_push_flag_as_case() {
        assert_eq!(MoveRecord::walk(Direction::Left).letter(), 'l');
        assert_eq!(MoveRecord::push(Direction::Left).letter(), 'L');
        assert_eq!(MoveRecord::from_letter('U'), Some(MoveRecord::push(Direction::Up)));
        assert_eq!(MoveRecord::from_letter('d'), Some(MoveRecord::walk(Direction::Down)));
        assert_eq!(MoveRecord::from_letter('x'), None);
    }

    #[test]
    fn reversed_direction_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.reversed(), direction);
            assert_eq!(direction.reversed().reversed(), direction);
        }
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::BoxOnGoal);
    }

    #[test]
    fn move_record_round_trips_through_bincode() {
        assert_round_trip(&MoveRecord::push(Direction::Right));
    }

    #[test]
    fn rejection_round_trips_through_bincode() {
        assert_round_trip(&Rejection::BoxBlocked);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
