#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure replay system that converts LURD move strings into commands and
//! records level events back into LURD strings.

use std::collections::VecDeque;

use pushbox_core::{Command, Direction, Event, Rejection};

/// Errors raised while parsing a move string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// A character that is neither a move letter, a digit nor whitespace.
    #[error("unexpected {symbol:?} at position {position} in move string")]
    UnknownMove {
        /// Offending character.
        symbol: char,
        /// Character index within the move string.
        position: usize,
    },
    /// A run-length count that is not followed by a move letter.
    #[error("count at position {position} is not followed by a move")]
    DanglingCount {
        /// Character index where the count started.
        position: usize,
    },
    /// A run-length count too large to expand.
    #[error("count at position {position} is too large")]
    CountOverflow {
        /// Character index where the count started.
        position: usize,
    },
}

/// Upper bound on a single run-length count.
const MAX_RUN: usize = 1 << 16;

/// Parses LURD notation into move commands.
///
/// Letters are case-insensitive, whitespace is ignored and a decimal prefix
/// repeats the following move (`3r` is `rrr`).
pub fn parse_moves(text: &str) -> Result<Vec<Command>, ReplayError> {
    let mut commands = Vec::new();
    let mut count: Option<(usize, usize)> = None;

    for (position, symbol) in text.chars().enumerate() {
        if symbol.is_whitespace() {
            continue;
        }

        if let Some(digit) = symbol.to_digit(10) {
            let (start, value) = count.unwrap_or((position, 0));
            let value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(digit as usize))
                .filter(|value| *value <= MAX_RUN)
                .ok_or(ReplayError::CountOverflow { position: start })?;
            count = Some((start, value));
            continue;
        }

        let direction =
            Direction::from_letter(symbol).ok_or(ReplayError::UnknownMove { symbol, position })?;
        let repeat = count.take().map_or(1, |(_, value)| value);
        commands.extend(std::iter::repeat(Command::Move { direction }).take(repeat));
    }

    if let Some((position, _)) = count {
        return Err(ReplayError::DanglingCount { position });
    }
    Ok(commands)
}

/// Tracks the applied moves of a level from its event stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recorder {
    moves: String,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes level events, keeping the LURD string in sync.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerMoved { record, .. } | Event::MoveRedone { record, .. } => {
                    self.moves.push(record.letter());
                }
                Event::MoveUndone { .. } => {
                    let _ = self.moves.pop();
                }
                Event::LevelValidated { .. }
                | Event::ValidationFailed { .. }
                | Event::MoveRejected { .. } => {}
            }
        }
    }

    /// Applied moves in LURD notation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.moves
    }
}

/// System that feeds queued commands to the level one at a time.
///
/// The queue halts as soon as the level rejects a command, so a replay never
/// runs past the first move the rules refuse.
#[derive(Clone, Debug, Default)]
pub struct Replay {
    pending: VecDeque<Command>,
    halted: Option<Rejection>,
}

impl Replay {
    /// Creates a replay over the provided commands.
    #[must_use]
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            pending: commands.into(),
            halted: None,
        }
    }

    /// Creates a replay from a LURD move string.
    pub fn from_lurd(text: &str) -> Result<Self, ReplayError> {
        parse_moves(text).map(Self::new)
    }

    /// Consumes level events and emits the next queued command.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::MoveRejected { reason, .. } = event {
                self.halted = Some(*reason);
            }
        }

        if self.halted.is_some() {
            return;
        }

        if let Some(command) = self.pending.pop_front() {
            out.push(command);
        }
    }

    /// Reason the replay stopped early, if the level refused a command.
    #[must_use]
    pub fn halted(&self) -> Option<Rejection> {
        self.halted
    }

    /// Number of commands not yet emitted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Whether every queued command has been emitted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
