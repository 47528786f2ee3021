//! Linear move log with a single undo/redo cursor.

use pushbox_core::MoveRecord;

/// Position of the undo/redo cursor within the move log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// No move has been applied: the cursor sits before the first record.
    NoHistory,
    /// The record at the index is the most recently applied move.
    At(usize),
}

impl Cursor {
    /// Number of records at or before the cursor.
    #[must_use]
    pub const fn applied(self) -> usize {
        match self {
            Self::NoHistory => 0,
            Self::At(index) => index + 1,
        }
    }
}

/// Ordered move records plus the cursor marking the last applied one.
///
/// Records after the cursor form the redo tail. Recording a new move drops
/// that tail, so the log is always a single timeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MoveLog {
    records: Vec<MoveRecord>,
    cursor: Cursor,
}

impl MoveLog {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            cursor: Cursor::NoHistory,
        }
    }

    /// Appends a freshly applied move, discarding any redo tail first.
    pub(crate) fn record(&mut self, record: MoveRecord) {
        self.records.truncate(self.cursor.applied());
        self.records.push(record);
        self.cursor = Cursor::At(self.records.len() - 1);
    }

    /// Most recently applied record, the one `undo` would reverse.
    pub(crate) fn current(&self) -> Option<MoveRecord> {
        match self.cursor {
            Cursor::NoHistory => None,
            Cursor::At(index) => self.records.get(index).copied(),
        }
    }

    /// Record just after the cursor, the one `redo` would apply.
    pub(crate) fn upcoming(&self) -> Option<MoveRecord> {
        self.records.get(self.cursor.applied()).copied()
    }

    /// Moves the cursor one record back.
    pub(crate) fn step_back(&mut self) {
        self.cursor = match self.cursor {
            Cursor::NoHistory | Cursor::At(0) => Cursor::NoHistory,
            Cursor::At(index) => Cursor::At(index - 1),
        };
    }

    /// Moves the cursor one record forward when a redo tail exists.
    pub(crate) fn step_forward(&mut self) {
        let applied = self.cursor.applied();
        if applied < self.records.len() {
            self.cursor = Cursor::At(applied);
        }
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Records up to and including the cursor.
    pub(crate) fn applied(&self) -> &[MoveRecord] {
        &self.records[..self.cursor.applied()]
    }

    /// Every record, including the redo tail.
    pub(crate) fn records(&self) -> &[MoveRecord] {
        &self.records
    }
}
