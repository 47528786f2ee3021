//! One-shot scan that decides whether a grid is ready for play.
//!
//! Only player uniqueness is checked. Reachability of boxes, wall enclosure
//! and solvability are deliberately out of reach of this scan.

use pushbox_core::CellCoord;

use crate::grid::TileGrid;

/// Outcome of scanning a grid for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Exactly one player tile exists at the cell.
    Unique(CellCoord),
    /// The number of player tiles found, which is not one.
    Invalid(usize),
}

/// Counts `@` and `+` tiles across the whole grid.
pub(crate) fn locate_player(grid: &TileGrid) -> Verdict {
    let mut found = None;
    let mut count = 0usize;
    for (cell, tile) in grid.cells() {
        if tile.has_player() {
            count += 1;
            found = Some(cell);
        }
    }

    match (count, found) {
        (1, Some(cell)) => Verdict::Unique(cell),
        _ => Verdict::Invalid(count),
    }
}
