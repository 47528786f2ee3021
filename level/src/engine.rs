//! Push-move rules: planning, executing and reversing single player steps.

use pushbox_core::{CellCoord, Direction, MoveRecord, Rejection, Tile};

use crate::grid::TileGrid;

/// Fully checked move ready to be written into the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) direction: Direction,
    pub(crate) from: CellCoord,
    pub(crate) to: CellCoord,
    /// Cell the pushed box lands on, when the move pushes one.
    pub(crate) box_to: Option<CellCoord>,
}

impl Step {
    pub(crate) fn record(&self) -> MoveRecord {
        if self.box_to.is_some() {
            MoveRecord::push(self.direction)
        } else {
            MoveRecord::walk(self.direction)
        }
    }
}

/// Checks whether the player at `from` may move in `direction`.
///
/// Nothing is written; a rejected plan leaves the grid untouched by
/// construction.
pub(crate) fn plan(
    grid: &TileGrid,
    from: CellCoord,
    direction: Direction,
) -> Result<Step, Rejection> {
    let (to, target) = neighbour(grid, from, direction).ok_or(Rejection::OutOfBounds)?;
    if target.is_wall() {
        return Err(Rejection::BlockedByWall);
    }

    let box_to = if target.has_box() {
        let (beyond, landing) = neighbour(grid, to, direction).ok_or(Rejection::BoxBlocked)?;
        if landing.is_wall() || landing.has_box() {
            return Err(Rejection::BoxBlocked);
        }
        Some(beyond)
    } else {
        None
    };

    Ok(Step {
        direction,
        from,
        to,
        box_to,
    })
}

/// Writes a planned step into the grid.
pub(crate) fn execute(grid: &mut TileGrid, step: &Step) {
    if let Some(box_to) = step.box_to {
        relocate(grid, step.to, box_to, Tile::with_box);
    }
    relocate(grid, step.from, step.to, Tile::with_player);
}

/// Reverses `record` for a player standing at `player`.
///
/// Returns the cell the player ends up on. The grid is only modified when
/// every cell involved still matches what the record implies.
pub(crate) fn reverse(
    grid: &mut TileGrid,
    player: CellCoord,
    record: MoveRecord,
) -> Result<CellCoord, Rejection> {
    let current = grid.get(player).ok_or(Rejection::HistoryDiverged)?;
    if !current.has_player() {
        return Err(Rejection::HistoryDiverged);
    }

    let (previous, behind) = neighbour(grid, player, record.direction().reversed())
        .ok_or(Rejection::HistoryDiverged)?;
    if behind.is_wall() || behind.has_box() {
        return Err(Rejection::HistoryDiverged);
    }

    let pulled_box = if record.pushed() {
        let (box_cell, tile) =
            neighbour(grid, player, record.direction()).ok_or(Rejection::HistoryDiverged)?;
        if !tile.has_box() {
            return Err(Rejection::HistoryDiverged);
        }
        Some(box_cell)
    } else {
        None
    };

    relocate(grid, player, previous, Tile::with_player);
    if let Some(box_cell) = pulled_box {
        relocate(grid, box_cell, player, Tile::with_box);
    }
    Ok(previous)
}

fn neighbour(grid: &TileGrid, cell: CellCoord, direction: Direction) -> Option<(CellCoord, Tile)> {
    let next = cell.step(direction)?;
    grid.get(next).map(|tile| (next, tile))
}

/// Moves an occupant from `from` to `to`, restoring the goal or floor it left.
fn relocate(grid: &mut TileGrid, from: CellCoord, to: CellCoord, occupy: fn(Tile) -> Tile) {
    if let (Some(source), Some(destination)) = (grid.get(from), grid.get(to)) {
        grid.set(from, source.vacated());
        grid.set(to, occupy(destination));
    }
}
