//! Growable column-major tile storage backing a level.

use pushbox_core::{CellCoord, Tile};

/// Rectangular tile grid stored as one vector per column, indexed `[x][y]`.
///
/// The grid always holds at least one column and every column has the same
/// length. Cells exposed by growth default to [`Tile::Floor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TileGrid {
    columns: Vec<Vec<Tile>>,
}

impl TileGrid {
    /// Creates an empty grid holding a single zero-length column.
    pub(crate) fn new() -> Self {
        Self {
            columns: vec![Vec::new()],
        }
    }

    /// Number of columns.
    pub(crate) fn size_x(&self) -> u32 {
        u32::try_from(self.columns.len()).unwrap_or(u32::MAX)
    }

    /// Number of rows.
    pub(crate) fn size_y(&self) -> u32 {
        u32::try_from(self.height()).unwrap_or(u32::MAX)
    }

    fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Writes `tile` at `[x][y]`, growing every column together as needed.
    pub(crate) fn insert(&mut self, x: u32, y: u32, tile: Tile) {
        let column = x as usize;
        let row = y as usize;

        if self.columns.len() <= column {
            let height = self.height();
            self.columns
                .resize_with(column + 1, || vec![Tile::Floor; height]);
        }

        if self.height() <= row {
            for cells in &mut self.columns {
                cells.resize(row + 1, Tile::Floor);
            }
        }

        self.columns[column][row] = tile;
    }

    /// Tile stored at the cell, or `None` outside the grid.
    pub(crate) fn get(&self, cell: CellCoord) -> Option<Tile> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        self.columns.get(column)?.get(row).copied()
    }

    /// Overwrites an existing cell. Cells outside the grid are left alone.
    pub(crate) fn set(&mut self, cell: CellCoord, tile: Tile) {
        let (Ok(column), Ok(row)) = (
            usize::try_from(cell.column()),
            usize::try_from(cell.row()),
        ) else {
            return;
        };
        if let Some(slot) = self
            .columns
            .get_mut(column)
            .and_then(|cells| cells.get_mut(row))
        {
            *slot = tile;
        }
    }

    /// Column-major view of the stored tiles.
    pub(crate) fn columns(&self) -> &[Vec<Tile>] {
        &self.columns
    }

    /// Iterates every cell in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let height = self.height();
        (0..height).flat_map(move |row| {
            self.columns.iter().enumerate().map(move |(column, cells)| {
                (
                    CellCoord::new(column as u32, row as u32),
                    cells[row],
                )
            })
        })
    }

    /// Iterates the tiles of a single row from left to right.
    pub(crate) fn row(&self, row: usize) -> impl Iterator<Item = Tile> + '_ {
        self.columns
            .iter()
            .filter_map(move |cells| cells.get(row).copied())
    }
}
