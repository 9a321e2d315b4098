//! Dense row-major cell storage backing the board.

use mapgame_core::{BoardError, Entity, Position};

/// Largest accepted side length. Keeps every cell index representable as an
/// `i32` coordinate and the allocation bounded.
const MAX_SIDE: u32 = 4096;

#[derive(Clone, Debug)]
pub(crate) struct CellGrid {
    size: u32,
    cells: Vec<Option<Entity>>,
}

impl CellGrid {
    pub(crate) fn new(size: u32) -> Result<Self, BoardError> {
        let side = usize::try_from(size).unwrap_or(usize::MAX);
        let invalid = BoardError::InvalidDimensions {
            rows: side,
            columns: side,
        };
        if size == 0 || size > MAX_SIDE {
            return Err(invalid);
        }
        let cells = side.checked_mul(side).ok_or(invalid)?;

        Ok(Self {
            size,
            cells: vec![None; cells],
        })
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Option<Entity>>>) -> Result<Self, BoardError> {
        let side = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != side) {
            return Err(BoardError::InvalidDimensions {
                rows: side,
                columns: row.len(),
            });
        }

        let size = u32::try_from(side).map_err(|_| BoardError::InvalidDimensions {
            rows: side,
            columns: side,
        })?;
        let mut grid = Self::new(size)?;
        for (slot, cell) in grid.cells.iter_mut().zip(rows.into_iter().flatten()) {
            *slot = cell;
        }
        Ok(grid)
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    /// Side length as a signed coordinate; construction guarantees it fits.
    pub(crate) fn side(&self) -> i32 {
        self.size as i32
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column < self.size && row < self.size {
            let width = usize::try_from(self.size).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }

    pub(crate) fn checked_index(&self, position: Position) -> Result<usize, BoardError> {
        self.index(position).ok_or(BoardError::OutOfBounds {
            position,
            size: self.size,
        })
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Entity> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Option<Entity> {
        &mut self.cells[index]
    }

    /// Writes obstacles along the four edges, overwriting whatever was there.
    pub(crate) fn stamp_border(&mut self) {
        let last = self.side() - 1;
        for offset in 0..=last {
            for position in [
                Position::new(offset, 0),
                Position::new(offset, last),
                Position::new(0, offset),
                Position::new(last, offset),
            ] {
                if let Some(index) = self.index(position) {
                    self.cells[index] = Some(Entity::Obstacle);
                }
            }
        }
    }

    /// Every cell paired with its position, in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Position, Option<&Entity>)> + '_ {
        let side = self.side();
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as i32;
            (Position::new(index % side, index / side), cell.as_ref())
        })
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Option<Entity>]> + '_ {
        let width = usize::try_from(self.size).unwrap_or(1);
        self.cells.chunks(width)
    }
}
