//! Plain-text rendering of the board.

use std::fmt;

use crate::Board;

const BLANK: char = ' ';

/// Renders one `[glyph]` per cell, cells separated by a space and every row
/// terminated by a newline. Empty cells render as `[ ]`.
impl<G> fmt::Display for Board<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            for (column, cell) in row.iter().enumerate() {
                if column > 0 {
                    f.write_str(" ")?;
                }
                let glyph = cell.as_ref().map_or(BLANK, |entity| entity.glyph());
                write!(f, "[{glyph}]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
