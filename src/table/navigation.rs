//! Keyboard navigation over a table grid
//!
//! Arrow keys move by one cell and clamp at the edges, except that leaving
//! the table vertically is reported so the host can take over the cursor.
//! Tab and Shift+Tab walk the cells in row-major order, header included,
//! and wrap around.

use super::state::{CellPosition, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which side of the table a vertical move left through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowMove {
    /// New selection inside the table (possibly unchanged when clamped)
    Within(Selection),
    /// The move runs off the top or bottom of the table
    Leave(Edge),
}

/// Grid size as navigation sees it: `rows` counts the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    /// Size of a table with `row_count` body rows
    pub fn for_table(row_count: usize, column_count: usize) -> Self {
        Self {
            rows: row_count + 1,
            cols: column_count.max(1),
        }
    }

    pub fn total_cells(self) -> usize {
        self.rows * self.cols
    }

    fn last_row(self) -> usize {
        self.rows.saturating_sub(1)
    }

    fn last_col(self) -> usize {
        self.cols.saturating_sub(1)
    }

    fn clamp(self, pos: CellPosition) -> CellPosition {
        CellPosition::new(pos.row.min(self.last_row()), pos.col.min(self.last_col()))
    }
}

/// Apply an arrow key to a selection.
///
/// Row and column selections navigate from their first cell.
pub fn arrow(selection: Selection, direction: Direction, size: GridSize) -> ArrowMove {
    let pos = size.clamp(selection.anchor_cell());

    let next = match direction {
        Direction::Up => {
            if pos.row == 0 {
                return ArrowMove::Leave(Edge::Above);
            }
            CellPosition::new(pos.row - 1, pos.col)
        }
        Direction::Down => {
            if pos.row >= size.last_row() {
                return ArrowMove::Leave(Edge::Below);
            }
            CellPosition::new(pos.row + 1, pos.col)
        }
        Direction::Left => CellPosition::new(pos.row, pos.col.saturating_sub(1)),
        Direction::Right => CellPosition::new(pos.row, (pos.col + 1).min(size.last_col())),
    };

    ArrowMove::Within(Selection::Cell(next))
}

/// Step `delta` cells in row-major order, wrapping modulo the cell count
pub fn tab_step(pos: CellPosition, delta: isize, size: GridSize) -> CellPosition {
    let total = size.total_cells() as isize;
    let pos = size.clamp(pos);
    let linear = (pos.row * size.cols + pos.col) as isize;
    let next = (linear + delta).rem_euclid(total) as usize;
    CellPosition::new(next / size.cols, next % size.cols)
}

/// First cell of the selection's row (Home)
pub fn row_start(selection: Selection) -> Selection {
    let pos = selection.anchor_cell();
    Selection::cell(pos.row, 0)
}

/// Last cell of the selection's row (End)
pub fn row_end(selection: Selection, size: GridSize) -> Selection {
    let pos = selection.anchor_cell();
    Selection::cell(pos.row.min(size.last_row()), size.last_col())
}

/// Header cell of the first column (Ctrl+Home)
pub fn first_cell() -> Selection {
    Selection::cell(0, 0)
}

/// Bottom-right cell (Ctrl+End)
pub fn last_cell(size: GridSize) -> Selection {
    Selection::cell(size.last_row(), size.last_col())
}
