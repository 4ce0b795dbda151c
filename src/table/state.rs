//! Per-table interaction state
//!
//! Selection, the active cell edit, an in-flight drag and the context menu.
//! This state is keyed by table identity in the `SelectionRegistry`, so it
//! survives the widget being rebuilt as long as the table is unchanged.

use super::cell_edit::{CellEdit, CellEditState};
use super::model::TableData;

/// Cell coordinates; row 0 is the header, body rows start at 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// What the user has selected in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Cell(CellPosition),
    /// Whole row (0 = header)
    Row(usize),
    Column(usize),
}

impl Selection {
    pub fn cell(row: usize, col: usize) -> Self {
        Selection::Cell(CellPosition::new(row, col))
    }

    /// Cell that keyboard navigation starts from
    pub fn anchor_cell(self) -> CellPosition {
        match self {
            Selection::Cell(pos) => pos,
            Selection::Row(row) => CellPosition::new(row, 0),
            Selection::Column(col) => CellPosition::new(0, col),
        }
    }

    /// Whether the selection includes any cell of `row`
    pub fn covers_row(self, row: usize) -> bool {
        match self {
            Selection::Cell(pos) => pos.row == row,
            Selection::Row(r) => r == row,
            Selection::Column(_) => true,
        }
    }

    /// Whether the selection includes any cell of `col`
    pub fn covers_column(self, col: usize) -> bool {
        match self {
            Selection::Cell(pos) => pos.col == col,
            Selection::Row(_) => true,
            Selection::Column(c) => c == col,
        }
    }

    pub fn contains(self, pos: CellPosition) -> bool {
        match self {
            Selection::Cell(p) => p == pos,
            Selection::Row(r) => r == pos.row,
            Selection::Column(c) => c == pos.col,
        }
    }

    /// Clamp into a table with `row_count` body rows and `column_count` columns
    pub fn clamped(self, row_count: usize, column_count: usize) -> Self {
        let max_col = column_count.saturating_sub(1);
        match self {
            Selection::Cell(pos) => {
                Selection::cell(pos.row.min(row_count), pos.col.min(max_col))
            }
            Selection::Row(row) => Selection::Row(row.min(row_count)),
            Selection::Column(col) => Selection::Column(col.min(max_col)),
        }
    }
}

/// Which handles a drag moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragAxis {
    Row,
    Column,
}

/// Half of the hovered element the pointer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSide {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropMarker {
    /// Body-row index (row drags) or column index
    pub target_index: usize,
    pub side: DropSide,
}

impl DropMarker {
    /// Insert position in the pre-move order
    pub fn target_insert(self) -> usize {
        match self.side {
            DropSide::Before => self.target_index,
            DropSide::After => self.target_index + 1,
        }
    }
}

/// An in-flight drag of one row or column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub axis: DragAxis,
    /// Body-row index (row drags) or column index
    pub source_index: usize,
    pub pointer_id: u64,
    pub drop_marker: Option<DropMarker>,
}

/// What a context menu acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScope {
    /// Selection row (0 = header)
    Row(usize),
    Column(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub scope: MenuScope,
    /// Pointer position the menu was opened at
    pub anchor: (f32, f32),
}

/// Everything the user is doing with one table
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub selection: Option<Selection>,
    pub editing: Option<CellEditState>,
    pub drag: Option<DragState>,
    pub menu: Option<ContextMenu>,
    /// An IME composition is in progress in the edit overlay
    pub composing: bool,
}

impl TableState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    /// Drop selection, menu and any drag; an active edit is discarded
    pub fn clear(&mut self) {
        self.selection = None;
        self.editing = None;
        self.drag = None;
        self.menu = None;
        self.composing = false;
    }

    /// Selected cell, if the selection is a single cell
    pub fn selected_cell(&self) -> Option<CellPosition> {
        match self.selection? {
            Selection::Cell(pos) => Some(pos),
            _ => None,
        }
    }

    /// Start editing the selected cell with its current value
    pub fn start_editing(&mut self, data: &TableData) -> bool {
        let Some(pos) = self.selected_cell() else {
            return false;
        };
        self.menu = None;
        self.editing = Some(CellEditState::new(pos, data.cell_text(pos.row, pos.col)));
        true
    }

    /// Start editing the selected cell, replacing its value with `ch`
    pub fn start_editing_with_char(&mut self, data: &TableData, ch: char) -> bool {
        let Some(pos) = self.selected_cell() else {
            return false;
        };
        self.menu = None;
        self.editing = Some(CellEditState::with_char(
            pos,
            data.cell_text(pos.row, pos.col),
            ch,
        ));
        true
    }

    /// End the edit, returning the change if the draft differs
    pub fn confirm_edit(&mut self) -> Option<CellEdit> {
        self.composing = false;
        self.editing.take()?.finish()
    }

    pub fn cancel_edit(&mut self) {
        self.composing = false;
        self.editing = None;
    }

    /// Keep the selection inside the table after its shape changed
    pub fn clamp_to(&mut self, data: &TableData) {
        if let Some(selection) = self.selection {
            self.selection = Some(selection.clamped(data.row_count(), data.column_count()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_insert_by_side() {
        let before = DropMarker {
            target_index: 2,
            side: DropSide::Before,
        };
        let after = DropMarker {
            target_index: 2,
            side: DropSide::After,
        };
        assert_eq!(before.target_insert(), 2);
        assert_eq!(after.target_insert(), 3);
    }

    #[test]
    fn test_selection_coverage() {
        let cell = Selection::cell(2, 1);
        assert!(cell.covers_row(2));
        assert!(!cell.covers_row(1));
        assert!(cell.covers_column(1));
        assert!(Selection::Row(3).covers_column(0));
        assert!(Selection::Column(0).covers_row(5));
    }

    #[test]
    fn test_clamped_selection() {
        assert_eq!(Selection::cell(9, 9).clamped(2, 3), Selection::cell(2, 2));
        assert_eq!(Selection::Column(4).clamped(2, 1), Selection::Column(0));
    }

    #[test]
    fn test_edit_lifecycle() {
        let data = TableData::from_texts(&["A"], &[&["1"]]);
        let mut state = TableState::default();
        assert!(!state.start_editing(&data));

        state.select(Selection::cell(1, 0));
        assert!(state.start_editing_with_char(&data, 'x'));
        assert!(state.is_editing());

        let edit = state.confirm_edit().unwrap();
        assert_eq!(edit.new_value, "x");
        assert_eq!(state.selection, Some(Selection::cell(1, 0)));
        assert!(!state.is_editing());
    }
}
