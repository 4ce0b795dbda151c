//! Structural table edits
//!
//! Every command works on a clone of the table: clone, mutate, normalize.
//! The result carries the selection to restore once the committed table has
//! been re-rendered.

use super::model::{Alignment, TableData, HEADER_ROW};
use super::remap::{is_noop_move, remap_selection};
use super::state::{DragAxis, Selection};

/// A structural edit. Row arguments are selection rows (0 = header) unless
/// noted otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    InsertRowAbove(usize),
    InsertRowBelow(usize),
    DeleteRow(usize),
    InsertColumnLeft(usize),
    InsertColumnRight(usize),
    DeleteColumn(usize),
    SetAlignment { col: usize, alignment: Alignment },
    RenameHeader { col: usize, text: String },
    SetCell { row: usize, col: usize, text: String },
    /// Body-row indices; `target` is an insert position in `0..=row_count`
    ReorderRows { source: usize, target: usize },
    ReorderColumns { source: usize, target: usize },
}

/// Outcome of a command that changed the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub data: TableData,
    pub selection: Option<Selection>,
}

impl TableCommand {
    /// Short name for logs and the CLI
    pub fn name(&self) -> &'static str {
        match self {
            TableCommand::InsertRowAbove(_) => "insert-row-above",
            TableCommand::InsertRowBelow(_) => "insert-row-below",
            TableCommand::DeleteRow(_) => "delete-row",
            TableCommand::InsertColumnLeft(_) => "insert-column-left",
            TableCommand::InsertColumnRight(_) => "insert-column-right",
            TableCommand::DeleteColumn(_) => "delete-column",
            TableCommand::SetAlignment { .. } => "set-alignment",
            TableCommand::RenameHeader { .. } => "rename-header",
            TableCommand::SetCell { .. } => "set-cell",
            TableCommand::ReorderRows { .. } => "reorder-rows",
            TableCommand::ReorderColumns { .. } => "reorder-columns",
        }
    }

    /// Apply to a clone of `data`.
    ///
    /// Returns None when the command would not change the table (deleting
    /// the last column, an out-of-range index, a no-op move, an unchanged
    /// value).
    pub fn apply(&self, data: &TableData, selection: Option<Selection>) -> Option<Applied> {
        let mut next = data.normalized();

        let selection = match self {
            TableCommand::InsertRowAbove(row) => {
                // Nothing can be inserted above the header
                let row = (*row).max(1);
                next.insert_row(row - 1);
                Some(Selection::cell(row, selected_col(selection)))
            }
            TableCommand::InsertRowBelow(row) => {
                next.insert_row(*row);
                Some(Selection::cell(row + 1, selected_col(selection)))
            }
            TableCommand::DeleteRow(row) => {
                if *row == HEADER_ROW || !next.delete_row(row - 1) {
                    return None;
                }
                let row = (*row).min(next.row_count());
                Some(Selection::cell(row, selected_col(selection)))
            }
            TableCommand::InsertColumnLeft(col) => {
                next.insert_column(*col);
                Some(Selection::Column(*col))
            }
            TableCommand::InsertColumnRight(col) => {
                next.insert_column(col + 1);
                Some(Selection::Column(col + 1))
            }
            TableCommand::DeleteColumn(col) => {
                if !next.delete_column(*col) {
                    return None;
                }
                Some(Selection::Column((*col).min(next.column_count() - 1)))
            }
            TableCommand::SetAlignment { col, alignment } => {
                if !next.set_alignment(*col, *alignment) {
                    return None;
                }
                selection
            }
            TableCommand::RenameHeader { col, text } => {
                if !next.set_cell(HEADER_ROW, *col, text.trim()) {
                    return None;
                }
                selection.or(Some(Selection::cell(HEADER_ROW, *col)))
            }
            TableCommand::SetCell { row, col, text } => {
                if !next.set_cell(*row, *col, text) {
                    return None;
                }
                Some(Selection::cell(*row, *col))
            }
            TableCommand::ReorderRows { source, target } => {
                if is_noop_move(*source, *target) || !next.reorder_rows(*source, *target) {
                    return None;
                }
                selection.map(|s| remap_selection(s, DragAxis::Row, *source, *target))
            }
            TableCommand::ReorderColumns { source, target } => {
                if is_noop_move(*source, *target) || !next.reorder_columns(*source, *target) {
                    return None;
                }
                selection.map(|s| remap_selection(s, DragAxis::Column, *source, *target))
            }
        };

        next.normalize();
        let selection = selection.map(|s| s.clamped(next.row_count(), next.column_count()));
        tracing::debug!(command = self.name(), ?selection, "applied table command");

        Some(Applied {
            data: next,
            selection,
        })
    }
}

fn selected_col(selection: Option<Selection>) -> usize {
    selection.map(|s| s.anchor_cell().col).unwrap_or(0)
}
