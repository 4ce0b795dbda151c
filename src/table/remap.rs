//! Index remapping for reorders
//!
//! After "remove the element at `source`, insert it at `target_insert`",
//! every index that pointed into the old order is mapped to the position of
//! the same element in the new order. `target_insert` is expressed in the
//! old order (`0..=len`), exactly like a drop marker resolves it.

use super::model::HEADER_ROW;
use super::state::{CellPosition, DragAxis, Selection};

/// Where `index` ends up after moving `source` to `target_insert`
pub fn remap_index(source: usize, target_insert: usize, index: usize) -> usize {
    let insert = if source < target_insert {
        target_insert - 1
    } else {
        target_insert
    };

    if index == source {
        return insert;
    }

    if source < insert {
        if source < index && index <= insert {
            index - 1
        } else {
            index
        }
    } else if insert <= index && index < source {
        index + 1
    } else {
        index
    }
}

/// True when dropping `source` at `target_insert` leaves the order unchanged
pub fn is_noop_move(source: usize, target_insert: usize) -> bool {
    target_insert == source || target_insert == source + 1
}

/// Follow a selection through a row or column move.
///
/// Row moves are in body-row indices; the header (selection row 0) never
/// moves. Column moves apply to every selection kind that names a column.
pub fn remap_selection(
    selection: Selection,
    axis: DragAxis,
    source: usize,
    target_insert: usize,
) -> Selection {
    let body = |row: usize| -> usize {
        if row == HEADER_ROW {
            row
        } else {
            remap_index(source, target_insert, row - 1) + 1
        }
    };
    let column = |col: usize| remap_index(source, target_insert, col);

    match (axis, selection) {
        (DragAxis::Row, Selection::Cell(pos)) => {
            Selection::Cell(CellPosition::new(body(pos.row), pos.col))
        }
        (DragAxis::Row, Selection::Row(row)) => Selection::Row(body(row)),
        (DragAxis::Column, Selection::Cell(pos)) => {
            Selection::Cell(CellPosition::new(pos.row, column(pos.col)))
        }
        (DragAxis::Column, Selection::Column(col)) => Selection::Column(column(col)),
        (_, other) => other,
    }
}
