//! Drag-and-drop reordering of rows and columns
//!
//! A drag starts on a body-row or column handle, tracks a single drop
//! marker while the pointer moves and turns into a reorder command when
//! the pointer is released. Pointer capture goes through `InputAdapter` so
//! the grid does not depend on a particular windowing layer.

use super::command::TableCommand;
use super::remap::is_noop_move;
use super::render::GridLayout;
use super::state::{DragAxis, DragState, Selection, TableState};

/// Pointer capture provided by the host
pub trait InputAdapter {
    /// Route all events of `pointer_id` to the current widget
    fn acquire_capture(&mut self, pointer_id: u64);
    fn release_capture(&mut self, pointer_id: u64);
    fn has_capture(&self, pointer_id: u64) -> bool;
}

/// Input adapter for hosts without pointer capture
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl InputAdapter for NoCapture {
    fn acquire_capture(&mut self, _pointer_id: u64) {}

    fn release_capture(&mut self, _pointer_id: u64) {}

    fn has_capture(&self, _pointer_id: u64) -> bool {
        false
    }
}

/// Start dragging body row or column `source_index`.
///
/// Selects the dragged row/column and captures the pointer. A drag that is
/// already in progress is cancelled first.
pub fn begin_drag(
    state: &mut TableState,
    axis: DragAxis,
    source_index: usize,
    pointer_id: u64,
    input: &mut dyn InputAdapter,
) {
    cancel_drag(state, input);

    state.menu = None;
    state.selection = Some(match axis {
        DragAxis::Row => Selection::Row(source_index + 1),
        DragAxis::Column => Selection::Column(source_index),
    });
    state.drag = Some(DragState {
        axis,
        source_index,
        pointer_id,
        drop_marker: None,
    });
    input.acquire_capture(pointer_id);
    tracing::debug!(?axis, source_index, pointer_id, "drag started");
}

/// Update the drop marker for a pointer move; true if it changed
pub fn track_drag(
    state: &mut TableState,
    layout: &GridLayout,
    x: f32,
    y: f32,
    pointer_id: u64,
) -> bool {
    let Some(drag) = state.drag.as_mut() else {
        return false;
    };
    if drag.pointer_id != pointer_id {
        return false;
    }

    let marker = match drag.axis {
        DragAxis::Row => layout.row_drop_marker(y),
        DragAxis::Column => layout.column_drop_marker(x),
    };
    if marker == drag.drop_marker {
        return false;
    }
    drag.drop_marker = marker;
    true
}

/// End the drag on pointer release.
///
/// Returns the reorder to commit, or None when no marker was set, the
/// pointer does not own the drag, or the drop would not move anything.
pub fn finish_drag(
    state: &mut TableState,
    pointer_id: u64,
    input: &mut dyn InputAdapter,
) -> Option<TableCommand> {
    if state.drag.as_ref()?.pointer_id != pointer_id {
        return None;
    }
    let drag = state.drag.take()?;
    input.release_capture(drag.pointer_id);

    let target = drag.drop_marker?.target_insert();
    if is_noop_move(drag.source_index, target) {
        tracing::debug!(source = drag.source_index, target, "drop without move");
        return None;
    }

    Some(match drag.axis {
        DragAxis::Row => TableCommand::ReorderRows {
            source: drag.source_index,
            target,
        },
        DragAxis::Column => TableCommand::ReorderColumns {
            source: drag.source_index,
            target,
        },
    })
}

/// Discard an in-flight drag without committing; true if one was active
pub fn cancel_drag(state: &mut TableState, input: &mut dyn InputAdapter) -> bool {
    match state.drag.take() {
        Some(drag) => {
            input.release_capture(drag.pointer_id);
            tracing::debug!(pointer_id = drag.pointer_id, "drag cancelled");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::TableData;
    use crate::table::render::GridMetrics;
    use crate::table::state::{DropMarker, DropSide};

    #[derive(Default)]
    struct RecordingCapture {
        held: Vec<u64>,
    }

    impl InputAdapter for RecordingCapture {
        fn acquire_capture(&mut self, pointer_id: u64) {
            self.held.push(pointer_id);
        }

        fn release_capture(&mut self, pointer_id: u64) {
            self.held.retain(|id| *id != pointer_id);
        }

        fn has_capture(&self, pointer_id: u64) -> bool {
            self.held.contains(&pointer_id)
        }
    }

    fn layout() -> GridLayout {
        let data = TableData::from_texts(&["A", "B"], &[&["0", "x"], &["1", "y"]]);
        GridLayout::calculate(&data, GridMetrics::default(), (0.0, 0.0))
    }

    #[test]
    fn test_drag_row_after_next() {
        let mut state = TableState::default();
        let mut input = RecordingCapture::default();
        let layout = layout();

        begin_drag(&mut state, DragAxis::Row, 0, 7, &mut input);
        assert!(input.has_capture(7));
        assert_eq!(state.selection, Some(Selection::Row(1)));

        let row = layout.cell_rect(2, 0).unwrap();
        assert!(track_drag(&mut state, &layout, row.x, row.y + row.height * 0.75, 7));
        assert_eq!(
            state.drag.unwrap().drop_marker,
            Some(DropMarker {
                target_index: 1,
                side: DropSide::After
            })
        );

        let cmd = finish_drag(&mut state, 7, &mut input);
        assert_eq!(cmd, Some(TableCommand::ReorderRows { source: 0, target: 2 }));
        assert!(!input.has_capture(7));
        assert!(state.drag.is_none());
    }

    #[test]
    fn test_drop_on_own_position_is_noop() {
        let mut state = TableState::default();
        let mut input = RecordingCapture::default();
        let layout = layout();

        begin_drag(&mut state, DragAxis::Row, 0, 1, &mut input);
        let row = layout.cell_rect(1, 0).unwrap();
        track_drag(&mut state, &layout, row.x, row.y + 1.0, 1);

        assert_eq!(finish_drag(&mut state, 1, &mut input), None);
        assert!(!input.has_capture(1));
    }

    #[test]
    fn test_release_without_marker_commits_nothing() {
        let mut state = TableState::default();
        let mut input = RecordingCapture::default();

        begin_drag(&mut state, DragAxis::Column, 1, 3, &mut input);
        assert_eq!(finish_drag(&mut state, 3, &mut input), None);
        assert!(input.held.is_empty());
    }

    #[test]
    fn test_other_pointer_is_ignored() {
        let mut state = TableState::default();
        let mut input = RecordingCapture::default();
        let layout = layout();

        begin_drag(&mut state, DragAxis::Column, 0, 1, &mut input);
        assert!(!track_drag(&mut state, &layout, 500.0, 0.0, 2));
        assert_eq!(finish_drag(&mut state, 2, &mut input), None);
        assert!(state.is_dragging());
    }

    #[test]
    fn test_cancel_releases_capture() {
        let mut state = TableState::default();
        let mut input = RecordingCapture::default();

        begin_drag(&mut state, DragAxis::Row, 1, 9, &mut input);
        assert!(cancel_drag(&mut state, &mut input));
        assert!(!input.has_capture(9));
        assert!(!cancel_drag(&mut state, &mut input));
    }

    #[test]
    fn test_column_drag_past_last_column() {
        let mut state = TableState::default();
        let layout = layout();

        begin_drag(&mut state, DragAxis::Column, 0, 1, &mut NoCapture);
        track_drag(&mut state, &layout, 10_000.0, 0.0, 1);
        assert_eq!(
            finish_drag(&mut state, 1, &mut NoCapture),
            Some(TableCommand::ReorderColumns { source: 0, target: 2 })
        );
    }
}
