//! Table widget update functions
//!
//! Handles TableMsg messages for one mounted table widget. The widget's
//! model is never changed here: edits produce a `Cmd::Commit` carrying a
//! mutated copy, and the host rebuilds the widget from the new text.

use crate::commands::{Cmd, MenuAction};
use crate::messages::{EditMotion, PointerButton, TableMsg};
use crate::table::navigation::{self, ArrowMove, Direction, Edge};
use crate::table::{
    begin_drag, cancel_drag, finish_drag, track_drag, CellEdit, CellEditor, CellPosition,
    ContextMenu, DragAxis, ElementKind, GridLayout, InputAdapter, MenuScope, Selection,
    TableCommand, TableState, TableWidget, HEADER_ROW,
};

/// Handle a message for `widget`, whose interaction state is `state`
pub fn update_table(
    widget: &TableWidget,
    state: &mut TableState,
    input: &mut dyn InputAdapter,
    msg: TableMsg,
) -> Option<Cmd> {
    match msg {
        TableMsg::MoveUp => arrow(widget, state, Direction::Up),
        TableMsg::MoveDown => arrow(widget, state, Direction::Down),
        TableMsg::MoveLeft => arrow(widget, state, Direction::Left),
        TableMsg::MoveRight => arrow(widget, state, Direction::Right),
        TableMsg::NextCell => tab(widget, state, 1),
        TableMsg::PrevCell => tab(widget, state, -1),
        TableMsg::RowStart => jump(state, navigation::row_start),
        TableMsg::RowEnd => jump(state, |s| navigation::row_end(s, widget.size())),
        TableMsg::FirstCell => jump(state, |_| navigation::first_cell()),
        TableMsg::LastCell => jump(state, |_| navigation::last_cell(widget.size())),
        TableMsg::SelectCell { row, col } => select(widget, state, Selection::cell(row, col)),
        TableMsg::SelectRow(row) => select(widget, state, Selection::Row(row)),
        TableMsg::SelectColumn(col) => select(widget, state, Selection::Column(col)),
        TableMsg::FocusCell(selection) => focus_cell(widget, state, selection),

        // Cell editing
        TableMsg::Enter => enter(widget, state),
        TableMsg::StartEditing => start_editing(widget, state),
        TableMsg::StartEditingWithChar(ch) => start_editing_with_char(widget, state, ch),
        TableMsg::Escape => escape(state, input),
        TableMsg::EditInsertChar(ch) => edit(state, |e| e.insert_char(ch)),
        TableMsg::EditInsertNewline => edit(state, |e| e.insert_char('\n')),
        TableMsg::EditDeleteBackward => edit(state, CellEditor::delete_backward),
        TableMsg::EditDeleteForward => edit(state, CellEditor::delete_forward),
        TableMsg::EditDeleteWordBackward => edit(state, CellEditor::delete_word_backward),
        TableMsg::EditDeleteWordForward => edit(state, CellEditor::delete_word_forward),
        TableMsg::EditCursor { motion, extend } => edit(state, |e| match motion {
            EditMotion::Left => e.move_left(extend),
            EditMotion::Right => e.move_right(extend),
            EditMotion::WordLeft => e.move_word_left(extend),
            EditMotion::WordRight => e.move_word_right(extend),
            EditMotion::Home => e.move_home(extend),
            EditMotion::End => e.move_end(extend),
        }),
        TableMsg::EditSelectAll => edit(state, CellEditor::select_all),
        TableMsg::EditCopy => edit_copy(state),
        TableMsg::EditCut => edit_cut(state),
        TableMsg::EditPaste => edit_paste(state),
        TableMsg::EditPasteText(text) => edit(state, |e| e.insert_text(&text)),
        TableMsg::CompositionStart => {
            state.composing = state.is_editing();
            None
        }
        TableMsg::CompositionEnd => {
            state.composing = false;
            None
        }

        // Pointer
        TableMsg::PointerDown {
            x,
            y,
            pointer_id,
            button,
            click_count,
        } => pointer_down(widget, state, input, x, y, pointer_id, button, click_count),
        TableMsg::PointerMove { x, y, pointer_id } => pointer_move(widget, state, x, y, pointer_id),
        TableMsg::PointerUp { pointer_id, .. } => pointer_up(widget, state, input, pointer_id),
        TableMsg::PointerCancel { .. } => cancel_drag(state, input).then_some(Cmd::Redraw),

        TableMsg::Blur => blur(widget, state, input),

        // Menu & structural commands
        TableMsg::OpenMenu { scope, x, y } => open_menu(state, scope, x, y),
        TableMsg::CloseMenu => state.menu.take().map(|_| Cmd::Redraw),
        TableMsg::Menu(action) => menu_action(widget, state, action),
        TableMsg::Command(cmd) => run_command(widget, state, cmd),
    }
}

// === Navigation ===

fn arrow(widget: &TableWidget, state: &mut TableState, direction: Direction) -> Option<Cmd> {
    if state.is_editing() {
        return None;
    }
    let selection = state.selection?;
    state.menu = None;

    match navigation::arrow(selection, direction, widget.size()) {
        ArrowMove::Within(next) => {
            state.select(next);
            Some(Cmd::Redraw)
        }
        ArrowMove::Leave(edge) => {
            let line = match edge {
                Edge::Above => widget.line_above(),
                Edge::Below => widget.line_below(),
            };
            match line {
                Some(line) => {
                    tracing::debug!(table = widget.index, ?edge, line, "selection handed off");
                    state.clear();
                    Some(Cmd::HandOff { line })
                }
                None => {
                    // Nowhere to go: stay on the edge cell
                    let pos = selection.anchor_cell();
                    state.select(Selection::Cell(pos).clamped(
                        widget.data.row_count(),
                        widget.data.column_count(),
                    ));
                    Some(Cmd::Redraw)
                }
            }
        }
    }
}

fn tab(widget: &TableWidget, state: &mut TableState, delta: isize) -> Option<Cmd> {
    let pos = state.selection?.anchor_cell();
    let next = Selection::Cell(navigation::tab_step(pos, delta, widget.size()));
    state.menu = None;

    if state.is_editing() {
        let edit = state.confirm_edit();
        state.select(next);
        return Some(match edit {
            Some(edit) => commit_cell_edit(widget, edit, Some(next)),
            None => Cmd::Redraw,
        });
    }

    state.select(next);
    Some(Cmd::Redraw)
}

fn jump(state: &mut TableState, target: impl FnOnce(Selection) -> Selection) -> Option<Cmd> {
    if state.is_editing() {
        return None;
    }
    let selection = state.selection?;
    state.menu = None;
    state.select(target(selection));
    Some(Cmd::Redraw)
}

fn select(widget: &TableWidget, state: &mut TableState, selection: Selection) -> Option<Cmd> {
    let selection = selection.clamped(widget.data.row_count(), widget.data.column_count());
    state.menu = None;
    if let Some(cmd) = finish_edit_before(widget, state, Some(selection)) {
        return Some(cmd);
    }
    state.select(selection);
    Some(Cmd::Redraw)
}

fn focus_cell(widget: &TableWidget, state: &mut TableState, selection: Selection) -> Option<Cmd> {
    state.cancel_edit();
    state.menu = None;
    state.select(selection.clamped(widget.data.row_count(), widget.data.column_count()));
    tracing::debug!(table = widget.index, ?selection, "focus restored");
    Some(Cmd::Redraw)
}

// === Editing ===

fn enter(widget: &TableWidget, state: &mut TableState) -> Option<Cmd> {
    if !state.is_editing() {
        return start_editing(widget, state);
    }
    // The IME owns Enter while composing
    if state.composing {
        return None;
    }

    let position = state.editing.as_ref()?.position;
    let restore = Some(Selection::Cell(position));
    Some(match state.confirm_edit() {
        Some(edit) => commit_cell_edit(widget, edit, restore),
        None => Cmd::Redraw,
    })
}

fn start_editing(widget: &TableWidget, state: &mut TableState) -> Option<Cmd> {
    if state.is_editing() {
        return None;
    }
    state.start_editing(&widget.data).then_some(Cmd::Redraw)
}

fn start_editing_with_char(widget: &TableWidget, state: &mut TableState, ch: char) -> Option<Cmd> {
    if state.is_editing() {
        return edit(state, |e| e.insert_char(ch));
    }
    state
        .start_editing_with_char(&widget.data, ch)
        .then_some(Cmd::Redraw)
}

fn escape(state: &mut TableState, input: &mut dyn InputAdapter) -> Option<Cmd> {
    if state.is_editing() {
        state.cancel_edit();
    } else if cancel_drag(state, input) {
        // drag dropped, selection kept
    } else if state.menu.is_some() {
        state.menu = None;
    } else if state.selection.is_some() {
        state.selection = None;
    } else {
        return None;
    }
    Some(Cmd::Redraw)
}

fn edit(state: &mut TableState, f: impl FnOnce(&mut CellEditor)) -> Option<Cmd> {
    let editing = state.editing.as_mut()?;
    f(&mut editing.editor);
    Some(Cmd::Redraw)
}

fn edit_copy(state: &mut TableState) -> Option<Cmd> {
    let text = state.editing.as_ref()?.editor.selected_text();
    if !text.is_empty() {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(&text);
        }
    }
    Some(Cmd::Redraw)
}

fn edit_cut(state: &mut TableState) -> Option<Cmd> {
    let editing = state.editing.as_mut()?;
    let text = editing.editor.selected_text();
    if !text.is_empty() {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(&text);
        }
        editing.editor.delete_backward();
    }
    Some(Cmd::Redraw)
}

fn edit_paste(state: &mut TableState) -> Option<Cmd> {
    if !state.is_editing() {
        return None;
    }
    let text = arboard::Clipboard::new()
        .ok()
        .and_then(|mut clipboard| clipboard.get_text().ok())?;
    edit(state, |e| e.insert_text(&text))
}

/// Commit an active edit before the selection moves to `restore`.
///
/// Returns the commit command when the draft changed; otherwise the edit
/// just ends and the caller carries on.
fn finish_edit_before(
    widget: &TableWidget,
    state: &mut TableState,
    restore: Option<Selection>,
) -> Option<Cmd> {
    if !state.is_editing() {
        return None;
    }
    let edit = state.confirm_edit()?;
    state.selection = restore;
    Some(commit_cell_edit(widget, edit, restore))
}

fn commit_cell_edit(widget: &TableWidget, edit: CellEdit, restore: Option<Selection>) -> Cmd {
    let command = TableCommand::SetCell {
        row: edit.position.row,
        col: edit.position.col,
        text: edit.new_value,
    };
    match command.apply(&widget.data, restore) {
        Some(applied) => widget.commit(applied.data, restore),
        None => Cmd::Redraw,
    }
}

// === Pointer ===

#[allow(clippy::too_many_arguments)]
fn pointer_down(
    widget: &TableWidget,
    state: &mut TableState,
    input: &mut dyn InputAdapter,
    x: f32,
    y: f32,
    pointer_id: u64,
    button: PointerButton,
    click_count: u8,
) -> Option<Cmd> {
    let hit = widget.view(state).hit_test(x, y).map(|e| e.kind);

    if state.menu.is_some() {
        match hit {
            Some(ElementKind::MenuItem(action)) if button == PointerButton::Primary => {
                return menu_action(widget, state, action);
            }
            Some(ElementKind::ContextMenu(_)) | Some(ElementKind::MenuItem(_)) => return None,
            _ => state.menu = None,
        }
    }

    match hit {
        Some(ElementKind::Cell(pos)) => click_cell(widget, state, x, y, pos, button, click_count),
        Some(ElementKind::RowHandle(row)) => {
            let selection = Selection::Row(row);
            if let Some(cmd) = finish_edit_before(widget, state, Some(selection)) {
                return Some(cmd);
            }
            state.cancel_edit();
            match button {
                PointerButton::Primary if row != HEADER_ROW => {
                    begin_drag(state, DragAxis::Row, row - 1, pointer_id, input)
                }
                PointerButton::Primary => state.select(selection),
                PointerButton::Secondary => {
                    state.select(selection);
                    state.menu = Some(ContextMenu {
                        scope: MenuScope::Row(row),
                        anchor: (x, y),
                    });
                }
            }
            Some(Cmd::Redraw)
        }
        Some(ElementKind::ColumnHandle(col)) => {
            let selection = Selection::Column(col);
            if let Some(cmd) = finish_edit_before(widget, state, Some(selection)) {
                return Some(cmd);
            }
            state.cancel_edit();
            match button {
                PointerButton::Primary => begin_drag(state, DragAxis::Column, col, pointer_id, input),
                PointerButton::Secondary => {
                    state.select(selection);
                    state.menu = Some(ContextMenu {
                        scope: MenuScope::Column(col),
                        anchor: (x, y),
                    });
                }
            }
            Some(Cmd::Redraw)
        }
        // Caret placement inside the overlay is handled by the overlay
        Some(ElementKind::EditOverlay(_)) => None,
        _ => Some(Cmd::Redraw),
    }
}

fn click_cell(
    widget: &TableWidget,
    state: &mut TableState,
    x: f32,
    y: f32,
    pos: CellPosition,
    button: PointerButton,
    click_count: u8,
) -> Option<Cmd> {
    let clicked = Selection::Cell(pos);
    if let Some(cmd) = finish_edit_before(widget, state, Some(clicked)) {
        return Some(cmd);
    }
    state.cancel_edit();

    match button {
        PointerButton::Secondary => {
            // The menu only opens over an existing row/column selection
            let scope = match state.selection {
                Some(Selection::Row(row)) if row == pos.row => Some(MenuScope::Row(row)),
                Some(Selection::Column(col)) if col == pos.col => Some(MenuScope::Column(col)),
                _ => None,
            };
            match scope {
                Some(scope) => {
                    state.menu = Some(ContextMenu {
                        scope,
                        anchor: (x, y),
                    })
                }
                None => state.select(clicked),
            }
        }
        PointerButton::Primary => {
            state.select(clicked);
            if click_count >= 2 {
                state.start_editing(&widget.data);
            }
        }
    }
    Some(Cmd::Redraw)
}

fn pointer_move(
    widget: &TableWidget,
    state: &mut TableState,
    x: f32,
    y: f32,
    pointer_id: u64,
) -> Option<Cmd> {
    if !state.is_dragging() {
        return None;
    }
    let layout = GridLayout::calculate(&widget.data, widget.metrics, widget.origin);
    track_drag(state, &layout, x, y, pointer_id).then_some(Cmd::Redraw)
}

fn pointer_up(
    widget: &TableWidget,
    state: &mut TableState,
    input: &mut dyn InputAdapter,
    pointer_id: u64,
) -> Option<Cmd> {
    if !state.is_dragging() {
        return None;
    }
    let selection = state.selection;
    let command = finish_drag(state, pointer_id, input);
    if state.is_dragging() {
        // Another pointer owns the drag
        return None;
    }

    let Some(command) = command else {
        return Some(Cmd::Redraw);
    };
    match command.apply(&widget.data, selection) {
        Some(applied) => Some(widget.commit(applied.data, applied.selection)),
        None => Some(Cmd::Redraw),
    }
}

fn blur(widget: &TableWidget, state: &mut TableState, input: &mut dyn InputAdapter) -> Option<Cmd> {
    cancel_drag(state, input);
    state.menu = None;

    let edit = state.confirm_edit();
    state.selection = None;
    Some(match edit {
        Some(edit) => commit_cell_edit(widget, edit, None),
        None => Cmd::Redraw,
    })
}

// === Menu & commands ===

fn open_menu(state: &mut TableState, scope: MenuScope, x: f32, y: f32) -> Option<Cmd> {
    state.cancel_edit();
    state.select(match scope {
        MenuScope::Row(row) => Selection::Row(row),
        MenuScope::Column(col) => Selection::Column(col),
    });
    state.menu = Some(ContextMenu {
        scope,
        anchor: (x, y),
    });
    Some(Cmd::Redraw)
}

fn menu_action(widget: &TableWidget, state: &mut TableState, action: MenuAction) -> Option<Cmd> {
    let menu = state.menu.take()?;
    let Some(command) = action.to_command(menu.scope) else {
        tracing::warn!(?action, scope = ?menu.scope, "menu action does not apply");
        return Some(Cmd::Redraw);
    };
    run_command(widget, state, command)
}

fn run_command(widget: &TableWidget, state: &mut TableState, command: TableCommand) -> Option<Cmd> {
    // Structural edits replace the table, so a pending draft is dropped
    state.cancel_edit();
    state.menu = None;

    match command.apply(&widget.data, state.selection) {
        Some(applied) => Some(widget.commit(applied.data, applied.selection)),
        None => {
            tracing::debug!(command = command.name(), "command left the table unchanged");
            Some(Cmd::Redraw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{locate_tables, GridMetrics, LineIndex, NoCapture};

    const DOC: &str = "intro\n| A | B |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |\noutro";

    fn widget(doc: &str) -> TableWidget {
        let block = &locate_tables(doc)[0];
        TableWidget::from_block(doc, block, LineIndex::new(doc).line_count(), GridMetrics::default())
    }

    fn send(widget: &TableWidget, state: &mut TableState, msg: TableMsg) -> Option<Cmd> {
        update_table(widget, state, &mut NoCapture, msg)
    }

    fn selected(widget: &TableWidget, row: usize, col: usize) -> TableState {
        let mut state = TableState::default();
        send(widget, &mut state, TableMsg::SelectCell { row, col });
        state
    }

    fn click(widget: &TableWidget, row: usize, col: usize, state: &TableState) -> (f32, f32) {
        widget.view(state).layout.cell_rect(row, col).unwrap().center()
    }

    #[test]
    fn test_tab_moves_and_wraps() {
        let w = widget("| A | B |\n| --- | --- |\n| 1 | 2 |");
        let mut state = selected(&w, 0, 0);

        send(&w, &mut state, TableMsg::NextCell);
        assert_eq!(state.selection, Some(Selection::cell(0, 1)));

        send(&w, &mut state, TableMsg::SelectCell { row: 1, col: 1 });
        send(&w, &mut state, TableMsg::NextCell);
        assert_eq!(state.selection, Some(Selection::cell(0, 0)));
    }

    #[test]
    fn test_arrow_hand_off_above_and_below() {
        let w = widget(DOC);
        let mut state = selected(&w, 0, 1);
        assert_eq!(
            send(&w, &mut state, TableMsg::MoveUp),
            Some(Cmd::HandOff { line: 0 })
        );
        assert_eq!(state.selection, None);

        let mut state = selected(&w, 2, 0);
        assert_eq!(
            send(&w, &mut state, TableMsg::MoveDown),
            Some(Cmd::HandOff { line: 5 })
        );
    }

    #[test]
    fn test_arrow_clamps_without_adjacent_line() {
        let w = widget("| A |\n| --- |\n| 1 |");
        let mut state = selected(&w, 1, 0);
        assert_eq!(send(&w, &mut state, TableMsg::MoveDown), Some(Cmd::Redraw));
        assert_eq!(state.selection, Some(Selection::cell(1, 0)));

        let mut state = selected(&w, 0, 0);
        send(&w, &mut state, TableMsg::MoveUp);
        assert_eq!(state.selection, Some(Selection::cell(0, 0)));
    }

    #[test]
    fn test_enter_edits_then_commits_in_place() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 0);

        send(&w, &mut state, TableMsg::Enter);
        assert!(state.is_editing());
        send(&w, &mut state, TableMsg::EditSelectAll);
        for ch in "updated".chars() {
            send(&w, &mut state, TableMsg::EditInsertChar(ch));
        }

        let cmd = send(&w, &mut state, TableMsg::Enter).unwrap();
        let request = cmd.commit().unwrap();
        assert_eq!(request.data.cell_text(1, 0), "updated");
        assert_eq!(request.restore, Some(Selection::cell(1, 0)));
        assert_eq!(request.line_range, 1..5);
        assert!(!state.is_editing());
        assert_eq!(state.selection, Some(Selection::cell(1, 0)));
    }

    #[test]
    fn test_unchanged_edit_does_not_commit() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 1);
        send(&w, &mut state, TableMsg::StartEditing);
        assert_eq!(send(&w, &mut state, TableMsg::Enter), Some(Cmd::Redraw));
    }

    #[test]
    fn test_escape_discards_draft() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 1);
        send(&w, &mut state, TableMsg::StartEditingWithChar('z'));
        assert_eq!(send(&w, &mut state, TableMsg::Escape), Some(Cmd::Redraw));
        assert!(!state.is_editing());
        assert_eq!(state.selection, Some(Selection::cell(1, 1)));

        // Second Escape clears the selection
        send(&w, &mut state, TableMsg::Escape);
        assert_eq!(state.selection, None);
        assert_eq!(send(&w, &mut state, TableMsg::Escape), None);
    }

    #[test]
    fn test_enter_ignored_while_composing() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 1);
        send(&w, &mut state, TableMsg::StartEditingWithChar('k'));
        send(&w, &mut state, TableMsg::CompositionStart);
        assert_eq!(send(&w, &mut state, TableMsg::Enter), None);
        assert!(state.is_editing());

        send(&w, &mut state, TableMsg::CompositionEnd);
        assert!(send(&w, &mut state, TableMsg::Enter).unwrap().commit().is_some());
    }

    #[test]
    fn test_tab_commits_and_moves_without_editing() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 1);
        send(&w, &mut state, TableMsg::StartEditingWithChar('9'));

        let cmd = send(&w, &mut state, TableMsg::NextCell).unwrap();
        let request = cmd.commit().unwrap();
        assert_eq!(request.data.cell_text(1, 1), "9");
        assert_eq!(request.restore, Some(Selection::cell(2, 0)));
        assert!(!state.is_editing());
    }

    #[test]
    fn test_shift_enter_stores_line_break() {
        let w = widget(DOC);
        let mut state = selected(&w, 2, 0);
        send(&w, &mut state, TableMsg::StartEditing);
        send(&w, &mut state, TableMsg::EditInsertNewline);
        send(&w, &mut state, TableMsg::EditInsertChar('x'));

        let cmd = send(&w, &mut state, TableMsg::Enter).unwrap();
        assert_eq!(cmd.commit().unwrap().data.cell_text(2, 0), "3<br>x");
    }

    #[test]
    fn test_blur_commits_and_clears() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 0);
        send(&w, &mut state, TableMsg::StartEditingWithChar('q'));

        let cmd = send(&w, &mut state, TableMsg::Blur).unwrap();
        let request = cmd.commit().unwrap();
        assert_eq!(request.data.cell_text(1, 0), "q");
        assert_eq!(request.restore, None);
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_click_other_cell_commits_edit() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 0);
        send(&w, &mut state, TableMsg::StartEditingWithChar('n'));

        let (x, y) = click(&w, 2, 1, &state);
        let cmd = send(
            &w,
            &mut state,
            TableMsg::PointerDown {
                x,
                y,
                pointer_id: 1,
                button: PointerButton::Primary,
                click_count: 1,
            },
        )
        .unwrap();
        assert_eq!(cmd.commit().unwrap().restore, Some(Selection::cell(2, 1)));
    }

    #[test]
    fn test_double_click_starts_editing() {
        let w = widget(DOC);
        let mut state = TableState::default();
        let (x, y) = click(&w, 1, 1, &state);
        send(
            &w,
            &mut state,
            TableMsg::PointerDown {
                x,
                y,
                pointer_id: 1,
                button: PointerButton::Primary,
                click_count: 2,
            },
        );
        assert_eq!(state.editing.as_ref().map(|e| e.position), Some(CellPosition::new(1, 1)));
    }

    #[test]
    fn test_right_click_opens_menu_only_over_selection() {
        let w = widget(DOC);
        let mut state = TableState::default();
        let (x, y) = click(&w, 1, 0, &state);
        let right_click = TableMsg::PointerDown {
            x,
            y,
            pointer_id: 1,
            button: PointerButton::Secondary,
            click_count: 1,
        };

        send(&w, &mut state, right_click.clone());
        assert!(state.menu.is_none());
        assert_eq!(state.selection, Some(Selection::cell(1, 0)));

        send(&w, &mut state, TableMsg::SelectRow(1));
        send(&w, &mut state, right_click);
        assert_eq!(state.menu.map(|m| m.scope), Some(MenuScope::Row(1)));
    }

    #[test]
    fn test_menu_action_commits_structural_edit() {
        let w = widget(DOC);
        let mut state = TableState::default();
        send(
            &w,
            &mut state,
            TableMsg::OpenMenu {
                scope: MenuScope::Column(0),
                x: 0.0,
                y: 0.0,
            },
        );
        let cmd = send(&w, &mut state, TableMsg::Menu(MenuAction::InsertColumnRight)).unwrap();
        let request = cmd.commit().unwrap();
        assert_eq!(
            request.data.header.as_ref().unwrap().texts(),
            vec!["A", "Col 2", "B"]
        );
        assert!(state.menu.is_none());
    }

    #[test]
    fn test_command_while_editing_cancels_draft() {
        let w = widget(DOC);
        let mut state = selected(&w, 1, 0);
        send(&w, &mut state, TableMsg::StartEditingWithChar('z'));

        let cmd = send(&w, &mut state, TableMsg::Command(TableCommand::InsertRowBelow(1))).unwrap();
        let request = cmd.commit().unwrap();
        assert_eq!(request.data.cell_text(1, 0), "1");
        assert_eq!(request.data.row_count(), 3);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_delete_last_column_is_noop() {
        let w = widget("| Only |\n| --- |\n| x |");
        let mut state = TableState::default();
        assert_eq!(
            send(&w, &mut state, TableMsg::Command(TableCommand::DeleteColumn(0))),
            Some(Cmd::Redraw)
        );
    }

    #[test]
    fn test_drag_row_handle_after_next_row() {
        let w = widget(DOC);
        let mut state = TableState::default();
        let view = w.view(&state);
        let (hx, hy) = view.layout.row_handle_rect(1).unwrap().center();
        let target = view.layout.cell_rect(2, 0).unwrap();

        send(
            &w,
            &mut state,
            TableMsg::PointerDown {
                x: hx,
                y: hy,
                pointer_id: 4,
                button: PointerButton::Primary,
                click_count: 1,
            },
        );
        assert_eq!(state.selection, Some(Selection::Row(1)));
        assert!(state.is_dragging());

        let y = target.y + target.height * 0.8;
        send(&w, &mut state, TableMsg::PointerMove { x: hx, y, pointer_id: 4 });
        let cmd = send(&w, &mut state, TableMsg::PointerUp { x: hx, y, pointer_id: 4 }).unwrap();

        let request = cmd.commit().unwrap();
        assert_eq!(request.data.cell_text(1, 0), "3");
        assert_eq!(request.data.cell_text(2, 0), "1");
        assert_eq!(request.restore, Some(Selection::Row(2)));
    }

    #[test]
    fn test_pointer_cancel_discards_drag() {
        let w = widget(DOC);
        let mut state = TableState::default();
        let (hx, hy) = w.view(&state).layout.column_handle_rect(1).unwrap().center();
        send(
            &w,
            &mut state,
            TableMsg::PointerDown {
                x: hx,
                y: hy,
                pointer_id: 2,
                button: PointerButton::Primary,
                click_count: 1,
            },
        );
        send(&w, &mut state, TableMsg::PointerMove { x: 0.0, y: hy, pointer_id: 2 });
        assert_eq!(
            send(&w, &mut state, TableMsg::PointerCancel { pointer_id: 2 }),
            Some(Cmd::Redraw)
        );
        assert!(!state.is_dragging());
        assert_eq!(state.selection, Some(Selection::Column(1)));
    }

    #[test]
    fn test_blur_during_drag_releases_capture_without_commit() {
        let w = widget(DOC);
        let mut state = TableState::default();
        let mut capture = crate::host::CaptureScope::default();
        let layout = w.view(&state).layout;
        let (hx, hy) = layout.row_handle_rect(1).unwrap().center();
        let below = layout.cell_rect(2, 0).unwrap();

        update_table(
            &w,
            &mut state,
            &mut capture,
            TableMsg::PointerDown {
                x: hx,
                y: hy,
                pointer_id: 7,
                button: PointerButton::Primary,
                click_count: 1,
            },
        );
        let y = below.y + below.height * 0.8;
        update_table(&w, &mut state, &mut capture, TableMsg::PointerMove { x: hx, y, pointer_id: 7 });
        assert!(state.drag.is_some());
        assert_eq!(capture.captured(), Some(7));

        let cmd = update_table(&w, &mut state, &mut capture, TableMsg::Blur);
        assert_eq!(cmd, Some(Cmd::Redraw));
        assert!(state.drag.is_none());
        assert_eq!(capture.captured(), None);
        assert_eq!(state.selection, None);

        // The release that follows finds nothing to drop
        let up = TableMsg::PointerUp { x: hx, y, pointer_id: 7 };
        assert_eq!(update_table(&w, &mut state, &mut capture, up), None);
    }

    #[test]
    fn test_focus_cell_clamps() {
        let w = widget(DOC);
        let mut state = TableState::default();
        send(&w, &mut state, TableMsg::FocusCell(Selection::cell(10, 10)));
        assert_eq!(state.selection, Some(Selection::cell(2, 1)));
    }
}
