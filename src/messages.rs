//! Message types for the Elm-style architecture
//!
//! All table state changes flow through these message types.

use crate::commands::MenuAction;
use crate::table::{MenuScope, Selection, TableCommand};

/// Pointer buttons the grid reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
}

/// Cursor motions inside the edit overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMotion {
    Left,
    Right,
    WordLeft,
    WordRight,
    /// Start of the current draft line
    Home,
    /// End of the current draft line
    End,
}

/// Messages for one table widget
#[derive(Debug, Clone, PartialEq)]
pub enum TableMsg {
    // === Selection & navigation ===
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Tab: next cell in row-major order (commits an active edit)
    NextCell,
    /// Shift+Tab
    PrevCell,
    RowStart,
    RowEnd,
    FirstCell,
    LastCell,
    SelectCell { row: usize, col: usize },
    SelectRow(usize),
    SelectColumn(usize),
    /// Restore a selection after a rebuild (focus restoration)
    FocusCell(Selection),

    // === Cell editing ===
    /// Enter: start editing the selected cell, or commit the active edit
    Enter,
    /// F2 / double-click on the selected cell
    StartEditing,
    /// Printable character typed on a selected cell
    StartEditingWithChar(char),
    /// Escape: discard the edit, else close the menu, else clear the selection
    Escape,
    EditInsertChar(char),
    /// Shift+Enter inside the edit overlay
    EditInsertNewline,
    EditDeleteBackward,
    EditDeleteForward,
    EditDeleteWordBackward,
    EditDeleteWordForward,
    EditCursor { motion: EditMotion, extend: bool },
    EditSelectAll,
    EditCopy,
    EditCut,
    EditPaste,
    /// Paste text the host already read from the clipboard
    EditPasteText(String),
    CompositionStart,
    CompositionEnd,

    // === Pointer ===
    PointerDown {
        x: f32,
        y: f32,
        pointer_id: u64,
        button: PointerButton,
        click_count: u8,
    },
    PointerMove { x: f32, y: f32, pointer_id: u64 },
    PointerUp { x: f32, y: f32, pointer_id: u64 },
    PointerCancel { pointer_id: u64 },

    // === Focus ===
    /// Focus moved to an element outside the widget
    Blur,

    // === Menu & structural commands ===
    OpenMenu { scope: MenuScope, x: f32, y: f32 },
    CloseMenu,
    Menu(MenuAction),
    /// Toolbar-equivalent structural edit
    Command(TableCommand),
}

impl TableMsg {
    /// New user input that makes pending focus restoration stale
    pub fn is_user_input(&self) -> bool {
        !matches!(
            self,
            TableMsg::FocusCell(_)
                | TableMsg::Blur
                | TableMsg::PointerMove { .. }
                | TableMsg::PointerUp { .. }
                | TableMsg::PointerCancel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_restoration_is_not_user_input() {
        assert!(!TableMsg::FocusCell(Selection::cell(0, 0)).is_user_input());
        assert!(!TableMsg::PointerMove {
            x: 0.0,
            y: 0.0,
            pointer_id: 1
        }
        .is_user_input());
        assert!(TableMsg::EditInsertChar('a').is_user_input());
        assert!(TableMsg::PointerDown {
            x: 0.0,
            y: 0.0,
            pointer_id: 1,
            button: PointerButton::Primary,
            click_count: 1,
        }
        .is_user_input());
    }
}
