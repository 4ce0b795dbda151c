//! Key bindings for the table grid
//!
//! Translates keystrokes into `TableMsg`s. Bindings depend on whether a cell
//! is being edited: arrows move the selection in the grid but the caret in
//! the edit overlay.

use std::fmt;

use crate::messages::{EditMotion, TableMsg};

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Modifiers other than Shift (these suppress text input)
    #[inline]
    pub const fn has_command_modifier(self) -> bool {
        self.0 & 0b1101 != 0
    }

    /// Check if the platform command key is held (Cmd on macOS, Ctrl elsewhere)
    pub fn has_cmd(self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta()
        } else {
            self.ctrl()
        }
    }

    /// Word-motion modifier (Option on macOS, Ctrl elsewhere)
    pub fn has_word(self) -> bool {
        if cfg!(target_os = "macos") {
            self.alt()
        } else {
            self.ctrl()
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Keys the grid handles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key as typed (case preserved)
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
}

/// A key press with its modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub fn plain(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods != Modifiers::NONE {
            write!(f, "{}+", self.mods)?;
        }
        write!(f, "{:?}", self.key)
    }
}

/// Map a keystroke to a table message.
///
/// Returns None for keys the grid does not handle, so the host can process
/// them.
pub fn map_keystroke(stroke: Keystroke, is_editing: bool) -> Option<TableMsg> {
    let mods = stroke.mods;
    let extend = mods.shift();

    if is_editing {
        return Some(match stroke.key {
            KeyCode::Escape => TableMsg::Escape,
            KeyCode::Enter if extend => TableMsg::EditInsertNewline,
            KeyCode::Enter => TableMsg::Enter,
            KeyCode::Tab if extend => TableMsg::PrevCell,
            KeyCode::Tab => TableMsg::NextCell,
            KeyCode::Backspace if mods.has_word() => TableMsg::EditDeleteWordBackward,
            KeyCode::Backspace => TableMsg::EditDeleteBackward,
            KeyCode::Delete if mods.has_word() => TableMsg::EditDeleteWordForward,
            KeyCode::Delete => TableMsg::EditDeleteForward,
            KeyCode::Left if mods.has_word() => TableMsg::EditCursor {
                motion: EditMotion::WordLeft,
                extend,
            },
            KeyCode::Right if mods.has_word() => TableMsg::EditCursor {
                motion: EditMotion::WordRight,
                extend,
            },
            KeyCode::Left => TableMsg::EditCursor {
                motion: EditMotion::Left,
                extend,
            },
            KeyCode::Right => TableMsg::EditCursor {
                motion: EditMotion::Right,
                extend,
            },
            KeyCode::Home => TableMsg::EditCursor {
                motion: EditMotion::Home,
                extend,
            },
            KeyCode::End => TableMsg::EditCursor {
                motion: EditMotion::End,
                extend,
            },
            KeyCode::Char(c) if mods.has_cmd() => match c.to_ascii_lowercase() {
                'a' => TableMsg::EditSelectAll,
                'c' => TableMsg::EditCopy,
                'x' => TableMsg::EditCut,
                'v' => TableMsg::EditPaste,
                _ => return None,
            },
            KeyCode::Char(c) if !mods.has_command_modifier() => TableMsg::EditInsertChar(c),
            _ => return None,
        });
    }

    Some(match stroke.key {
        KeyCode::Up => TableMsg::MoveUp,
        KeyCode::Down => TableMsg::MoveDown,
        KeyCode::Left => TableMsg::MoveLeft,
        KeyCode::Right => TableMsg::MoveRight,
        KeyCode::Tab if extend => TableMsg::PrevCell,
        KeyCode::Tab => TableMsg::NextCell,
        KeyCode::Home if mods.has_cmd() => TableMsg::FirstCell,
        KeyCode::End if mods.has_cmd() => TableMsg::LastCell,
        KeyCode::Home => TableMsg::RowStart,
        KeyCode::End => TableMsg::RowEnd,
        KeyCode::Enter => TableMsg::Enter,
        KeyCode::F(2) => TableMsg::StartEditing,
        KeyCode::Escape => TableMsg::Escape,
        KeyCode::Char(c) if !mods.has_command_modifier() && !c.is_control() => {
            TableMsg::StartEditingWithChar(c)
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bindings() {
        assert_eq!(
            map_keystroke(Keystroke::plain(KeyCode::Tab), false),
            Some(TableMsg::NextCell)
        );
        assert_eq!(
            map_keystroke(Keystroke::new(KeyCode::Tab, Modifiers::SHIFT), false),
            Some(TableMsg::PrevCell)
        );
        assert_eq!(
            map_keystroke(Keystroke::plain(KeyCode::F(2)), false),
            Some(TableMsg::StartEditing)
        );
        assert_eq!(
            map_keystroke(Keystroke::plain(KeyCode::Char('q')), false),
            Some(TableMsg::StartEditingWithChar('q'))
        );
        assert_eq!(map_keystroke(Keystroke::plain(KeyCode::Backspace), false), None);
    }

    #[test]
    fn test_edit_bindings() {
        assert_eq!(
            map_keystroke(Keystroke::new(KeyCode::Enter, Modifiers::SHIFT), true),
            Some(TableMsg::EditInsertNewline)
        );
        assert_eq!(
            map_keystroke(Keystroke::plain(KeyCode::Enter), true),
            Some(TableMsg::Enter)
        );
        assert_eq!(
            map_keystroke(Keystroke::plain(KeyCode::Left), true),
            Some(TableMsg::EditCursor {
                motion: EditMotion::Left,
                extend: false
            })
        );
        assert_eq!(
            map_keystroke(Keystroke::new(KeyCode::Char('A'), Modifiers::SHIFT), true),
            Some(TableMsg::EditInsertChar('A'))
        );
        // Up/Down are not caret motions in a cell
        assert_eq!(map_keystroke(Keystroke::plain(KeyCode::Up), true), None);
    }

    #[test]
    fn test_cmd_shortcuts_while_editing() {
        let cmd = if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        };
        assert_eq!(
            map_keystroke(Keystroke::new(KeyCode::Char('v'), cmd), true),
            Some(TableMsg::EditPaste)
        );
        assert_eq!(
            map_keystroke(Keystroke::new(KeyCode::Char('a'), cmd), true),
            Some(TableMsg::EditSelectAll)
        );
    }

    #[test]
    fn test_keystroke_display() {
        let stroke = Keystroke::new(KeyCode::Enter, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(stroke.to_string(), "Ctrl+Shift+Enter");
    }
}
