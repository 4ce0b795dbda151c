//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The context-menu registry lives here too: each menu entry names a
//! structural edit that becomes a `TableCommand` once its scope is known.

use std::ops::Range;

use crate::table::{Alignment, MenuScope, Selection, TableCommand, TableData, HEADER_ROW};

// ============================================================================
// Context Menu Registry
// ============================================================================

/// Identifies an entry of the table context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    InsertRowAbove,
    InsertRowBelow,
    DeleteRow,
    InsertColumnLeft,
    InsertColumnRight,
    DeleteColumn,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignNone,
}

/// Which menu an entry appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Row,
    Column,
}

/// A context menu entry
#[derive(Debug, Clone)]
pub struct MenuItemDef {
    pub id: MenuAction,
    pub label: &'static str,
    pub kind: MenuKind,
}

/// Static registry of all context menu entries
pub static TABLE_MENU: &[MenuItemDef] = &[
    MenuItemDef {
        id: MenuAction::InsertRowAbove,
        label: "Insert Row Above",
        kind: MenuKind::Row,
    },
    MenuItemDef {
        id: MenuAction::InsertRowBelow,
        label: "Insert Row Below",
        kind: MenuKind::Row,
    },
    MenuItemDef {
        id: MenuAction::DeleteRow,
        label: "Delete Row",
        kind: MenuKind::Row,
    },
    MenuItemDef {
        id: MenuAction::InsertColumnLeft,
        label: "Insert Column Left",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::InsertColumnRight,
        label: "Insert Column Right",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::DeleteColumn,
        label: "Delete Column",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::AlignLeft,
        label: "Align Left",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::AlignCenter,
        label: "Align Center",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::AlignRight,
        label: "Align Right",
        kind: MenuKind::Column,
    },
    MenuItemDef {
        id: MenuAction::AlignNone,
        label: "Clear Alignment",
        kind: MenuKind::Column,
    },
];

/// Entries shown for a menu scope.
///
/// The header row has no row above it and cannot be deleted.
pub fn menu_items(scope: MenuScope) -> Vec<&'static MenuItemDef> {
    TABLE_MENU
        .iter()
        .filter(|item| match scope {
            MenuScope::Row(row) => {
                item.kind == MenuKind::Row
                    && !(row == HEADER_ROW
                        && matches!(item.id, MenuAction::InsertRowAbove | MenuAction::DeleteRow))
            }
            MenuScope::Column(_) => item.kind == MenuKind::Column,
        })
        .collect()
}

impl MenuAction {
    /// Structural edit for this entry in `scope`; None if it does not apply
    pub fn to_command(self, scope: MenuScope) -> Option<TableCommand> {
        let align = |alignment| match scope {
            MenuScope::Column(col) => Some(TableCommand::SetAlignment { col, alignment }),
            MenuScope::Row(_) => None,
        };

        match (self, scope) {
            (MenuAction::InsertRowAbove, MenuScope::Row(row)) => {
                Some(TableCommand::InsertRowAbove(row))
            }
            (MenuAction::InsertRowBelow, MenuScope::Row(row)) => {
                Some(TableCommand::InsertRowBelow(row))
            }
            (MenuAction::DeleteRow, MenuScope::Row(row)) => Some(TableCommand::DeleteRow(row)),
            (MenuAction::InsertColumnLeft, MenuScope::Column(col)) => {
                Some(TableCommand::InsertColumnLeft(col))
            }
            (MenuAction::InsertColumnRight, MenuScope::Column(col)) => {
                Some(TableCommand::InsertColumnRight(col))
            }
            (MenuAction::DeleteColumn, MenuScope::Column(col)) => {
                Some(TableCommand::DeleteColumn(col))
            }
            (MenuAction::AlignLeft, _) => align(Alignment::Left),
            (MenuAction::AlignCenter, _) => align(Alignment::Center),
            (MenuAction::AlignRight, _) => align(Alignment::Right),
            (MenuAction::AlignNone, _) => align(Alignment::None),
            _ => None,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A serialized-table write the host should perform
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRequest {
    /// Document lines the table occupied when the widget was built
    pub line_range: Range<usize>,
    /// The mutated, normalized table
    pub data: TableData,
    /// Selection to restore once the new table is mounted
    pub restore: Option<Selection>,
}

impl CommitRequest {
    pub fn start_line(&self) -> usize {
        self.line_range.start
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Repaint the widget
    Redraw,
    /// Replace the table's text in the document
    Commit(CommitRequest),
    /// Selection left the table; move the host cursor to `line`
    HandOff { line: usize },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // The document change rebuilds every widget
            Cmd::Commit(_) => true,
            Cmd::HandOff { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// The commit request, if this command (or a batch member) carries one
    pub fn commit(&self) -> Option<&CommitRequest> {
        match self {
            Cmd::Commit(request) => Some(request),
            Cmd::Batch(cmds) => cmds.iter().find_map(Cmd::commit),
            _ => None,
        }
    }

    /// Flatten batches into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Convert Option<Cmd> with None to Cmd::None
    pub fn from_option(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
