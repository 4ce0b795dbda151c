//! Markdown pipe-table grid editing
//!
//! Provides a spreadsheet-like view of the pipe tables in a Markdown
//! document. The document text stays the source of truth: every change is
//! serialized back into it as a single text replacement.

pub mod cell_edit;
pub mod command;
pub mod drag;
pub mod identity;
pub mod locate;
pub mod markdown;
pub mod model;
pub mod navigation;
pub mod registry;
pub mod remap;
pub mod render;
pub mod state;
pub mod widget;

pub use cell_edit::{CellEdit, CellEditState, CellEditor};
pub use command::{Applied, TableCommand};
pub use drag::{begin_drag, cancel_drag, finish_drag, track_drag, InputAdapter, NoCapture};
pub use identity::TableIdentity;
pub use locate::{locate_tables, LineIndex, TableBlock};
pub use markdown::{deserialize, serialize, to_display_form, to_storage_form, LINE_BREAK_TOKEN};
pub use model::{Alignment, Cell, Row, SourceSpan, TableData, HEADER_ROW};
pub use navigation::{ArrowMove, Direction, Edge, GridSize};
pub use registry::SelectionRegistry;
pub use remap::{remap_index, remap_selection};
pub use render::{Element, ElementKind, GridLayout, GridMetrics, GridView, Rect};
pub use state::{
    CellPosition, ContextMenu, DragAxis, DragState, DropMarker, DropSide, MenuScope, Selection,
    TableState,
};
pub use widget::TableWidget;
