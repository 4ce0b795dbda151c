//! Host text surface
//!
//! The grid widgets never own the document. A host holds the Markdown text,
//! mounts one widget per located table and applies the single text
//! replacement each commit produces. `MarkdownSurface` is the host shipped
//! with the crate; embedders implement `HostSurface` for their own editor.

pub mod commit;
pub mod document;
pub mod focus;
pub mod surface;

use std::ops::Range;

use crate::table::Selection;

pub use commit::build_replacement;
pub use document::{Document, EditOperation};
pub use focus::{FocusOutcome, FocusScheduler, FrameTicket};
pub use surface::{CaptureScope, MarkdownSurface};

/// How the host view reacts to a text replacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Keep the current scroll offset; restored on the next paint
    #[default]
    Preserve,
    /// Scroll the replaced range into view
    Auto,
}

/// A single edit of the host text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReplacement {
    /// Byte range of the current text to replace
    pub range: Range<usize>,
    pub text: String,
}

/// A table widget as currently mounted by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub index: usize,
    /// Document lines of the table (end exclusive)
    pub line_range: Range<usize>,
}

impl RenderedTable {
    pub fn start_line(&self) -> usize {
        self.line_range.start
    }
}

/// What the grid needs from the editor hosting it
pub trait HostSurface {
    /// Replace `range` (bytes) of the document with `text`
    fn replace_range(&mut self, range: Range<usize>, text: &str, scroll: ScrollBehavior);

    /// Tables mounted right now, in document order
    fn rendered_tables(&self) -> Vec<RenderedTable>;

    /// Give keyboard focus to table `index` and select `selection` in it
    fn focus_table_cell(&mut self, index: usize, selection: Selection);

    /// Give keyboard focus back to the text surface
    fn focus_host(&mut self);

    /// Move the host caret to the start of `line`
    fn place_cursor(&mut self, line: usize);
}
