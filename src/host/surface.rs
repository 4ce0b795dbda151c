//! Markdown surface
//!
//! The concrete host: a rope-backed document with one grid widget mounted
//! per pipe table. Every text change re-locates the tables and rebuilds the
//! widgets; interaction state survives only through the selection registry
//! and the focus scheduler.

use std::ops::Range;

use super::commit::build_replacement;
use super::document::Document;
use super::focus::{FocusOutcome, FocusScheduler, FrameTicket};
use super::{HostSurface, RenderedTable, ScrollBehavior};
use crate::commands::{Cmd, CommitRequest};
use crate::config::TableEditorConfig;
use crate::keymap::{map_keystroke, Keystroke};
use crate::messages::TableMsg;
use crate::table::{
    locate_tables, GridMetrics, GridView, InputAdapter, LineIndex, Selection, SelectionRegistry,
    TableState, TableWidget,
};

/// Pointer capture for the surface: at most one pointer is routed to a
/// widget at a time
#[derive(Debug, Default, Clone)]
pub struct CaptureScope {
    held: Option<u64>,
}

impl CaptureScope {
    pub fn captured(&self) -> Option<u64> {
        self.held
    }
}

impl InputAdapter for CaptureScope {
    fn acquire_capture(&mut self, pointer_id: u64) {
        self.held = Some(pointer_id);
    }

    fn release_capture(&mut self, pointer_id: u64) {
        if self.held == Some(pointer_id) {
            self.held = None;
        }
    }

    fn has_capture(&self, pointer_id: u64) -> bool {
        self.held == Some(pointer_id)
    }
}

pub struct MarkdownSurface {
    pub document: Document,
    widgets: Vec<TableWidget>,
    registry: SelectionRegistry,
    focus: FocusScheduler,
    pending: Vec<FrameTicket>,
    capture: CaptureScope,
    metrics: GridMetrics,
    /// Table holding keyboard focus; None when the text surface has it
    focused_table: Option<usize>,
    /// Host caret line
    cursor_line: usize,
    /// First visible line of the host view
    pub scroll_line: usize,
    /// Scroll offset to put back on the next frame
    saved_scroll: Option<usize>,
}

impl MarkdownSurface {
    pub fn new(text: &str, config: &TableEditorConfig) -> Self {
        Self::from_document(Document::with_text(text), config)
    }

    pub fn from_document(document: Document, config: &TableEditorConfig) -> Self {
        let mut surface = Self {
            document,
            widgets: Vec::new(),
            registry: SelectionRegistry::new(),
            focus: FocusScheduler::new(config.focus_retry_frames),
            pending: Vec::new(),
            capture: CaptureScope::default(),
            metrics: GridMetrics::from_config(config),
            focused_table: None,
            cursor_line: 0,
            scroll_line: 0,
            saved_scroll: None,
        };
        surface.reprocess();
        surface
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn widgets(&self) -> &[TableWidget] {
        &self.widgets
    }

    pub fn widget(&self, index: usize) -> Option<&TableWidget> {
        self.widgets.get(index)
    }

    /// Interaction state of table `index`, if it has any
    pub fn state(&self, index: usize) -> Option<&TableState> {
        self.registry.get(&self.widgets.get(index)?.identity)
    }

    pub fn selection(&self, index: usize) -> Option<Selection> {
        self.state(index)?.selection
    }

    pub fn focused_table(&self) -> Option<usize> {
        self.focused_table
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn capture(&self) -> &CaptureScope {
        &self.capture
    }

    pub fn has_pending_focus(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn view(&self, index: usize) -> Option<GridView> {
        let widget = self.widgets.get(index)?;
        let state = self.registry.get(&widget.identity).cloned().unwrap_or_default();
        Some(widget.view(&state))
    }

    /// Deliver a message to table `index` and execute what it returns
    pub fn send(&mut self, index: usize, msg: TableMsg) -> Cmd {
        if index >= self.widgets.len() {
            tracing::warn!(index, ?msg, "message for a table that is not mounted");
            return Cmd::None;
        }

        if msg.is_user_input() {
            // New input supersedes any pending restoration
            if !self.pending.is_empty() {
                tracing::debug!(target: "focus", "restoration cancelled by input");
            }
            self.focus.invalidate();
            self.pending.clear();

            if let Some(previous) = self.focused_table.filter(|prev| *prev != index) {
                self.blur_table(previous);
            }
            if index >= self.widgets.len() {
                return Cmd::None;
            }
            self.focused_table = Some(index);
        }

        let cmd = self.dispatch(index, msg);
        self.execute(cmd.clone());
        cmd
    }

    /// Deliver a keystroke to table `index`; None if the grid ignores it
    pub fn key(&mut self, index: usize, stroke: Keystroke) -> Option<Cmd> {
        let is_editing = self.state(index).is_some_and(TableState::is_editing);
        let msg = map_keystroke(stroke, is_editing)?;
        Some(self.send(index, msg))
    }

    /// Edit the text directly, as typing into the host surface would
    pub fn edit_text(&mut self, range: Range<usize>, text: &str) {
        self.focus.invalidate();
        self.pending.clear();
        self.replace_range(range, text, ScrollBehavior::Auto);
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        if changed {
            self.reprocess();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        if changed {
            self.reprocess();
        }
        changed
    }

    /// Run one animation frame: restore scroll and advance focus tickets.
    ///
    /// Returns true if focus moved.
    pub fn animation_frame(&mut self) -> bool {
        if let Some(scroll) = self.saved_scroll.take() {
            self.scroll_line = scroll.min(self.document.line_count().saturating_sub(1));
        }

        let tables = self.rendered_tables();
        let mut moved = false;
        for ticket in std::mem::take(&mut self.pending) {
            match self.focus.run(ticket, &tables) {
                FocusOutcome::Stale => {}
                FocusOutcome::Retry(next) => self.pending.push(next),
                FocusOutcome::Focus { index, selection } => {
                    self.focus_table_cell(index, selection);
                    moved = true;
                }
                FocusOutcome::Fallback => {
                    self.focus_host();
                    moved = true;
                }
            }
        }
        moved
    }

    /// Re-locate tables and rebuild widgets after a text change
    pub fn reprocess(&mut self) {
        let source = self.document.text();
        let line_count = LineIndex::new(&source).line_count();

        let rebuilt: Vec<TableWidget> = locate_tables(&source)
            .iter()
            .map(|block| {
                let mut widget = TableWidget::from_block(&source, block, line_count, self.metrics);
                widget.origin = (0.0, block.start_line() as f32 * self.metrics.line_height);
                match self.widgets.iter().find(|old| old.same_table(&widget)) {
                    Some(old) => TableWidget {
                        index: widget.index,
                        doc_line_count: line_count,
                        origin: widget.origin,
                        ..old.clone()
                    },
                    None => widget,
                }
            })
            .collect();

        let identities: Vec<_> = rebuilt.iter().map(|w| w.identity).collect();
        self.registry.retain_only(&identities);

        if let Some(index) = self.focused_table {
            let still_mounted = self.widgets.get(index).is_some_and(|old| {
                rebuilt.get(index).is_some_and(|new| new.identity == old.identity)
            });
            if !still_mounted {
                self.focused_table = None;
            }
        }

        tracing::debug!(tables = rebuilt.len(), revision = self.document.revision, "tables rebuilt");
        self.widgets = rebuilt;
    }

    fn dispatch(&mut self, index: usize, msg: TableMsg) -> Cmd {
        let Some(widget) = self.widgets.get(index) else {
            return Cmd::None;
        };
        let state = self.registry.state_mut(widget.identity);
        crate::update::update(widget, state, &mut self.capture, msg).into()
    }

    fn execute(&mut self, cmd: Cmd) {
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::Commit(request) => self.commit(request),
                Cmd::HandOff { line } => self.place_cursor(line),
                Cmd::Redraw | Cmd::None | Cmd::Batch(_) => {}
            }
        }
    }

    fn commit(&mut self, request: CommitRequest) {
        let source = self.document.text();
        if request.line_range.end > LineIndex::new(&source).line_count() {
            tracing::warn!(lines = ?request.line_range, "commit for a table that is gone");
            return;
        }

        let replacement = build_replacement(&source, request.line_range.clone(), &request.data);
        self.focused_table = None;
        self.replace_range(replacement.range, &replacement.text, ScrollBehavior::Preserve);

        match request.restore {
            Some(selection) => {
                let ticket = self.focus.schedule(request.start_line(), selection);
                self.pending.push(ticket);
            }
            // Older tickets must not pull focus back after this commit
            None => self.focus.invalidate(),
        }
    }

    fn blur_table(&mut self, index: usize) {
        self.focused_table = None;
        let cmd = self.dispatch(index, TableMsg::Blur);
        self.execute(cmd);
    }
}

impl HostSurface for MarkdownSurface {
    fn replace_range(&mut self, range: Range<usize>, text: &str, scroll: ScrollBehavior) {
        match scroll {
            ScrollBehavior::Preserve => self.saved_scroll = Some(self.scroll_line),
            ScrollBehavior::Auto => {
                let line = self.document.buffer.byte_to_line(range.start.min(self.document.buffer.len_bytes()));
                if line < self.scroll_line {
                    self.scroll_line = line;
                }
            }
        }
        self.document.replace(range, text);
        self.reprocess();
    }

    fn rendered_tables(&self) -> Vec<RenderedTable> {
        self.widgets
            .iter()
            .map(|w| RenderedTable {
                index: w.index,
                line_range: w.line_range.clone(),
            })
            .collect()
    }

    fn focus_table_cell(&mut self, index: usize, selection: Selection) {
        if index >= self.widgets.len() {
            tracing::warn!(index, "focus target is not mounted");
            return;
        }
        if let Some(previous) = self.focused_table.filter(|prev| *prev != index) {
            self.blur_table(previous);
        }
        self.focused_table = Some(index);
        let cmd = self.dispatch(index, TableMsg::FocusCell(selection));
        self.execute(cmd);
    }

    fn focus_host(&mut self) {
        if let Some(previous) = self.focused_table.take() {
            self.blur_table(previous);
        }
    }

    fn place_cursor(&mut self, line: usize) {
        self.focus_host();
        self.cursor_line = line.min(self.document.line_count().saturating_sub(1));
    }
}
