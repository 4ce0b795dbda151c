//! Table widget
//!
//! One mounted grid for one located table block. The widget owns the table
//! model read from the document and the geometry it is drawn with; its
//! interaction state lives in the surface's `SelectionRegistry`.

use std::ops::Range;

use super::identity::TableIdentity;
use super::locate::TableBlock;
use super::model::TableData;
use super::navigation::GridSize;
use super::render::{GridMetrics, GridView};
use super::state::{Selection, TableState};
use crate::commands::{Cmd, CommitRequest};

#[derive(Debug, Clone)]
pub struct TableWidget {
    /// Position among the document's tables
    pub index: usize,
    pub identity: TableIdentity,
    /// Document lines the table occupies (end exclusive)
    pub line_range: Range<usize>,
    /// Normalized model read from the document
    pub data: TableData,
    /// Lines in the document when the widget was built
    pub doc_line_count: usize,
    pub metrics: GridMetrics,
    /// Top-left corner in surface coordinates
    pub origin: (f32, f32),
}

impl TableWidget {
    pub fn from_block(
        source: &str,
        block: &TableBlock,
        doc_line_count: usize,
        metrics: GridMetrics,
    ) -> Self {
        Self {
            index: block.index,
            identity: TableIdentity::of_block(source, block),
            line_range: block.line_range.clone(),
            data: block.seed(source).normalized(),
            doc_line_count,
            metrics,
            origin: (0.0, 0.0),
        }
    }

    pub fn start_line(&self) -> usize {
        self.line_range.start
    }

    /// Whether `other` renders the same table, so this widget can be kept.
    ///
    /// Best effort: any difference means the widget is rebuilt.
    pub fn same_table(&self, other: &TableWidget) -> bool {
        self.identity == other.identity
            && self.line_range == other.line_range
            && self.data.same_content(&other.data)
    }

    pub fn size(&self) -> GridSize {
        GridSize::for_table(self.data.row_count(), self.data.column_count())
    }

    pub fn view(&self, state: &TableState) -> GridView {
        GridView::build(&self.data, state, self.metrics, self.origin)
    }

    /// Document line above the table, if any
    pub fn line_above(&self) -> Option<usize> {
        self.line_range.start.checked_sub(1)
    }

    /// Document line below the table, if any
    pub fn line_below(&self) -> Option<usize> {
        (self.line_range.end < self.doc_line_count).then_some(self.line_range.end)
    }

    /// Ask the host to write `data` in place of this table
    pub fn commit(&self, data: TableData, restore: Option<Selection>) -> Cmd {
        tracing::debug!(
            table = self.index,
            start_line = self.start_line(),
            ?restore,
            "commit requested"
        );
        Cmd::Commit(CommitRequest {
            line_range: self.line_range.clone(),
            data,
            restore,
        })
    }
}
