//! Table data model
//!
//! A table is a header row, zero or more body rows and one alignment per
//! column. Mutators work on `&mut self`; callers clone the model they got
//! from the document, mutate the clone and commit it, so the model a widget
//! was built from is never changed in place.

use std::ops::Range;

use super::markdown::to_storage_form;

/// Row index that addresses the header in cell coordinates
pub const HEADER_ROW: usize = 0;

/// Where a cell's text came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceSpan {
    /// Byte range of the cell text in the document it was read from
    Document(Range<usize>),
    /// Created in memory, not written back yet
    #[default]
    Detached,
}

/// A single table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Cell text in storage form (single line, pipes unescaped)
    pub text: String,
    pub span: SourceSpan,
}

impl Cell {
    /// Create a detached cell
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: SourceSpan::Detached,
        }
    }

    /// Create a cell read from the document at `span`
    pub fn with_span(text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            text: text.into(),
            span: SourceSpan::Document(span),
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.span, SourceSpan::Detached)
    }
}

/// An ordered sequence of cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Build a row of detached cells from plain strings
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(Cell::new).collect(),
        }
    }

    /// A row of `len` empty detached cells
    pub fn empty(len: usize) -> Self {
        Self {
            cells: vec![Cell::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell texts, in column order
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

/// Column alignment, as written in the separator line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    None,
}

impl Alignment {
    /// Separator cell for this alignment (`:---`, `:---:`, `---:`, `---`)
    pub fn marker(self) -> &'static str {
        match self {
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
            Alignment::None => "---",
        }
    }

    /// Parse a separator cell by its leading/trailing colons.
    ///
    /// Returns None if the cell is not a valid separator (`:?-+:?`).
    pub fn from_marker(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        let leading = cell.starts_with(':');
        let trailing = cell.len() > 1 && cell.ends_with(':');

        let start = usize::from(leading);
        let end = cell.len() - usize::from(trailing);
        if start >= end {
            return None;
        }
        let dashes = &cell[start..end];
        if !dashes.chars().all(|c| c == '-') {
            return None;
        }

        Some(match (leading, trailing) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        })
    }

    /// Human readable name (menus, CLI)
    pub fn label(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::None => "none",
        }
    }
}

/// Placeholder name for a header cell the document did not provide
pub fn header_placeholder(col: usize) -> String {
    format!("Col {}", col + 1)
}

/// In-memory representation of one pipe table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub header: Option<Row>,
    pub rows: Vec<Row>,
    pub alignments: Vec<Alignment>,
}

impl TableData {
    pub fn new(header: Option<Row>, rows: Vec<Row>, alignments: Vec<Alignment>) -> Self {
        Self {
            header,
            rows,
            alignments,
        }
    }

    /// Build a normalized table from plain strings
    pub fn from_texts(header: &[&str], rows: &[&[&str]]) -> Self {
        let mut data = Self {
            header: Some(Row::from_texts(header.iter().copied())),
            rows: rows
                .iter()
                .map(|r| Row::from_texts(r.iter().copied()))
                .collect(),
            alignments: Vec::new(),
        };
        data.normalize();
        data
    }

    /// `max(header cells, every row's cells, 1)`
    pub fn column_count(&self) -> usize {
        let header = self.header.as_ref().map(Row::len).unwrap_or(0);
        self.rows
            .iter()
            .map(Row::len)
            .fold(header, usize::max)
            .max(1)
    }

    /// Number of body rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of addressable cells, header row included
    pub fn total_cells(&self) -> usize {
        (self.row_count() + 1) * self.column_count()
    }

    /// Pad header, rows and alignments to `column_count`
    pub fn normalize(&mut self) {
        let columns = self.column_count();

        let header = self.header.get_or_insert_with(Row::default);
        for col in header.cells.len()..columns {
            header.cells.push(Cell::new(header_placeholder(col)));
        }

        for row in &mut self.rows {
            row.cells.resize_with(columns, Cell::default);
        }

        self.alignments.resize(columns, Alignment::None);

        // Cells are single-line in storage form
        let cells = self.header.iter_mut().chain(self.rows.iter_mut());
        for cell in cells.flat_map(|row| row.cells.iter_mut()) {
            if cell.text.contains(['\n', '\r']) {
                cell.text = to_storage_form(&cell.text);
            }
        }
    }

    /// Normalized copy of this table
    pub fn normalized(&self) -> Self {
        let mut data = self.clone();
        data.normalize();
        data
    }

    /// Check the post-normalization invariant
    pub fn is_normalized(&self) -> bool {
        let columns = self.column_count();
        self.header.as_ref().is_some_and(|h| h.len() == columns)
            && self.rows.iter().all(|r| r.len() == columns)
            && self.alignments.len() == columns
            && self
                .header
                .iter()
                .chain(&self.rows)
                .flat_map(|row| &row.cells)
                .all(|cell| !cell.text.contains(['\n', '\r']))
    }

    /// Compare cell text and alignments, ignoring source spans
    pub fn same_content(&self, other: &TableData) -> bool {
        fn texts(row: Option<&Row>) -> Vec<&str> {
            row.map(Row::texts).unwrap_or_default()
        }

        texts(self.header.as_ref()) == texts(other.header.as_ref())
            && self.alignments == other.alignments
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.texts() == b.texts())
    }

    /// Cell at `row` (0 = header) and `col`
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row == HEADER_ROW {
            self.header.as_ref()?.cells.get(col)
        } else {
            self.rows.get(row - 1)?.cells.get(col)
        }
    }

    /// Cell text, empty if out of range
    pub fn cell_text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Replace the text of a cell (row 0 = header). The cell becomes detached.
    ///
    /// Returns false if the position is out of range or the text is unchanged.
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> bool {
        self.normalize();
        let text = to_storage_form(text);
        let target = if row == HEADER_ROW {
            self.header.as_mut().and_then(|h| h.cells.get_mut(col))
        } else {
            self.rows
                .get_mut(row - 1)
                .and_then(|r| r.cells.get_mut(col))
        };

        match target {
            Some(cell) if cell.text != text => {
                *cell = Cell::new(text);
                true
            }
            _ => false,
        }
    }

    /// Insert an empty body row before body index `index` (clamped)
    pub fn insert_row(&mut self, index: usize) {
        self.normalize();
        let index = index.min(self.rows.len());
        self.rows.insert(index, Row::empty(self.column_count()));
    }

    /// Remove body row `index`; false if out of range
    pub fn delete_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Insert a column before `index` (clamped). The new header is `Col {index + 1}`.
    pub fn insert_column(&mut self, index: usize) {
        self.normalize();
        let index = index.min(self.column_count());

        if let Some(header) = self.header.as_mut() {
            header
                .cells
                .insert(index, Cell::new(header_placeholder(index)));
        }
        for row in &mut self.rows {
            row.cells.insert(index, Cell::default());
        }
        self.alignments.insert(index, Alignment::None);
    }

    /// Remove column `index`.
    ///
    /// A one-column table is left unchanged; returns false in that case and
    /// when `index` is out of range.
    pub fn delete_column(&mut self, index: usize) -> bool {
        self.normalize();
        let columns = self.column_count();
        if columns <= 1 || index >= columns {
            return false;
        }

        if let Some(header) = self.header.as_mut() {
            header.cells.remove(index);
        }
        for row in &mut self.rows {
            row.cells.remove(index);
        }
        self.alignments.remove(index);
        true
    }

    /// Set a column's alignment; false if out of range or unchanged
    pub fn set_alignment(&mut self, col: usize, alignment: Alignment) -> bool {
        self.normalize();
        match self.alignments.get_mut(col) {
            Some(current) if *current != alignment => {
                *current = alignment;
                true
            }
            _ => false,
        }
    }

    /// Move body row `source` so it lands before the row currently at `target`.
    ///
    /// `target` ranges over `0..=row_count`; a target after the source is
    /// adjusted for the removal. Returns false when nothing moves.
    pub fn reorder_rows(&mut self, source: usize, target: usize) -> bool {
        let Some(dest) = reorder_destination(self.rows.len(), source, target) else {
            return false;
        };
        let row = self.rows.remove(source);
        self.rows.insert(dest, row);
        true
    }

    /// Move column `source` before the column currently at `target`,
    /// shifting header, every row and alignments in lock-step.
    pub fn reorder_columns(&mut self, source: usize, target: usize) -> bool {
        self.normalize();
        let Some(dest) = reorder_destination(self.column_count(), source, target) else {
            return false;
        };

        if let Some(header) = self.header.as_mut() {
            let cell = header.cells.remove(source);
            header.cells.insert(dest, cell);
        }
        for row in &mut self.rows {
            let cell = row.cells.remove(source);
            row.cells.insert(dest, cell);
        }
        let alignment = self.alignments.remove(source);
        self.alignments.insert(dest, alignment);
        true
    }
}

/// Index the moved element ends up at after "remove, then insert at target"
fn reorder_destination(len: usize, source: usize, target: usize) -> Option<usize> {
    if source >= len || target > len {
        return None;
    }
    let dest = if target > source { target - 1 } else { target };
    (dest != source).then_some(dest)
}
