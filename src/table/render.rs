//! Table grid rendering
//!
//! Builds a retained element tree for one table: cells, row and column
//! handles, the drop indicator while dragging, the edit overlay and the
//! context menu. Layout is in logical pixels from `GridMetrics`; the host
//! paints the elements and routes pointer positions back through
//! `GridView::hit_test`.
//!
//! `GridView::to_text` renders the same layout as a plain-text box grid.

use super::markdown::to_display_form;
use super::model::{Alignment, TableData};
use super::state::{CellPosition, DragAxis, DropMarker, DropSide, MenuScope, Selection, TableState};
use crate::commands::{menu_items, MenuAction};
use crate::config::TableEditorConfig;

/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Sizes the grid is laid out with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub char_width: f32,
    pub line_height: f32,
    /// Width of the row handle column and height of the column handle row
    pub handle_size: f32,
    /// Horizontal padding on each side of a cell's text
    pub padding: f32,
    pub min_column_chars: usize,
    pub max_column_chars: usize,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self::from_config(&TableEditorConfig::default())
    }
}

impl GridMetrics {
    pub fn from_config(config: &TableEditorConfig) -> Self {
        Self {
            char_width: config.char_width,
            line_height: config.line_height,
            handle_size: config.handle_size,
            padding: 6.0,
            min_column_chars: config.min_column_chars,
            max_column_chars: config.max_column_chars.max(config.min_column_chars),
        }
    }
}

/// Truncate text with ellipsis if too long
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        s.chars().take(max_chars).collect()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('…');
        result
    }
}

/// Column and row geometry of one table
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub metrics: GridMetrics,
    pub origin: (f32, f32),
    /// Column widths in characters, clamped to the metric bounds
    pub column_chars: Vec<usize>,
    pub column_x: Vec<f32>,
    pub column_widths: Vec<f32>,
    /// Lines per row, header first
    pub row_lines: Vec<usize>,
    pub row_y: Vec<f32>,
    pub row_heights: Vec<f32>,
}

impl GridLayout {
    pub fn calculate(data: &TableData, metrics: GridMetrics, origin: (f32, f32)) -> Self {
        let columns = data.column_count();
        let rows = data.row_count() + 1;

        let mut column_chars = vec![metrics.min_column_chars; columns];
        let mut row_lines = vec![1; rows];
        for (row, lines) in row_lines.iter_mut().enumerate() {
            for (col, chars) in column_chars.iter_mut().enumerate() {
                let display = to_display_form(data.cell_text(row, col));
                let widest = display.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                *chars = (*chars).max(widest).min(metrics.max_column_chars);
                *lines = (*lines).max(display.lines().count());
            }
        }

        let mut column_x = Vec::with_capacity(columns);
        let mut column_widths = Vec::with_capacity(columns);
        let mut x = origin.0 + metrics.handle_size;
        for chars in &column_chars {
            let width = (*chars as f32 * metrics.char_width + metrics.padding * 2.0).ceil();
            column_x.push(x);
            column_widths.push(width);
            x += width;
        }

        let mut row_y = Vec::with_capacity(rows);
        let mut row_heights = Vec::with_capacity(rows);
        let mut y = origin.1 + metrics.handle_size;
        for lines in &row_lines {
            let height = *lines as f32 * metrics.line_height;
            row_y.push(y);
            row_heights.push(height);
            y += height;
        }

        Self {
            metrics,
            origin,
            column_chars,
            column_x,
            column_widths,
            row_lines,
            row_y,
            row_heights,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_x.len()
    }

    /// Rows including the header
    pub fn row_count(&self) -> usize {
        self.row_y.len()
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Option<Rect> {
        Some(Rect::new(
            *self.column_x.get(col)?,
            *self.row_y.get(row)?,
            *self.column_widths.get(col)?,
            *self.row_heights.get(row)?,
        ))
    }

    pub fn row_handle_rect(&self, row: usize) -> Option<Rect> {
        Some(Rect::new(
            self.origin.0,
            *self.row_y.get(row)?,
            self.metrics.handle_size,
            *self.row_heights.get(row)?,
        ))
    }

    pub fn column_handle_rect(&self, col: usize) -> Option<Rect> {
        Some(Rect::new(
            *self.column_x.get(col)?,
            self.origin.1,
            *self.column_widths.get(col)?,
            self.metrics.handle_size,
        ))
    }

    /// Whole table including handles
    pub fn bounds(&self) -> Rect {
        let right = match (self.column_x.last(), self.column_widths.last()) {
            (Some(x), Some(w)) => x + w,
            _ => self.origin.0 + self.metrics.handle_size,
        };
        let bottom = match (self.row_y.last(), self.row_heights.last()) {
            (Some(y), Some(h)) => y + h,
            _ => self.origin.1 + self.metrics.handle_size,
        };
        Rect::new(self.origin.0, self.origin.1, right - self.origin.0, bottom - self.origin.1)
    }

    /// Drop marker for a row drag at pointer `y`.
    ///
    /// Resolves against body-row bands, so a pointer above or below the grid
    /// still lands before the first or after the last row.
    pub fn row_drop_marker(&self, y: f32) -> Option<DropMarker> {
        let bands: Vec<(f32, f32)> = self
            .row_y
            .iter()
            .zip(&self.row_heights)
            .skip(1)
            .map(|(y, h)| (*y, *h))
            .collect();
        band_marker(&bands, y)
    }

    /// Drop marker for a column drag at pointer `x`
    pub fn column_drop_marker(&self, x: f32) -> Option<DropMarker> {
        let bands: Vec<(f32, f32)> = self
            .column_x
            .iter()
            .zip(&self.column_widths)
            .map(|(x, w)| (*x, *w))
            .collect();
        band_marker(&bands, x)
    }

    /// Line between two rows or columns where a drop would land
    pub fn drop_indicator_rect(&self, axis: DragAxis, marker: DropMarker) -> Option<Rect> {
        const THICKNESS: f32 = 2.0;
        let bounds = self.bounds();
        match axis {
            DragAxis::Row => {
                let rect = self.cell_rect(marker.target_index + 1, 0)?;
                let y = match marker.side {
                    DropSide::Before => rect.y,
                    DropSide::After => rect.bottom(),
                };
                Some(Rect::new(bounds.x, y - THICKNESS / 2.0, bounds.width, THICKNESS))
            }
            DragAxis::Column => {
                let rect = self.cell_rect(0, marker.target_index)?;
                let x = match marker.side {
                    DropSide::Before => rect.x,
                    DropSide::After => rect.right(),
                };
                Some(Rect::new(x - THICKNESS / 2.0, bounds.y, THICKNESS, bounds.height))
            }
        }
    }
}

fn band_marker(bands: &[(f32, f32)], pos: f32) -> Option<DropMarker> {
    let (first_start, _) = *bands.first()?;
    if pos < first_start {
        return Some(DropMarker {
            target_index: 0,
            side: DropSide::Before,
        });
    }

    for (index, (start, len)) in bands.iter().enumerate() {
        if pos < start + len {
            let side = if pos < start + len / 2.0 {
                DropSide::Before
            } else {
                DropSide::After
            };
            return Some(DropMarker {
                target_index: index,
                side,
            });
        }
    }

    Some(DropMarker {
        target_index: bands.len() - 1,
        side: DropSide::After,
    })
}

/// What a rendered element is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Cell(CellPosition),
    /// Handle left of a row (0 = header)
    RowHandle(usize),
    ColumnHandle(usize),
    DropIndicator(DragAxis),
    EditOverlay(CellPosition),
    ContextMenu(MenuScope),
    MenuItem(MenuAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub rect: Rect,
    /// Display text (cells, overlay, menu items)
    pub text: String,
    pub alignment: Alignment,
    pub selected: bool,
}

impl Element {
    fn new(kind: ElementKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            text: String::new(),
            alignment: Alignment::None,
            selected: false,
        }
    }
}

/// Rendered table: layout plus elements in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub layout: GridLayout,
    pub elements: Vec<Element>,
}

impl GridView {
    pub fn build(data: &TableData, state: &TableState, metrics: GridMetrics, origin: (f32, f32)) -> Self {
        let layout = GridLayout::calculate(data, metrics, origin);
        let mut elements = Vec::new();
        let selection = state.selection;

        for col in 0..layout.column_count() {
            if let Some(rect) = layout.column_handle_rect(col) {
                let mut element = Element::new(ElementKind::ColumnHandle(col), rect);
                element.selected = selection == Some(Selection::Column(col));
                elements.push(element);
            }
        }

        for row in 0..layout.row_count() {
            if let Some(rect) = layout.row_handle_rect(row) {
                let mut element = Element::new(ElementKind::RowHandle(row), rect);
                element.selected = selection == Some(Selection::Row(row));
                elements.push(element);
            }

            for col in 0..layout.column_count() {
                let Some(rect) = layout.cell_rect(row, col) else {
                    continue;
                };
                let pos = CellPosition::new(row, col);
                let mut element = Element::new(ElementKind::Cell(pos), rect);
                element.text = to_display_form(data.cell_text(row, col));
                element.alignment = data.alignments.get(col).copied().unwrap_or_default();
                element.selected = selection.is_some_and(|s| s.contains(pos));
                elements.push(element);
            }
        }

        if let Some(drag) = &state.drag {
            let indicator = drag
                .drop_marker
                .and_then(|marker| layout.drop_indicator_rect(drag.axis, marker));
            if let Some(rect) = indicator {
                elements.push(Element::new(ElementKind::DropIndicator(drag.axis), rect));
            }
        }

        if let Some(edit) = &state.editing {
            if let Some(cell) = layout.cell_rect(edit.position.row, edit.position.col) {
                let lines = edit.editor.text().split('\n').count().max(1);
                let height = cell.height.max(lines as f32 * metrics.line_height);
                let mut element = Element::new(
                    ElementKind::EditOverlay(edit.position),
                    Rect::new(cell.x, cell.y, cell.width, height),
                );
                element.text = edit.editor.text().to_string();
                element.alignment = data
                    .alignments
                    .get(edit.position.col)
                    .copied()
                    .unwrap_or_default();
                elements.push(element);
            }
        }

        if let Some(menu) = &state.menu {
            let items = menu_items(menu.scope);
            let widest = items.iter().map(|i| i.label.chars().count()).max().unwrap_or(0);
            let width = widest as f32 * metrics.char_width + metrics.padding * 2.0;
            let (x, y) = menu.anchor;

            elements.push(Element::new(
                ElementKind::ContextMenu(menu.scope),
                Rect::new(x, y, width, items.len() as f32 * metrics.line_height),
            ));
            for (i, item) in items.iter().enumerate() {
                let rect = Rect::new(x, y + i as f32 * metrics.line_height, width, metrics.line_height);
                let mut element = Element::new(ElementKind::MenuItem(item.id), rect);
                element.text = item.label.to_string();
                elements.push(element);
            }
        }

        Self { layout, elements }
    }

    /// Topmost interactive element under the pointer
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Element> {
        self.elements
            .iter()
            .rev()
            .filter(|e| !matches!(e.kind, ElementKind::DropIndicator(_)))
            .find(|e| e.rect.contains(x, y))
    }

    /// First element of `kind`
    pub fn find(&self, kind: ElementKind) -> Option<&Element> {
        self.elements.iter().find(|e| e.kind == kind)
    }

    pub fn bounds(&self) -> Rect {
        self.layout.bounds()
    }

    /// Plain-text box grid, one text line per cell line.
    ///
    /// Selected cells are bracketed with `[` `]` in place of the padding.
    pub fn to_text(&self) -> String {
        let widths = &self.layout.column_chars;
        let border = |fill: char| -> String {
            let mut line = String::from("+");
            for width in widths {
                line.extend(std::iter::repeat(fill).take(width + 2));
                line.push('+');
            }
            line
        };

        let cells: Vec<&Element> = self
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Cell(_)))
            .collect();

        let mut out = vec![border('-')];
        for row in 0..self.layout.row_count() {
            let row_cells: Vec<&&Element> = cells
                .iter()
                .filter(|e| matches!(e.kind, ElementKind::Cell(p) if p.row == row))
                .collect();
            let lines = self.layout.row_lines.get(row).copied().unwrap_or(1);

            for line_idx in 0..lines {
                let mut line = String::from("|");
                for (col, cell) in row_cells.iter().enumerate() {
                    let width = widths.get(col).copied().unwrap_or(0);
                    let text = cell.text.split('\n').nth(line_idx).unwrap_or("");
                    let text = truncate_text(text, width);
                    let (open, close) = if cell.selected { ('[', ']') } else { (' ', ' ') };
                    line.push(open);
                    line.push_str(&align_text(&text, width, cell.alignment));
                    line.push(close);
                    line.push('|');
                }
                out.push(line);
            }
            out.push(border(if row == 0 { '=' } else { '-' }));
        }
        out.join("\n")
    }
}

fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len);
    let (left, right) = match alignment {
        Alignment::Right => (pad, 0),
        Alignment::Center => (pad / 2, pad - pad / 2),
        Alignment::Left | Alignment::None => (0, pad),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
