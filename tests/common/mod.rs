//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use mdgrid::config::TableEditorConfig;
use mdgrid::host::MarkdownSurface;
use mdgrid::messages::{PointerButton, TableMsg};
use mdgrid::table::{locate_tables, GridMetrics, LineIndex, TableData, TableWidget};

/// The two-column table used by the scenario tests
pub const AB_TABLE: &str = "| A | B |\n| --- | --- |\n| 1 | 2 |";

/// Create a surface with default config
pub fn test_surface(text: &str) -> MarkdownSurface {
    MarkdownSurface::new(text, &TableEditorConfig::default())
}

/// Create a surface whose focus restoration gives up after `frames`
pub fn test_surface_with_retries(text: &str, frames: u32) -> MarkdownSurface {
    let config = TableEditorConfig {
        focus_retry_frames: frames,
        ..TableEditorConfig::default()
    };
    MarkdownSurface::new(text, &config)
}

/// Mount the first table of `text` as a standalone widget
pub fn test_widget(text: &str) -> TableWidget {
    let block = &locate_tables(text)[0];
    TableWidget::from_block(
        text,
        block,
        LineIndex::new(text).line_count(),
        GridMetrics::default(),
    )
}

/// Parse the first table of `text` into a normalized model
pub fn first_table(text: &str) -> TableData {
    locate_tables(text)[0].seed(text).normalized()
}

/// Body and header texts of table `index`, row by row
pub fn table_texts(surface: &MarkdownSurface, index: usize) -> Vec<Vec<String>> {
    let data = &surface.widgets()[index].data;
    data.header
        .iter()
        .chain(&data.rows)
        .map(|row| row.texts().into_iter().map(str::to_string).collect())
        .collect()
}

/// Press the primary button at the center of cell (`row`, `col`)
pub fn click_cell(surface: &MarkdownSurface, index: usize, row: usize, col: usize) -> TableMsg {
    let (x, y) = surface
        .view(index)
        .and_then(|view| view.layout.cell_rect(row, col))
        .map(|rect| rect.center())
        .expect("cell should be laid out");
    pointer_down(x, y, 1)
}

pub fn pointer_down(x: f32, y: f32, click_count: u8) -> TableMsg {
    TableMsg::PointerDown {
        x,
        y,
        pointer_id: 1,
        button: PointerButton::Primary,
        click_count,
    }
}

/// Send every char of `text` as typed input
pub fn type_text(surface: &mut MarkdownSurface, index: usize, text: &str) {
    for ch in text.chars() {
        surface.send(index, TableMsg::EditInsertChar(ch));
    }
}
