//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! selection, editing and focus restoration.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=debug,focus=trace` - scoped filtering
//! - `RUST_LOG=mdgrid::host=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/mdgrid/logs/mdgrid.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::table::{Selection, TableState};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering and defaults to
/// warnings. File logging writes to the logs directory with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG, stderr keeps stdout for command output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of a table's interaction state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub selection: Option<Selection>,
    /// Cell being edited and the draft's caret
    pub editing: Option<((usize, usize), usize)>,
    pub dragging: bool,
    pub menu_open: bool,
}

impl SelectionSnapshot {
    pub fn from_state(state: &TableState) -> Self {
        Self {
            selection: state.selection,
            editing: state
                .editing
                .as_ref()
                .map(|e| ((e.position.row, e.position.col), e.editor.cursor())),
            dragging: state.is_dragging(),
            menu_open: state.menu.is_some(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.selection != other.selection {
            changes.push(format!(
                "selection: {} → {}",
                describe(self.selection),
                describe(other.selection)
            ));
        }
        match (self.editing, other.editing) {
            (None, Some(((row, col), _))) => changes.push(format!("editing ({},{})", row, col)),
            (Some(_), None) => changes.push("editing ended".to_string()),
            (Some((_, before)), Some((_, after))) if before != after => {
                changes.push(format!("caret: {} → {}", before, after))
            }
            _ => {}
        }
        if self.dragging != other.dragging {
            changes.push(if other.dragging { "drag started" } else { "drag ended" }.to_string());
        }
        if self.menu_open != other.menu_open {
            changes.push(if other.menu_open { "menu opened" } else { "menu closed" }.to_string());
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe(selection: Option<Selection>) -> String {
    match selection {
        None => "none".to_string(),
        Some(Selection::Cell(pos)) => format!("({},{})", pos.row, pos.col),
        Some(Selection::Row(row)) => format!("row {}", row),
        Some(Selection::Column(col)) => format!("col {}", col),
    }
}
