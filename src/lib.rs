//! mdgrid - spreadsheet-style editing of Markdown pipe tables
//!
//! This crate provides the table model, the grid widget state machine and
//! a host text surface, following the Elm Architecture pattern: input
//! arrives as `TableMsg`, `update` changes state and returns a `Cmd`, and
//! the host applies the resulting text replacement.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod host;
pub mod keymap;
pub mod messages;
pub mod table;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::TableEditorConfig;
pub use host::{HostSurface, MarkdownSurface};
pub use messages::TableMsg;
pub use table::{TableData, TableWidget};
