//! Command-line argument parsing for the table tool
//!
//! Supports:
//! - Listing the pipe tables of a Markdown file
//! - Printing a table as a grid
//! - Structural and cell edits, written back with `--in-place`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::table::{Alignment, TableCommand, TableWidget, HEADER_ROW};

/// Edit Markdown pipe tables as grids
#[derive(Parser, Debug)]
#[command(name = "mdgrid", version, about = "Edit Markdown pipe tables as grids")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// File and table a subcommand works on
#[derive(Args, Debug, Clone)]
pub struct TableTarget {
    /// Markdown file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Table to work on, 0 for the first table in the file
    #[arg(short, long, default_value_t = 0)]
    pub table: usize,
}

/// Where an edited document goes
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WriteMode {
    /// Write the result back to FILE instead of printing it
    #[arg(short = 'i', long)]
    pub in_place: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignArg {
    Left,
    Center,
    Right,
    None,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Alignment::Left,
            AlignArg::Center => Alignment::Center,
            AlignArg::Right => Alignment::Right,
            AlignArg::None => Alignment::None,
        }
    }
}

/// Rows are numbered as displayed: 0 is the header, body rows start at 1
#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// List the tables in a file
    Tables {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a table as a grid
    Show {
        #[command(flatten)]
        target: TableTarget,
    },
    /// Set the text of a cell
    Set {
        #[command(flatten)]
        target: TableTarget,
        row: usize,
        col: usize,
        text: String,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Rename a column header
    Rename {
        #[command(flatten)]
        target: TableTarget,
        col: usize,
        text: String,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Insert an empty row below ROW (or above it with --above)
    InsertRow {
        #[command(flatten)]
        target: TableTarget,
        row: usize,
        #[arg(long)]
        above: bool,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Delete a body row
    DeleteRow {
        #[command(flatten)]
        target: TableTarget,
        row: usize,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Insert an empty column right of COL (or left of it with --left)
    InsertCol {
        #[command(flatten)]
        target: TableTarget,
        col: usize,
        #[arg(long)]
        left: bool,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Delete a column
    DeleteCol {
        #[command(flatten)]
        target: TableTarget,
        col: usize,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Set a column's alignment
    Align {
        #[command(flatten)]
        target: TableTarget,
        col: usize,
        #[arg(value_enum)]
        alignment: AlignArg,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Move body row FROM so it ends up at row TO
    MoveRow {
        #[command(flatten)]
        target: TableTarget,
        from: usize,
        to: usize,
        #[command(flatten)]
        write: WriteMode,
    },
    /// Move column FROM so it ends up at column TO
    MoveCol {
        #[command(flatten)]
        target: TableTarget,
        from: usize,
        to: usize,
        #[command(flatten)]
        write: WriteMode,
    },
}

/// What the binary should do, resolved from the arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List { file: PathBuf, json: bool },
    Show { file: PathBuf, table: usize },
    Edit {
        file: PathBuf,
        table: usize,
        command: TableCommand,
        in_place: bool,
    },
}

impl CliArgs {
    /// Validate the arguments and turn them into an action
    pub fn into_action(self) -> Result<Action, String> {
        let edit = |target: TableTarget, command: TableCommand, write: WriteMode| Action::Edit {
            file: target.file,
            table: target.table,
            command,
            in_place: write.in_place,
        };

        Ok(match self.command {
            CliCommand::Tables { file, json } => Action::List { file, json },
            CliCommand::Show { target } => Action::Show {
                file: target.file,
                table: target.table,
            },
            CliCommand::Set {
                target,
                row,
                col,
                text,
                write,
            } => edit(target, TableCommand::SetCell { row, col, text }, write),
            CliCommand::Rename {
                target,
                col,
                text,
                write,
            } => edit(target, TableCommand::RenameHeader { col, text }, write),
            CliCommand::InsertRow {
                target,
                row,
                above,
                write,
            } => {
                if above && row == HEADER_ROW {
                    return Err("cannot insert a row above the header".to_string());
                }
                let command = if above {
                    TableCommand::InsertRowAbove(row)
                } else {
                    TableCommand::InsertRowBelow(row)
                };
                edit(target, command, write)
            }
            CliCommand::DeleteRow { target, row, write } => {
                if row == HEADER_ROW {
                    return Err("cannot delete the header row".to_string());
                }
                edit(target, TableCommand::DeleteRow(row), write)
            }
            CliCommand::InsertCol {
                target,
                col,
                left,
                write,
            } => {
                let command = if left {
                    TableCommand::InsertColumnLeft(col)
                } else {
                    TableCommand::InsertColumnRight(col)
                };
                edit(target, command, write)
            }
            CliCommand::DeleteCol { target, col, write } => {
                edit(target, TableCommand::DeleteColumn(col), write)
            }
            CliCommand::Align {
                target,
                col,
                alignment,
                write,
            } => edit(
                target,
                TableCommand::SetAlignment {
                    col,
                    alignment: alignment.into(),
                },
                write,
            ),
            CliCommand::MoveRow {
                target,
                from,
                to,
                write,
            } => {
                if from == HEADER_ROW || to == HEADER_ROW {
                    return Err("the header row cannot be moved".to_string());
                }
                let (source, target_insert) = move_indices(from - 1, to - 1);
                edit(
                    target,
                    TableCommand::ReorderRows {
                        source,
                        target: target_insert,
                    },
                    write,
                )
            }
            CliCommand::MoveCol {
                target,
                from,
                to,
                write,
            } => {
                let (source, target_insert) = move_indices(from, to);
                edit(
                    target,
                    TableCommand::ReorderColumns {
                        source,
                        target: target_insert,
                    },
                    write,
                )
            }
        })
    }
}

/// Turn "move `from` to final position `to`" into a source and an insertion
/// index in the pre-removal numbering
fn move_indices(from: usize, to: usize) -> (usize, usize) {
    if to > from {
        (from, to + 1)
    } else {
        (from, to)
    }
}

/// One line of `mdgrid tables` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub index: usize,
    /// 1-based, as editors show them
    pub first_line: usize,
    pub last_line: usize,
    pub columns: usize,
    pub rows: usize,
    pub header: Vec<String>,
    pub alignments: Vec<&'static str>,
}

impl TableSummary {
    pub fn from_widget(widget: &TableWidget) -> Self {
        let data = &widget.data;
        Self {
            index: widget.index,
            first_line: widget.line_range.start + 1,
            last_line: widget.line_range.end,
            columns: data.column_count(),
            rows: data.row_count(),
            header: data
                .header
                .as_ref()
                .map(|h| h.texts().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            alignments: data.alignments.iter().map(|a| a.label()).collect(),
        }
    }
}
