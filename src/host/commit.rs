//! Commit pipeline
//!
//! Turns a mutated table into the one text replacement that writes it back.
//! The replaced range spans the table's lines and any blank lines after it,
//! and those blank lines are emitted again unchanged so the spacing below
//! the table survives the rewrite.

use std::ops::Range;

use super::TextReplacement;
use crate::table::markdown::serialize_lines;
use crate::table::{LineIndex, TableData};

/// Build the replacement for the table occupying `line_range` of `source`
pub fn build_replacement(source: &str, line_range: Range<usize>, data: &TableData) -> TextReplacement {
    let index = LineIndex::new(source);
    let line_count = index.line_count();

    let table_end = line_range.end.min(line_count);
    let mut tail_end = table_end;
    while tail_end < line_count && index.line(source, tail_end).trim().is_empty() {
        tail_end += 1;
    }

    let start = index.line_start(line_range.start);
    let tail_start = index.line_start(table_end);
    let end = index.line_start(tail_end);

    let old_table = &source[start..tail_start];
    let eol = if old_table.ends_with("\r\n") {
        "\r\n"
    } else if old_table.ends_with('\n') {
        "\n"
    } else {
        ""
    };
    let join = if eol.is_empty() { "\n" } else { eol };

    let mut text = serialize_lines(data).join(join);
    text.push_str(eol);
    text.push_str(&source[tail_start..end]);

    tracing::debug!(
        lines = ?line_range,
        blank_tail = tail_end - table_end,
        bytes = end - start,
        "built table replacement"
    );

    TextReplacement {
        range: start..end,
        text,
    }
}
