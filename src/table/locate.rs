//! Table block locator
//!
//! Finds pipe tables in a Markdown document with pulldown-cmark and reports
//! each block's line range and per-cell byte spans. Tables nested inside
//! block quotes, lists or footnotes are skipped: their lines carry container
//! prefixes that a table rewrite would drop.

use std::ops::Range;

use pulldown_cmark::{Alignment as CmarkAlignment, Event, Options, Parser, Tag, TagEnd};

use super::markdown::{split_row_spans, unescape_pipes};
use super::model::{Alignment, Cell, Row, TableData};

/// One pipe table found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Position among the located tables, in document order
    pub index: usize,
    /// Document lines covered by the table (end exclusive)
    pub line_range: Range<usize>,
    /// Start of the first line to the end of the last line's content
    pub byte_range: Range<usize>,
    /// Byte spans of the header cells' trimmed text
    pub header_cells: Vec<Range<usize>>,
    /// Byte spans of each body row's cells
    pub rows: Vec<Vec<Range<usize>>>,
    /// Alignments from the separator line
    pub alignments: Vec<Alignment>,
}

impl TableBlock {
    /// First document line of the table
    pub fn start_line(&self) -> usize {
        self.line_range.start
    }

    /// Last document line of the table
    pub fn last_line(&self) -> usize {
        self.line_range.end.saturating_sub(1)
    }

    /// Number of body rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Seed a table model from the cell spans.
    ///
    /// The result is not normalized; callers normalize before use.
    pub fn seed(&self, source: &str) -> TableData {
        let cell = |span: &Range<usize>| {
            let text = source.get(span.clone()).unwrap_or("");
            Cell::with_span(unescape_pipes(text.trim()), span.clone())
        };

        TableData::new(
            Some(Row::new(self.header_cells.iter().map(cell).collect())),
            self.rows
                .iter()
                .map(|spans| Row::new(spans.iter().map(cell).collect()))
                .collect(),
            self.alignments.clone(),
        )
    }
}

/// Byte offsets of line starts
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Number of lines (a trailing newline opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Line containing byte `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// Byte offset where `line` starts
    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len)
    }

    /// Byte offset where `line`'s content ends (before `\n` / `\r\n`)
    pub fn line_end(&self, source: &str, line: usize) -> usize {
        let mut end = self
            .starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        if end > self.line_start(line) && source.as_bytes().get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        end
    }

    /// Content of `line` without its line ending
    pub fn line<'a>(&self, source: &'a str, line: usize) -> &'a str {
        let start = self.line_start(line);
        let end = self.line_end(source, line);
        source.get(start..end).unwrap_or("")
    }
}

struct PendingTable {
    alignments: Vec<Alignment>,
    header_line: Option<usize>,
    row_lines: Vec<usize>,
}

/// Locate every top-level pipe table in `source`
pub fn locate_tables(source: &str) -> Vec<TableBlock> {
    let lines = LineIndex::new(source);
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES).into_offset_iter();

    let mut blocks = Vec::new();
    let mut container_depth = 0usize;
    let mut pending: Option<PendingTable> = None;

    for (event, range) in parser {
        match event {
            Event::Start(Tag::BlockQuote { .. })
            | Event::Start(Tag::List { .. })
            | Event::Start(Tag::Item)
            | Event::Start(Tag::FootnoteDefinition { .. }) => container_depth += 1,
            Event::End(TagEnd::BlockQuote { .. })
            | Event::End(TagEnd::List { .. })
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::FootnoteDefinition) => {
                container_depth = container_depth.saturating_sub(1)
            }
            Event::Start(Tag::Table(alignments)) if container_depth == 0 => {
                pending = Some(PendingTable {
                    alignments: alignments.iter().map(|a| from_cmark(*a)).collect(),
                    header_line: None,
                    row_lines: Vec::new(),
                });
            }
            Event::Start(Tag::TableHead) => {
                if let Some(table) = pending.as_mut() {
                    table.header_line = Some(lines.line_of(range.start));
                }
            }
            Event::Start(Tag::TableRow) => {
                if let Some(table) = pending.as_mut() {
                    table.row_lines.push(lines.line_of(range.start));
                }
            }
            Event::End(TagEnd::Table) => {
                if let Some(table) = pending.take() {
                    if let Some(block) = build_block(source, &lines, blocks.len(), table) {
                        blocks.push(block);
                    }
                }
            }
            _ => {}
        }
    }

    tracing::debug!(count = blocks.len(), "located tables");
    blocks
}

fn build_block(
    source: &str,
    lines: &LineIndex,
    index: usize,
    table: PendingTable,
) -> Option<TableBlock> {
    let header_line = table.header_line?;
    let columns = table.alignments.len().max(1);

    let cell_spans = |line: usize| -> Vec<Range<usize>> {
        let start = lines.line_start(line);
        let mut spans: Vec<Range<usize>> = split_row_spans(lines.line(source, line))
            .into_iter()
            .map(|span| start + span.start..start + span.end)
            .collect();
        // Extra cells are not part of the table
        spans.truncate(columns);
        spans
    };

    // GFM lets a table swallow the pipe-less lines that follow it. Those stay
    // document text: the table ends at the first body line with no delimiter.
    let row_lines: Vec<usize> = table
        .row_lines
        .iter()
        .copied()
        .take_while(|&line| has_cell_delimiter(lines.line(source, line)))
        .collect();
    if row_lines.len() < table.row_lines.len() {
        tracing::debug!(
            header_line,
            dropped = table.row_lines.len() - row_lines.len(),
            "table stops at a line without pipes"
        );
    }

    let last_line = row_lines.last().copied().unwrap_or(header_line + 1);
    let header_cells = cell_spans(header_line);
    let rows = row_lines.iter().map(|&line| cell_spans(line)).collect();

    Some(TableBlock {
        index,
        line_range: header_line..last_line + 1,
        byte_range: lines.line_start(header_line)..lines.line_end(source, last_line),
        header_cells,
        rows,
        alignments: table.alignments,
    })
}

/// True if `line` has a `|` that is not escaped
fn has_cell_delimiter(line: &str) -> bool {
    line.match_indices('|')
        .any(|(i, _)| i == 0 || line.as_bytes()[i - 1] != b'\\')
}

fn from_cmark(alignment: CmarkAlignment) -> Alignment {
    match alignment {
        CmarkAlignment::None => Alignment::None,
        CmarkAlignment::Left => Alignment::Left,
        CmarkAlignment::Center => Alignment::Center,
        CmarkAlignment::Right => Alignment::Right,
    }
}
