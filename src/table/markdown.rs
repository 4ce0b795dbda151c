//! Pipe table serialization
//!
//! Converts between `TableData` and GFM pipe-table lines:
//!
//! ```text
//! | Col A | Col B |
//! | :--- | ---: |
//! | a1 | b1 |
//! ```
//!
//! Cell text in the model is in storage form: one line, pipes unescaped.
//! Line breaks are stored as `<br>` and shown to the user as real newlines.

use std::ops::Range;

use super::model::{header_placeholder, Alignment, Cell, Row, TableData};

/// Token used to store a line break inside a single-line cell
pub const LINE_BREAK_TOKEN: &str = "<br>";

/// Serialize a table to markdown lines joined with `\n` (no trailing newline).
///
/// The table is normalized first, so the output always has a header, a
/// separator line and the same number of cells on every line.
pub fn serialize(data: &TableData) -> String {
    serialize_lines(data).join("\n")
}

/// Serialize a table to individual markdown lines
pub fn serialize_lines(data: &TableData) -> Vec<String> {
    let data = data.normalized();
    let mut lines = Vec::with_capacity(data.rows.len() + 2);

    if let Some(header) = &data.header {
        lines.push(format_row(header));
    }
    lines.push(format_separator(&data.alignments));
    lines.extend(data.rows.iter().map(format_row));

    lines
}

fn format_row(row: &Row) -> String {
    let mut line = String::from("|");
    for cell in &row.cells {
        line.push(' ');
        line.push_str(&escape_pipes(cell.text.trim()));
        line.push_str(" |");
    }
    line
}

fn format_separator(alignments: &[Alignment]) -> String {
    let mut line = String::from("|");
    for alignment in alignments {
        line.push(' ');
        line.push_str(alignment.marker());
        line.push_str(" |");
    }
    line
}

/// Parse pipe-table lines into a normalized table.
///
/// The first line is the header. If the second line is a valid separator
/// its alignments are used, unless it has fewer cells than the table has
/// columns, in which case every column defaults to `None`. A second line
/// that is not a separator is kept as a body row.
pub fn deserialize(lines: &[&str], column_count: usize) -> TableData {
    let Some((header_line, rest)) = lines.split_first() else {
        let columns = column_count.max(1);
        let header = Row::from_texts((0..columns).map(header_placeholder));
        return TableData::new(Some(header), Vec::new(), vec![Alignment::None; columns]);
    };

    let header = Row::from_texts(split_row(header_line));

    let (separator, body) = match rest.split_first() {
        Some((line, body)) => match parse_separator(line) {
            Some(alignments) => (Some(alignments), body),
            None => (None, rest),
        },
        None => (None, rest),
    };

    let rows: Vec<Row> = body
        .iter()
        .map(|line| Row::from_texts(split_row(line)))
        .collect();

    let mut data = TableData::new(Some(header), rows, Vec::new());
    let columns = data.column_count().max(column_count);

    data.alignments = match separator {
        Some(alignments) if alignments.len() >= columns => alignments,
        _ => vec![Alignment::None; columns],
    };
    if let Some(header) = data.header.as_mut() {
        for col in header.cells.len()..columns {
            header.cells.push(Cell::new(header_placeholder(col)));
        }
    }
    data.normalize();
    data
}

/// Parse a separator line (`| :--- | ---: |`) into alignments
pub fn parse_separator(line: &str) -> Option<Vec<Alignment>> {
    let cells = split_row(line);
    if cells.is_empty() {
        return None;
    }
    cells.iter().map(|c| Alignment::from_marker(c)).collect()
}

/// Split a row line into unescaped, trimmed cell texts
pub fn split_row(line: &str) -> Vec<String> {
    split_row_spans(line)
        .into_iter()
        .map(|span| unescape_pipes(&line[span]))
        .collect()
}

/// Byte ranges (relative to `line`) of each cell's trimmed raw text.
///
/// Leading and trailing pipes are optional; a pipe preceded by a backslash
/// does not split cells.
pub fn split_row_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();

    let mut start = 0;
    let mut end = line.len();
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if start < end && bytes[start] == b'|' {
        start += 1;
    }
    if end > start && bytes[end - 1] == b'|' && !(end >= 2 && bytes[end - 2] == b'\\') {
        end -= 1;
    }

    let mut spans = Vec::new();
    let mut cell_start = start;
    let mut i = start;
    while i < end {
        if bytes[i] == b'|' && !(i > 0 && bytes[i - 1] == b'\\') {
            spans.push(trim_span(bytes, cell_start..i));
            cell_start = i + 1;
        }
        i += 1;
    }
    spans.push(trim_span(bytes, cell_start..end));
    spans
}

fn trim_span(bytes: &[u8], mut span: Range<usize>) -> Range<usize> {
    while span.start < span.end && bytes[span.start].is_ascii_whitespace() {
        span.start += 1;
    }
    while span.end > span.start && bytes[span.end - 1].is_ascii_whitespace() {
        span.end -= 1;
    }
    span
}

/// `|` → `\|`
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// `\|` → `|`
pub fn unescape_pipes(text: &str) -> String {
    text.replace("\\|", "|")
}

/// Storage form → what the edit overlay shows (`<br>` becomes a newline)
pub fn to_display_form(stored: &str) -> String {
    stored
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace(LINE_BREAK_TOKEN, "\n")
}

/// Edited text → storage form (newlines become `<br>`)
pub fn to_storage_form(display: &str) -> String {
    display
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', LINE_BREAK_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_serialize_simple() {
        let data = TableData::from_texts(&["A", "B"], &[&["1", "2"]]);
        assert_eq!(serialize(&data), "| A | B |\n| --- | --- |\n| 1 | 2 |");
    }

    #[test]
    fn test_serialize_alignments() {
        let mut data = TableData::from_texts(&["L", "C", "R", "N"], &[]);
        data.alignments = vec![
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::None,
        ];
        let out = serialize(&data);
        assert_eq!(out.lines().nth(1), Some("| :--- | :---: | ---: | --- |"));
    }

    #[test]
    fn test_serialize_empty_cell() {
        let data = TableData::from_texts(&["A", "Col 2", "B"], &[&["1", "", "2"]]);
        assert_eq!(serialize(&data).lines().nth(2), Some("| 1 |  | 2 |"));
    }

    #[test]
    fn test_serialize_trims_cell_text() {
        let data = TableData::from_texts(&["  padded  "], &[]);
        assert!(serialize(&data).starts_with("| padded |"));
    }

    #[test]
    fn test_pipe_escaping_round_trip() {
        let data = TableData::from_texts(&["H"], &[&["a|b"]]);
        let out = serialize(&data);
        assert!(out.contains("| a\\|b |"));

        let back = deserialize(&lines(&out), 1);
        assert_eq!(back.cell_text(1, 0), "a|b");
    }

    #[test]
    fn test_deserialize_alignments() {
        let data = deserialize(&lines("| a | b | c |\n|:--|--:|:-:|\n| 1 | 2 | 3 |"), 3);
        assert_eq!(
            data.alignments,
            vec![Alignment::Left, Alignment::Right, Alignment::Center]
        );
        assert_eq!(data.cell_text(1, 2), "3");
    }

    #[test]
    fn test_deserialize_short_separator_defaults_to_none() {
        let data = deserialize(&lines("| a | b |\n| :--- |\n| 1 | 2 |"), 2);
        assert_eq!(data.alignments, vec![Alignment::None, Alignment::None]);
        assert_eq!(data.row_count(), 1);
    }

    #[test]
    fn test_deserialize_missing_separator() {
        let data = deserialize(&lines("| a | b |\n| 1 | 2 |"), 2);
        assert_eq!(data.alignments, vec![Alignment::None, Alignment::None]);
        assert_eq!(data.row_count(), 1);
        assert_eq!(data.cell_text(1, 1), "2");
    }

    #[test]
    fn test_deserialize_pads_ragged_rows() {
        let data = deserialize(&lines("| a | b |\n| --- | --- |\n| 1 |"), 2);
        assert!(data.is_normalized());
        assert_eq!(data.cell_text(1, 1), "");
    }

    #[test]
    fn test_deserialize_wider_column_count_names_header() {
        let data = deserialize(&lines("| a |\n| --- |"), 3);
        assert_eq!(data.column_count(), 3);
        assert_eq!(data.cell_text(0, 1), "Col 2");
        assert_eq!(data.cell_text(0, 2), "Col 3");
    }

    #[test]
    fn test_deserialize_empty_input() {
        let data = deserialize(&[], 2);
        assert!(data.is_normalized());
        assert_eq!(data.column_count(), 2);
        assert_eq!(data.row_count(), 0);
    }

    #[test]
    fn test_round_trip_normalized_tables() {
        let mut aligned = TableData::from_texts(&["x", "y"], &[&["1", "2"], &["", "tail"]]);
        aligned.alignments = vec![Alignment::Center, Alignment::Right];

        let samples = vec![
            TableData::from_texts(&["A", "B"], &[&["1", "2"]]),
            TableData::from_texts(&["Only"], &[]),
            TableData::from_texts(&["p|q", "r"], &[&["a\\|b", "c|d|e"]]),
            TableData::from_texts(&["A"], &[&["line<br>break"]]),
            TableData::from_texts(&["A", "B"], &[&["a\nb", "c"]]),
            aligned,
        ];

        for data in samples {
            let data = data.normalized();
            let out = serialize(&data);
            let back = deserialize(&lines(&out), data.column_count());
            assert!(back.same_content(&data), "round trip failed for:\n{out}");
        }
    }

    #[test]
    fn test_serialize_keeps_multiline_cell_on_one_line() {
        let mut data = TableData::from_texts(&["A", "B"], &[&["1", "2"]]);
        data.rows[0].cells[0].text = "x\r\ny".to_string();

        let out = serialize(&data);
        assert_eq!(out, "| A | B |\n| --- | --- |\n| x<br>y | 2 |");
        assert_eq!(deserialize(&lines(&out), 2).cell_text(1, 0), "x<br>y");
    }

    #[test]
    fn test_split_row_without_outer_pipes() {
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("|  |"), vec![""]);
    }

    #[test]
    fn test_split_row_spans_are_trimmed() {
        let line = "|  a  | bb |";
        let spans = split_row_spans(line);
        assert_eq!(spans, vec![3..4, 8..10]);
        assert_eq!(&line[spans[1].clone()], "bb");
    }

    #[test]
    fn test_split_row_keeps_escaped_trailing_pipe() {
        assert_eq!(split_row("| a\\|"), vec!["a|"]);
    }

    #[test]
    fn test_display_and_storage_forms() {
        assert_eq!(to_display_form("one<br>two<br/>three<br />four"), "one\ntwo\nthree\nfour");
        assert_eq!(to_storage_form("one\ntwo\r\nthree"), "one<br>two<br>three");
        assert_eq!(to_storage_form(&to_display_form("a<br>b")), "a<br>b");
    }
}
