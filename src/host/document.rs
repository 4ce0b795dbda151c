//! Document model - the Markdown text buffer and file state

use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;

/// A text replacement recorded for undo/redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Replace {
        /// Char index where the edit starts
        position: usize,
        deleted_text: String,
        inserted_text: String,
    },
}

/// The text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    pub buffer: Rope,
    /// Path to the file on disk (None for in-memory documents)
    pub file_path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes
    pub is_modified: bool,
    pub undo_stack: Vec<EditOperation>,
    pub redo_stack: Vec<EditOperation>,
    /// Incremented on each edit
    pub revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            is_modified: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            revision: 0,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        let mut doc = Self::with_text(&content);
        doc.file_path = Some(path);
        Ok(doc)
    }

    /// Write the buffer back to its file
    pub fn save(&mut self) -> Result<(), std::io::Error> {
        let Some(path) = self.file_path.clone() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "document has no file path",
            ));
        };
        self.save_to(&path)
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), std::io::Error> {
        let file = std::fs::File::create(path)?;
        self.buffer.write_to(std::io::BufWriter::new(file))?;
        self.is_modified = false;
        Ok(())
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Number of lines (a trailing newline opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Get line content without its line ending
    pub fn get_line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.buffer.len_lines() {
            return None;
        }
        let line = self.buffer.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Replace `range` (byte offsets) with `text`, recording it for undo.
    ///
    /// Offsets past the end are clamped; an empty replacement of an empty
    /// range is ignored.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let len = self.buffer.len_bytes();
        let start = self.buffer.byte_to_char(range.start.min(len));
        let end = self.buffer.byte_to_char(range.end.min(len).max(range.start.min(len)));
        if start == end && text.is_empty() {
            return;
        }

        let deleted_text = self.buffer.slice(start..end).to_string();
        self.apply(start, &deleted_text, text);
        self.undo_stack.push(EditOperation::Replace {
            position: start,
            deleted_text,
            inserted_text: text.to_string(),
        });
        self.redo_stack.clear();
    }

    /// Undo the most recent edit; false if there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        let EditOperation::Replace {
            position,
            deleted_text,
            inserted_text,
        } = &op;
        self.apply(*position, inserted_text, deleted_text);
        self.redo_stack.push(op);
        true
    }

    /// Redo the most recently undone edit; false if there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(op) = self.redo_stack.pop() else {
            return false;
        };
        let EditOperation::Replace {
            position,
            deleted_text,
            inserted_text,
        } = &op;
        self.apply(*position, deleted_text, inserted_text);
        self.undo_stack.push(op);
        true
    }

    fn apply(&mut self, position: usize, removed: &str, inserted: &str) {
        let removed_chars = removed.chars().count();
        self.buffer.remove(position..position + removed_chars);
        self.buffer.insert(position, inserted);
        self.is_modified = true;
        self.revision += 1;
    }
}
