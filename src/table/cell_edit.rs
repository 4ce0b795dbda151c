//! In-place cell editing
//!
//! `CellEditor` is the draft buffer shown in the edit overlay: display-form
//! text (real newlines), a char-indexed cursor and an optional selection
//! anchor. `CellEditState` ties a draft to the cell it edits.

use super::markdown::{to_display_form, to_storage_form};
use super::state::CellPosition;
use crate::util::{char_to_byte, word_end_after, word_start_before};

/// Single-cell text buffer with a cursor and selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellEditor {
    text: String,
    /// Cursor position in chars
    cursor: usize,
    /// Selection anchor in chars; the selection spans anchor..cursor
    anchor: Option<usize>,
}

impl CellEditor {
    /// Editor holding `text` with the cursor at the end
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            anchor: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// Selected char range, if non-empty
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn has_selection(&self) -> bool {
        self.selection_range().is_some()
    }

    pub fn selected_text(&self) -> String {
        match self.selection_range() {
            Some((start, end)) => self.text.chars().skip(start).take(end - start).collect(),
            None => String::new(),
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.len();
    }

    /// Remove the selected text; returns false if nothing was selected
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        let start_byte = char_to_byte(&self.text, start);
        let end_byte = char_to_byte(&self.text, end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
        self.anchor = None;
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let byte = char_to_byte(&self.text, self.cursor);
        self.text.insert(byte, ch);
        self.cursor += 1;
    }

    /// Insert text at the cursor, replacing any selection (paste)
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte = char_to_byte(&self.text, self.cursor);
        self.text.insert_str(byte, &text);
        self.cursor += text.chars().count();
    }

    pub fn delete_backward(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        self.delete_chars(self.cursor - 1, self.cursor);
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.len() {
            return;
        }
        self.delete_chars(self.cursor, self.cursor + 1);
    }

    pub fn delete_word_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let start = word_start_before(&self.chars(), self.cursor);
        self.delete_chars(start, self.cursor);
    }

    pub fn delete_word_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let end = word_end_after(&self.chars(), self.cursor);
        self.delete_chars(self.cursor, end);
    }

    fn delete_chars(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let start_byte = char_to_byte(&self.text, start);
        let end_byte = char_to_byte(&self.text, end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
    }

    /// Move the cursor to `pos`, extending or collapsing the selection
    fn move_to(&mut self, pos: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(self.len());
    }

    pub fn move_left(&mut self, extend: bool) {
        // Collapse to the selection start without moving further
        if let (false, Some((start, _))) = (extend, self.selection_range()) {
            self.move_to(start, false);
            return;
        }
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if let (false, Some((_, end))) = (extend, self.selection_range()) {
            self.move_to(end, false);
            return;
        }
        self.move_to(self.cursor + 1, extend);
    }

    pub fn move_word_left(&mut self, extend: bool) {
        let pos = word_start_before(&self.chars(), self.cursor);
        self.move_to(pos, extend);
    }

    pub fn move_word_right(&mut self, extend: bool) {
        let pos = word_end_after(&self.chars(), self.cursor);
        self.move_to(pos, extend);
    }

    /// Start of the current line in the draft
    pub fn move_home(&mut self, extend: bool) {
        let chars = self.chars();
        let mut pos = self.cursor.min(chars.len());
        while pos > 0 && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        self.move_to(pos, extend);
    }

    /// End of the current line in the draft
    pub fn move_end(&mut self, extend: bool) {
        let chars = self.chars();
        let mut pos = self.cursor.min(chars.len());
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        self.move_to(pos, extend);
    }
}

/// State for editing a single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEditState {
    pub position: CellPosition,
    /// Draft in display form
    pub editor: CellEditor,
    /// Display form of the value before editing
    pub original: String,
}

impl CellEditState {
    /// Edit the stored value of a cell, cursor at the end
    pub fn new(position: CellPosition, stored: &str) -> Self {
        let display = to_display_form(stored);
        Self {
            position,
            editor: CellEditor::new(display.clone()),
            original: display,
        }
    }

    /// Start an edit that replaces the value with a typed character
    pub fn with_char(position: CellPosition, stored: &str, ch: char) -> Self {
        Self {
            position,
            editor: CellEditor::new(ch.to_string()),
            original: to_display_form(stored),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.editor.text() != self.original
    }

    /// Finish the edit; None when the draft equals the original
    pub fn finish(self) -> Option<CellEdit> {
        if !self.is_modified() {
            return None;
        }
        Some(CellEdit {
            position: self.position,
            old_value: to_storage_form(&self.original),
            new_value: to_storage_form(self.editor.text()),
        })
    }
}

/// A completed cell edit, values in storage form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub position: CellPosition,
    pub old_value: String,
    pub new_value: String,
}
