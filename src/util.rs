//! Utility functions for text editing

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Character type for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Whitespace,
    WordChar,
    Punctuation,
}

pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Char index of the word start at or before `pos`.
///
/// Skips non-word characters first, then the word itself.
pub fn word_start_before(chars: &[char], pos: usize) -> usize {
    let mut pos = pos.min(chars.len());
    while pos > 0 && char_type(chars[pos - 1]) != CharType::WordChar {
        pos -= 1;
    }
    while pos > 0 && char_type(chars[pos - 1]) == CharType::WordChar {
        pos -= 1;
    }
    pos
}

/// Char index just past the word end at or after `pos`
pub fn word_end_after(chars: &[char], pos: usize) -> usize {
    let mut pos = pos.min(chars.len());
    while pos < chars.len() && char_type(chars[pos]) != CharType::WordChar {
        pos += 1;
    }
    while pos < chars.len() && char_type(chars[pos]) == CharType::WordChar {
        pos += 1;
    }
    pos
}

/// Byte offset of char index `char_idx` in `text` (clamped to the end)
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
