//! Table identity
//!
//! A table is identified by where it sits in the document and what it
//! contains. Identities are recomputed on every rebuild and only used as
//! registry keys: any edit that moves or changes the table yields a new one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::locate::TableBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableIdentity {
    pub start_offset: usize,
    pub end_offset: usize,
    pub content_hash: u64,
}

impl TableIdentity {
    /// Identity of the table text at `start_offset..end_offset`
    pub fn new(start_offset: usize, end_offset: usize, text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Self {
            start_offset,
            end_offset,
            content_hash: hasher.finish(),
        }
    }

    pub fn of_block(source: &str, block: &TableBlock) -> Self {
        let range = block.byte_range.clone();
        let text = source.get(range.clone()).unwrap_or("");
        Self::new(range.start, range.end, text)
    }
}
