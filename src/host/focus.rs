//! Focus restoration after a commit
//!
//! A commit destroys the widget that produced it. The scheduler carries the
//! selection across the rebuild: it hands out a ticket per commit and, on
//! each animation frame, looks for the table that now starts at the
//! committed table's first line. Every commit or new user input bumps the
//! generation, which turns older tickets into no-ops.

use super::RenderedTable;
use crate::table::Selection;

/// A pending restoration, valid for one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    pub generation: u64,
    /// First document line of the committed table
    pub start_line: usize,
    pub selection: Selection,
    /// Frames already spent looking for the table
    pub attempts: u32,
}

/// Result of running a ticket on one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Superseded by a newer commit or user input
    Stale,
    /// Table not mounted yet; run the ticket again next frame
    Retry(FrameTicket),
    Focus { index: usize, selection: Selection },
    /// Retry budget spent; focus the host instead
    Fallback,
}

#[derive(Debug, Clone)]
pub struct FocusScheduler {
    generation: u64,
    retry_frames: u32,
}

impl FocusScheduler {
    pub fn new(retry_frames: u32) -> Self {
        Self {
            generation: 0,
            retry_frames: retry_frames.max(1),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a restoration for a commit of the table at `start_line`
    pub fn schedule(&mut self, start_line: usize, selection: Selection) -> FrameTicket {
        self.generation += 1;
        tracing::debug!(target: "focus", generation = self.generation, start_line, ?selection, "scheduled");
        FrameTicket {
            generation: self.generation,
            start_line,
            selection,
            attempts: 0,
        }
    }

    /// Drop every outstanding ticket
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: &FrameTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Run `ticket` against the tables mounted this frame
    pub fn run(&self, ticket: FrameTicket, tables: &[RenderedTable]) -> FocusOutcome {
        if !self.is_current(&ticket) {
            return FocusOutcome::Stale;
        }

        if let Some(table) = tables.iter().find(|t| t.start_line() == ticket.start_line) {
            tracing::debug!(target: "focus", index = table.index, attempts = ticket.attempts, "table found");
            return FocusOutcome::Focus {
                index: table.index,
                selection: ticket.selection,
            };
        }

        let attempts = ticket.attempts + 1;
        if attempts >= self.retry_frames {
            tracing::warn!(
                target: "focus",
                start_line = ticket.start_line,
                attempts,
                "table did not remount, focusing host"
            );
            return FocusOutcome::Fallback;
        }
        FocusOutcome::Retry(FrameTicket { attempts, ..ticket })
    }
}
