//! Per-surface registry of table interaction state

use std::collections::{HashMap, HashSet};

use super::identity::TableIdentity;
use super::state::TableState;

/// Selection, edit and drag state for every table of one host surface,
/// keyed by table identity
#[derive(Debug, Default)]
pub struct SelectionRegistry {
    states: HashMap<TableIdentity, TableState>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &TableIdentity) -> Option<&TableState> {
        self.states.get(identity)
    }

    /// State for `identity`, created empty on first use
    pub fn state_mut(&mut self, identity: TableIdentity) -> &mut TableState {
        self.states.entry(identity).or_default()
    }

    pub fn remove(&mut self, identity: &TableIdentity) -> Option<TableState> {
        self.states.remove(identity)
    }

    /// Drop entries for tables no longer in the document
    pub fn retain_only(&mut self, live: &[TableIdentity]) {
        let live: HashSet<&TableIdentity> = live.iter().collect();
        let before = self.states.len();
        self.states.retain(|identity, _| live.contains(identity));
        let pruned = before - self.states.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned stale table state");
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
