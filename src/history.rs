use crate::position::HistoryEntry;
use serde::Serialize;

/// Append-only session history of recorded fixes.
///
/// Entries are kept in capture order and are never removed, reordered or
/// mutated. The history lives as long as the running session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Owned copy of the entries as of now
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }
}
