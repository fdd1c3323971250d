use std::collections::VecDeque;

/// One previously executed query and its textual result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub query: String,
    pub result: String,
}

/// Bounded FIFO record of executed queries.
///
/// Insertion past capacity evicts the oldest entry. Reads never re-promote
/// an entry, so the retained set is always the N most recently *recorded*
/// queries in call order.
#[derive(Debug)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl QueryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, query: impl Into<String>, result: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            query: query.into(),
            result: result.into(),
        });
    }

    /// The most recently recorded entry, if any.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
