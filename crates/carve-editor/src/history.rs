//! Undo history

use std::collections::VecDeque;

use crate::Region;

/// Serialized content plus the selection at the time of the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub content: String,
    pub selection: Region,
}

/// Bounded history; the oldest snapshot is dropped once full
#[derive(Debug, Clone)]
pub struct CappedHistory {
    max_items: usize,
    items: VecDeque<HistoryItem>,
}

impl CappedHistory {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            items: VecDeque::with_capacity(max_items.min(128)),
        }
    }

    pub fn push(&mut self, item: HistoryItem) {
        if self.max_items == 0 {
            return;
        }
        while self.items.len() >= self.max_items {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Most recent snapshot
    pub fn pop(&mut self) -> Option<HistoryItem> {
        self.items.pop_back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }
}
