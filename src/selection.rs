//! Row selection state for the expense table.
//!
//! Tracks which records are marked for a batch delete. Marks are keyed by
//! record id so they survive reloads and re-sorting of the table.

use std::collections::HashSet;

use crate::data::Expense;

/// Record ids marked in the table
#[derive(Debug, Default)]
pub struct Selection {
    marked: HashSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a record's mark. Returns true if it is now marked.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.marked.remove(&id) {
            false
        } else {
            self.marked.insert(id);
            true
        }
    }

    pub fn is_marked(&self, id: i64) -> bool {
        self.marked.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn clear(&mut self) {
        self.marked.clear();
    }

    /// Drop marks for records no longer shown
    pub fn prune(&mut self, visible: &[Expense]) {
        let ids: HashSet<i64> = visible.iter().map(|e| e.id).collect();
        self.marked.retain(|id| ids.contains(id));
    }

    /// Ids a delete should act on: the marked records in table order, or the
    /// record under the cursor when nothing is marked.
    pub fn targets(&self, rows: &[Expense], cursor: usize) -> Vec<i64> {
        if self.marked.is_empty() {
            return rows.get(cursor).map(|e| vec![e.id]).unwrap_or_default();
        }
        rows.iter()
            .map(|e| e.id)
            .filter(|id| self.marked.contains(id))
            .collect()
    }
}
