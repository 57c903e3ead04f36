//! Linear undo/redo history.
//!
//! Every `execute` produces one `HistoryEntry`: a redo/undo pair that
//! replaces the document (or its block list) with an owned snapshot.
//! Snapshots are deep-cloned on every application, so an entry stays valid
//! no matter what the store goes through afterwards.
//!
//! The history is a plain sequence with a cursor. Pushing after undos
//! discards the undone tail; there is no redo tree.

use crate::store::BlockStore;
use std::fmt;
use ve_core::model::{BlockRecord, ModelValue};

type Apply = Box<dyn Fn(&mut BlockStore)>;

/// One reversible unit of change.
pub struct HistoryEntry {
    label: String,
    redo: Apply,
    undo: Apply,
}

impl HistoryEntry {
    pub fn new(
        label: impl Into<String>,
        redo: impl Fn(&mut BlockStore) + 'static,
        undo: impl Fn(&mut BlockStore) + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            redo: Box::new(redo),
            undo: Box::new(undo),
        }
    }

    /// Block-list replacement: redo installs `after`, undo installs
    /// `before`. The container is left alone.
    pub fn blocks(
        label: impl Into<String>,
        before: Option<Vec<BlockRecord>>,
        after: Option<Vec<BlockRecord>>,
    ) -> Self {
        Self::new(
            label,
            move |store| store.update_blocks(after.clone()),
            move |store| store.update_blocks(before.clone()),
        )
    }

    /// Whole-document replacement.
    pub fn document(label: impl Into<String>, before: ModelValue, after: ModelValue) -> Self {
        Self::new(
            label,
            move |store| store.update_model_value(after.clone()),
            move |store| store.update_model_value(before.clone()),
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn redo(&self, store: &mut BlockStore) {
        (self.redo)(store);
    }

    pub fn undo(&self, store: &mut BlockStore) {
        (self.undo)(store);
    }
}

impl fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Entries plus a cursor. `entries[..cursor]` are applied;
/// `entries[cursor..]` are the redo tail.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    /// Maximum number of entries kept; `0` is unbounded.
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit,
        }
    }

    /// Drop the redo tail, append `entry`, and return it for application.
    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        if self.limit > 0 && self.entries.len() > self.limit {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
        &self.entries[self.cursor - 1]
    }

    /// Move back one step, returning the entry to undo.
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Move forward one step, returning the entry to redo.
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(HistoryEntry::label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(label: &str) -> HistoryEntry {
        HistoryEntry::new(label, |_| {}, |_| {})
    }

    #[test]
    fn undo_redo_walks_cursor() {
        let mut h = History::new(0);
        h.push(noop("a"));
        h.push(noop("b"));
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.step_back().map(HistoryEntry::label), Some("b"));
        assert_eq!(h.step_back().map(HistoryEntry::label), Some("a"));
        assert!(h.step_back().is_none());
        assert_eq!(h.step_forward().map(HistoryEntry::label), Some("a"));
        assert_eq!(h.cursor(), 1);
    }

    #[test]
    fn push_after_undo_drops_tail() {
        let mut h = History::new(0);
        h.push(noop("a"));
        h.push(noop("b"));
        h.step_back();
        h.push(noop("c"));
        assert_eq!(h.labels().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!h.can_redo());
        assert!(h.step_forward().is_none());
    }

    #[test]
    fn limit_drops_oldest() {
        let mut h = History::new(3);
        for label in ["a", "b", "c", "d", "e"] {
            h.push(noop(label));
        }
        assert_eq!(h.labels().collect::<Vec<_>>(), vec!["c", "d", "e"]);
        assert_eq!(h.cursor(), 3);
        let mut undone = 0;
        while h.step_back().is_some() {
            undone += 1;
        }
        assert_eq!(undone, 3);
    }

    #[test]
    fn block_entry_clones_on_every_apply() {
        use ve_core::ComponentKey;
        let block = BlockRecord::new_dropped(ComponentKey::intern("text"), 1.0, 1.0);
        let entry = HistoryEntry::blocks("add", Some(vec![]), Some(vec![block.clone()]));
        let mut store = BlockStore::default();

        entry.redo(&mut store);
        store.set_position(0, 99.0, 99.0);
        entry.redo(&mut store);
        assert_eq!(store.blocks(), &[block]);

        entry.undo(&mut store);
        assert_eq!(store.block_list(), Some(&vec![]));
    }
}
