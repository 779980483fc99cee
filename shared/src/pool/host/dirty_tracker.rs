use std::collections::BTreeSet;

use crate::PoolEntryId;

/// Entries mutated since the last synchronization cycle.
///
/// Marking is explicit: every code path that changes an entry's mask or
/// instance list calls `mark_dirty` itself. Entries never marked are never
/// republished.
#[derive(Default)]
pub struct DirtyTracker {
    dirty: BTreeSet<PoolEntryId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self, entry_id: PoolEntryId) {
        self.dirty.insert(entry_id);
    }

    /// Returns every dirty entry in ascending order and clears the set.
    pub fn drain_dirty(&mut self) -> Vec<PoolEntryId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn is_dirty(&self, entry_id: PoolEntryId) -> bool {
        self.dirty.contains(&entry_id)
    }

    pub fn is_clean(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}
