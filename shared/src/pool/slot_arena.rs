use std::ops::Index;

use crate::MAX_SLOTS;

/// Position of a slot inside the [`SlotArena`] that produced it.
///
/// Only an arena can hand one out (by appending, or by checking a raw index
/// against its length), and arenas never shrink or reorder, so a `SlotIndex`
/// keeps naming the same instance for the arena's whole life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Append-only storage for at most [`MAX_SLOTS`] items.
pub struct SlotArena<T> {
    slots: Vec<T>,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn len(&self) -> u8 {
        // bounded by MAX_SLOTS in push
        self.slots.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_SLOTS
    }

    /// Appends `item`, handing it back if the arena is full.
    pub fn push(&mut self, item: T) -> Result<SlotIndex, T> {
        if self.is_full() {
            return Err(item);
        }
        let index = SlotIndex(self.len());
        self.slots.push(item);
        Ok(index)
    }

    /// Validates a raw position, e.g. a bit taken from a `SlotMask`.
    pub fn slot(&self, raw: u8) -> Option<SlotIndex> {
        if raw < self.len() {
            Some(SlotIndex(raw))
        } else {
            None
        }
    }

    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        self.slots.get(usize::from(index.0))
    }

    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slots.get_mut(usize::from(index.0))
    }

    /// First slot whose item satisfies `predicate`, scanning from index 0.
    pub fn position<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(predicate)
            .map(|position| SlotIndex(position as u8))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(position, item)| (SlotIndex(position as u8), item))
    }

    /// Removes every item. Only valid when the whole pool is torn down.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.slots.drain(..)
    }
}

impl<T> Index<SlotIndex> for SlotArena<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` came from a different, shorter arena.
    fn index(&self, index: SlotIndex) -> &T {
        &self.slots[usize::from(index.0)]
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
