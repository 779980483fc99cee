use crate::{PoolKind, PooledInstance, SlotArena, SlotMask};

/// An observer's mirror of one authority entry.
pub struct ObservedEntry<D> {
    pub(crate) kind: PoolKind,
    pub(crate) instances: SlotArena<PooledInstance<D>>,
    pub(crate) observer_mask: SlotMask,
    pub(crate) known_count: u8,
    pub(crate) start_with_tick_enabled: bool,
}

impl<D> ObservedEntry<D> {
    pub(crate) fn new(kind: PoolKind, start_with_tick_enabled: bool) -> Self {
        Self {
            kind,
            instances: SlotArena::new(),
            observer_mask: SlotMask::EMPTY,
            known_count: 0,
            start_with_tick_enabled,
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn instances(&self) -> &SlotArena<PooledInstance<D>> {
        &self.instances
    }

    /// The last mask this observer reconciled against
    pub fn observer_mask(&self) -> SlotMask {
        self.observer_mask
    }

    /// How many slots have had their lifecycle reconciled; diffs never look
    /// past this
    pub fn known_count(&self) -> u8 {
        self.known_count
    }

    pub fn start_with_tick_enabled(&self) -> bool {
        self.start_with_tick_enabled
    }
}
