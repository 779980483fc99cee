use crate::{InstanceId, PoolEntryId, SlotIndex};

/// What an observer did while applying one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// The entry was adopted as received, without firing transitions
    Introduced { entry_id: PoolEntryId, known_count: u8 },
    /// Instances appended on the authority were adopted silently
    Grown { entry_id: PoolEntryId, from: u8, to: u8 },
    Activated { entry_id: PoolEntryId, slot: SlotIndex, instance: InstanceId },
    Deactivated { entry_id: PoolEntryId, slot: SlotIndex, instance: InstanceId },
    /// The instance at a changed slot was no longer valid
    Skipped { entry_id: PoolEntryId, slot: SlotIndex, instance: InstanceId },
}
