use log::{info, warn};

use crate::{
    pool::lifecycle, DirtyTracker, InstanceFactory, InstanceId, PoolEntry, PoolEntryId, PoolError,
    PoolKind, PoolKinds, SlotAcquisition, SlotIndex, SpawnParams, StateSnapshotter, MAX_SLOTS,
};

/// A successful acquire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Acquired {
    pub entry_id: PoolEntryId,
    pub slot: SlotIndex,
    pub instance: InstanceId,
    /// False when the instance had to be created for this request
    pub reused: bool,
}

/// What a release did with the instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    /// Returned to its entry's free set
    Pooled { entry_id: PoolEntryId, slot: SlotIndex },
    /// Owned by no entry, so it was destroyed instead
    Discarded,
}

/// Owns every [`PoolEntry`] on the authority, plus the tracker recording
/// which ones changed since the last synchronization cycle.
///
/// Entries are found by a linear scan over kinds; a session is expected to pool
/// tens of kinds, not thousands.
pub struct PoolRegistry<D> {
    entries: Vec<PoolEntry<D>>,
    dirty: DirtyTracker,
    capacity: u8,
}

impl<D> PoolRegistry<D> {
    /// `capacity` is the per-kind instance limit, clamped to [`MAX_SLOTS`].
    pub fn new(capacity: u8) -> Self {
        Self {
            entries: Vec::new(),
            dirty: DirtyTracker::new(),
            capacity: capacity.min(MAX_SLOTS),
        }
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    // Acquire / Release

    /// Leases an instance of `params.kind`, creating the kind's entry on first
    /// use. Reused instances are re-activated at `params.placement`.
    pub fn acquire(
        &mut self,
        kinds: &PoolKinds,
        mut params: SpawnParams,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Acquired, PoolError> {
        let kind = params.kind;
        let entry_index = match self.position_of(&kind) {
            Some(index) => index,
            None => self.create_entry(kinds, kind)?,
        };

        let entry = &mut self.entries[entry_index];
        let acquisition = entry.find_or_create_slot(&params, factory, snapshotter, &mut self.dirty)?;
        let slot = acquisition.slot();
        let pooled = &entry.instances()[slot];
        let instance = pooled.id();
        let collision_enabled = !params.disable_collision_on_spawn;

        match acquisition {
            SlotAcquisition::Reused(_) => {
                lifecycle::activate(
                    factory,
                    pooled,
                    entry.start_with_tick_enabled(),
                    collision_enabled,
                    params.on_pre_activate.take(),
                );
            }
            SlotAcquisition::Fresh(_) => {
                if !collision_enabled {
                    factory.set_collision_enabled(instance, false);
                }
                params.run_pre_activate(instance);
            }
        }

        Ok(Acquired {
            entry_id: entry.id(),
            slot,
            instance,
            reused: matches!(acquisition, SlotAcquisition::Reused(_)),
        })
    }

    /// Returns `instance` to whichever entry owns it. An instance no entry
    /// owns is not poolable and is destroyed.
    pub fn release(
        &mut self,
        instance: InstanceId,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Released, PoolError> {
        for entry in self.entries.iter_mut() {
            match entry.release(instance, factory, snapshotter, &mut self.dirty) {
                Ok(slot) => {
                    return Ok(Released::Pooled {
                        entry_id: entry.id(),
                        slot,
                    })
                }
                Err(PoolError::TypeMismatchOnRelease { .. }) => continue,
                Err(err) => return Err(err),
            }
        }

        warn!(
            "PoolRegistry: {:?} belongs to no pool entry, destroying it",
            instance
        );
        if factory.is_valid(instance) {
            factory.destroy(instance);
        }
        Ok(Released::Discarded)
    }

    fn position_of(&self, kind: &PoolKind) -> Option<usize> {
        self.entries.iter().position(|entry| entry.kind() == *kind)
    }

    fn create_entry(&mut self, kinds: &PoolKinds, kind: PoolKind) -> Result<usize, PoolError> {
        let Some(descriptor) = kinds.descriptor(&kind) else {
            return Err(PoolError::UnknownKind {
                kind: kind.net_id(),
            });
        };
        let Ok(entry_id) = PoolEntryId::try_from(self.entries.len()) else {
            return Err(PoolError::KindTableFull {
                name: descriptor.name.clone(),
            });
        };

        info!(
            "PoolRegistry: creating entry {} for kind {}",
            entry_id, descriptor.name
        );
        self.entries
            .push(PoolEntry::new(entry_id, kind, descriptor, self.capacity));
        Ok(self.entries.len() - 1)
    }

    // Synchronization

    pub fn drain_dirty(&mut self) -> Vec<PoolEntryId> {
        self.dirty.drain_dirty()
    }

    pub fn dirty_tracker(&self) -> &DirtyTracker {
        &self.dirty
    }

    // Accessors

    pub fn entry(&self, entry_id: PoolEntryId) -> Option<&PoolEntry<D>> {
        self.entries.get(usize::from(entry_id))
    }

    pub fn entry_for_kind(&self, kind: &PoolKind) -> Option<&PoolEntry<D>> {
        self.position_of(kind).map(|index| &self.entries[index])
    }

    pub fn entries(&self) -> impl Iterator<Item = &PoolEntry<D>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destroys every pooled instance and forgets every entry.
    pub fn teardown(&mut self, factory: &mut dyn InstanceFactory) {
        info!("PoolRegistry: tearing down {} entries", self.entries.len());
        for entry in self.entries.iter_mut() {
            entry.teardown(factory);
        }
        self.entries.clear();
        self.dirty.clear();
    }
}
