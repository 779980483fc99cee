use log::{debug, warn};

use crate::{
    pool::lifecycle, DirtyTracker, InstanceFactory, InstanceId, KindDescriptor, Placement,
    PoolEntryId, PoolEntrySnapshot, PoolError, PoolKind, PooledInstance, SlotArena, SlotIndex,
    SlotMask, SnapshotInstance, SpawnParams, StateSnapshotter,
};

/// How `find_or_create_slot` satisfied a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotAcquisition {
    /// An idle instance was leased again; the caller must re-activate it
    Reused(SlotIndex),
    /// A new instance was created and appended
    Fresh(SlotIndex),
}

impl SlotAcquisition {
    pub fn slot(&self) -> SlotIndex {
        match self {
            SlotAcquisition::Reused(slot) | SlotAcquisition::Fresh(slot) => *slot,
        }
    }
}

/// The authority's pool for a single kind.
pub struct PoolEntry<D> {
    id: PoolEntryId,
    kind: PoolKind,
    kind_name: String,
    instances: SlotArena<PooledInstance<D>>,
    usage_mask: SlotMask,
    start_with_tick_enabled: bool,
    capacity: u8,
}

impl<D> PoolEntry<D> {
    pub(crate) fn new(id: PoolEntryId, kind: PoolKind, descriptor: &KindDescriptor, capacity: u8) -> Self {
        Self {
            id,
            kind,
            kind_name: descriptor.name.clone(),
            instances: SlotArena::new(),
            usage_mask: SlotMask::EMPTY,
            start_with_tick_enabled: descriptor.start_with_tick_enabled,
            capacity,
        }
    }

    pub fn id(&self) -> PoolEntryId {
        self.id
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn kind_name(&self) -> &str {
        &self.kind_name
    }

    pub fn usage_mask(&self) -> SlotMask {
        self.usage_mask
    }

    pub fn start_with_tick_enabled(&self) -> bool {
        self.start_with_tick_enabled
    }

    pub fn instances(&self) -> &SlotArena<PooledInstance<D>> {
        &self.instances
    }

    pub fn leased_count(&self) -> u8 {
        self.usage_mask.count()
    }

    /// All slots exist and all are leased.
    pub fn is_saturated(&self) -> bool {
        self.instances.len() >= self.capacity && self.find_unused_slot().is_none()
    }

    pub fn is_leased(&self, instance: InstanceId) -> bool {
        self.instances
            .position(|pooled| pooled.id() == instance)
            .is_some_and(|slot| self.usage_mask.test(slot.value()))
    }

    // Acquire

    /// Leases the lowest free slot, growing the entry if none is free.
    ///
    /// A reused instance is only marked as leased here; activating it again
    /// is the caller's job. A fresh instance comes back from the factory
    /// already active.
    pub(crate) fn find_or_create_slot(
        &mut self,
        params: &SpawnParams,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
        dirty: &mut DirtyTracker,
    ) -> Result<SlotAcquisition, PoolError> {
        if let Some(slot) = self.find_unused_slot() {
            self.lease(slot, params.placement, dirty);
            debug!(
                "PoolEntry {}: reusing slot {} of kind {}",
                self.id,
                slot.value(),
                self.kind_name
            );
            return Ok(SlotAcquisition::Reused(slot));
        }

        if self.instances.len() >= self.capacity {
            warn!(
                "PoolEntry {}: kind {} reached its limit of {} instances",
                self.id, self.kind_name, self.capacity
            );
            return Err(self.exhausted());
        }

        let Some(id) = factory.create(self.kind, params) else {
            return Err(PoolError::SpawnFailed {
                kind: self.kind_name.clone(),
            });
        };

        let capability = factory.capability(id);
        let defaults = if capability.auto_collect() {
            Some(snapshotter.capture(id))
        } else {
            None
        };

        let slot = match self
            .instances
            .push(PooledInstance::new(id, capability, params.placement, defaults))
        {
            Ok(slot) => slot,
            Err(rejected) => {
                factory.destroy(rejected.id());
                return Err(self.exhausted());
            }
        };

        self.usage_mask.set(slot.value(), true);
        dirty.mark_dirty(self.id);

        debug!(
            "PoolEntry {}: grew kind {} to {} instances",
            self.id,
            self.kind_name,
            self.instances.len()
        );
        Ok(SlotAcquisition::Fresh(slot))
    }

    fn find_unused_slot(&self) -> Option<SlotIndex> {
        if self.instances.is_empty() || self.usage_mask.is_full() {
            return None;
        }
        // a clear bit past the last instance means every instance is leased
        self.instances.slot(self.usage_mask.first_clear()?)
    }

    fn lease(&mut self, slot: SlotIndex, placement: Placement, dirty: &mut DirtyTracker) {
        if let Some(pooled) = self.instances.get_mut(slot) {
            pooled.set_placement(placement);
        }
        self.usage_mask.set(slot.value(), true);
        dirty.mark_dirty(self.id);
    }

    fn exhausted(&self) -> PoolError {
        PoolError::PoolExhausted {
            kind: self.kind_name.clone(),
            capacity: self.capacity,
        }
    }

    // Release

    /// Frees the slot holding `instance` and runs the deactivation sequence.
    ///
    /// A handle destroyed out of band is refused before anything changes:
    /// its slot stays leased and nothing is called on it.
    pub(crate) fn release(
        &mut self,
        instance: InstanceId,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
        dirty: &mut DirtyTracker,
    ) -> Result<SlotIndex, PoolError> {
        let Some(slot) = self.instances.position(|pooled| pooled.id() == instance) else {
            return Err(PoolError::TypeMismatchOnRelease {
                instance,
                entry: self.id,
            });
        };

        if !self.usage_mask.test(slot.value()) {
            return Err(PoolError::SlotNotLeased {
                instance,
                slot: slot.value(),
            });
        }

        if !factory.is_valid(instance) {
            warn!(
                "PoolEntry {}: refusing to release destroyed {:?} in slot {}",
                self.id,
                instance,
                slot.value()
            );
            return Err(PoolError::StaleHandleOnRelease {
                instance,
                slot: slot.value(),
            });
        }

        self.usage_mask.set(slot.value(), false);
        dirty.mark_dirty(self.id);

        lifecycle::deactivate(factory, snapshotter, &self.instances[slot]);

        debug!(
            "PoolEntry {}: released slot {} of kind {}",
            self.id,
            slot.value(),
            self.kind_name
        );
        Ok(slot)
    }

    // Replication

    pub fn snapshot(&self) -> PoolEntrySnapshot {
        PoolEntrySnapshot {
            kind: self.kind,
            usage_mask: self.usage_mask,
            instances: self
                .instances
                .iter()
                .map(|(_, pooled)| SnapshotInstance {
                    id: pooled.id(),
                    placement: *pooled.placement(),
                })
                .collect(),
        }
    }

    /// Destroys every instance, leased or not. Only at end of session.
    pub(crate) fn teardown(&mut self, factory: &mut dyn InstanceFactory) {
        for pooled in self.instances.drain() {
            if factory.is_valid(pooled.id()) {
                factory.destroy(pooled.id());
            }
        }
        self.usage_mask.clear();
    }
}
