use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    pool::lifecycle, InstanceFactory, ObservedEntry, PoolEntryId, PoolEntrySnapshot, PoolError,
    PoolKinds, PooledInstance, ReconcileEvent, StateSnapshotter,
};

/// Observer-side state machine turning received entry snapshots into
/// activate/deactivate calls.
///
/// Each entry is either unseen (absent from the map) or tracked. Snapshots for
/// one entry must be applied in the order they were received: the diff is
/// always taken against the mask applied last.
pub struct Reconciler<D> {
    entries: HashMap<PoolEntryId, ObservedEntry<D>>,
    reintroduce_on_violation: bool,
}

impl<D> Reconciler<D> {
    pub fn new(reintroduce_on_violation: bool) -> Self {
        Self {
            entries: HashMap::new(),
            reintroduce_on_violation,
        }
    }

    /// Applies one received snapshot, introducing the entry if it is unseen.
    pub fn on_entry_received(
        &mut self,
        entry_id: PoolEntryId,
        snapshot: &PoolEntrySnapshot,
        kinds: &PoolKinds,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Vec<ReconcileEvent>, PoolError> {
        let Some(entry) = self.entries.get(&entry_id) else {
            return self.on_entry_introduced(entry_id, snapshot, kinds, factory, snapshotter);
        };

        if let Some(reason) = Self::violation(entry, snapshot, kinds) {
            let err = PoolError::ProtocolViolation {
                entry: entry_id,
                reason,
            };
            if !self.reintroduce_on_violation {
                return Err(err);
            }
            warn!("Reconciler: {}, re-introducing", err);
            return self.on_entry_introduced(entry_id, snapshot, kinds, factory, snapshotter);
        }

        self.on_entry_changed(entry_id, snapshot, factory, snapshotter)
    }

    /// Unseen → Tracked. Membership is adopted as received: no transition
    /// fires for any slot.
    pub fn on_entry_introduced(
        &mut self,
        entry_id: PoolEntryId,
        snapshot: &PoolEntrySnapshot,
        kinds: &PoolKinds,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Vec<ReconcileEvent>, PoolError> {
        let Some(descriptor) = kinds.descriptor(&snapshot.kind) else {
            return Err(PoolError::UnknownKind {
                kind: snapshot.kind.net_id(),
            });
        };

        let mut entry = ObservedEntry::new(snapshot.kind, descriptor.start_with_tick_enabled);
        Self::adopt_new_instances(&mut entry, snapshot, factory, snapshotter);
        entry.observer_mask = snapshot.usage_mask;
        entry.known_count = entry.instances.len();

        info!(
            "Reconciler: introduced entry {} ({}) with {} instances, {:?}",
            entry_id, descriptor.name, entry.known_count, entry.observer_mask
        );
        let event = ReconcileEvent::Introduced {
            entry_id,
            known_count: entry.known_count,
        };
        self.entries.insert(entry_id, entry);

        Ok(vec![event])
    }

    /// Tracked → Tracked. Fires one transition per slot whose bit differs
    /// from the last applied mask, for slots below `known_count` only, in
    /// ascending slot order.
    pub fn on_entry_changed(
        &mut self,
        entry_id: PoolEntryId,
        snapshot: &PoolEntrySnapshot,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Vec<ReconcileEvent>, PoolError> {
        let Some(entry) = self.entries.get_mut(&entry_id) else {
            return Err(PoolError::UnknownEntryOnReconcile { entry: entry_id });
        };

        let mut events = Vec::new();

        if snapshot.usage_mask != entry.observer_mask {
            let diff = snapshot.usage_mask.xor(&entry.observer_mask);
            for raw in diff.iter_set() {
                if raw >= entry.known_count {
                    break;
                }
                let Some(slot) = entry.instances.slot(raw) else {
                    break;
                };

                if let (Some(pooled), Some(received)) = (
                    entry.instances.get_mut(slot),
                    snapshot.instances.get(usize::from(raw)),
                ) {
                    pooled.set_placement(received.placement);
                }

                let pooled = &entry.instances[slot];
                let instance = pooled.id();

                if !factory.is_valid(instance) {
                    warn!(
                        "Reconciler: {}",
                        PoolError::StaleHandleOnReconcile { instance, slot: raw }
                    );
                    events.push(ReconcileEvent::Skipped {
                        entry_id,
                        slot,
                        instance,
                    });
                    continue;
                }

                if snapshot.usage_mask.test(raw) {
                    lifecycle::activate(factory, pooled, entry.start_with_tick_enabled, true, None);
                    events.push(ReconcileEvent::Activated {
                        entry_id,
                        slot,
                        instance,
                    });
                } else {
                    lifecycle::deactivate(factory, snapshotter, pooled);
                    events.push(ReconcileEvent::Deactivated {
                        entry_id,
                        slot,
                        instance,
                    });
                }
            }
        }

        // commit even if some slots were skipped
        let from = entry.known_count;
        Self::adopt_new_instances(entry, snapshot, factory, snapshotter);
        entry.observer_mask = snapshot.usage_mask;
        entry.known_count = entry.instances.len();

        if entry.known_count > from {
            debug!(
                "Reconciler: entry {} grew from {} to {} instances",
                entry_id, from, entry.known_count
            );
            events.push(ReconcileEvent::Grown {
                entry_id,
                from,
                to: entry.known_count,
            });
        }

        Ok(events)
    }

    /// Appends the snapshot's instances this entry has not seen yet.
    fn adopt_new_instances(
        entry: &mut ObservedEntry<D>,
        snapshot: &PoolEntrySnapshot,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) {
        let already_known = usize::from(entry.instances.len());
        for received in snapshot.instances.iter().skip(already_known) {
            let capability = factory.capability(received.id);
            let defaults = if capability.auto_collect() && factory.is_valid(received.id) {
                Some(snapshotter.capture(received.id))
            } else {
                None
            };

            let pooled = PooledInstance::new(received.id, capability, received.placement, defaults);
            if entry.instances.push(pooled).is_err() {
                warn!("Reconciler: snapshot carries more instances than a pool can hold");
                break;
            }
        }
    }

    /// Why `snapshot` cannot be a later state of `entry`, if it cannot.
    fn violation(entry: &ObservedEntry<D>, snapshot: &PoolEntrySnapshot, kinds: &PoolKinds) -> Option<String> {
        if snapshot.kind != entry.kind {
            return Some(format!(
                "kind changed from {} to {}",
                kinds.kind_name(&entry.kind),
                kinds.kind_name(&snapshot.kind)
            ));
        }

        if snapshot.instance_count() < entry.instances.len() {
            return Some(format!(
                "instance list shrank from {} to {}",
                entry.instances.len(),
                snapshot.instance_count()
            ));
        }

        for ((slot, known), received) in entry.instances.iter().zip(snapshot.instances.iter()) {
            if known.id() != received.id {
                return Some(format!(
                    "slot {} now holds {:?} instead of {:?}",
                    slot.value(),
                    received.id,
                    known.id()
                ));
            }
        }

        None
    }

    // Accessors

    pub fn entry(&self, entry_id: PoolEntryId) -> Option<&ObservedEntry<D>> {
        self.entries.get(&entry_id)
    }

    pub fn is_tracked(&self, entry_id: PoolEntryId) -> bool {
        self.entries.contains_key(&entry_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every tracked entry; the next snapshot of each is an
    /// introduction again.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
