use log::warn;

use tidepool_shared::{
    InstanceFactory, ObservedEntry, PoolEntryId, PoolEntrySnapshot, PoolKinds, ReconcileEvent,
    Reconciler, SlotMask, StateSnapshotter,
};

use crate::{PoolClientConfig, PoolClientError};

/// An observer of the authority's pools
pub struct PoolClient<D> {
    config: PoolClientConfig,
    kinds: PoolKinds,
    reconciler: Reconciler<D>,
}

impl<D> PoolClient<D> {
    /// Create a new PoolClient. `kinds` must list the same kinds, in the same
    /// order, as the authority's table.
    pub fn new(config: PoolClientConfig, kinds: PoolKinds) -> Self {
        let reconciler = Reconciler::new(config.reintroduce_on_violation);
        Self {
            config,
            kinds,
            reconciler,
        }
    }

    pub fn config(&self) -> &PoolClientConfig {
        &self.config
    }

    pub fn kinds(&self) -> &PoolKinds {
        &self.kinds
    }

    /// Decodes one published entry and applies it. Payloads for one entry
    /// must be passed in the order they were published.
    pub fn receive(
        &mut self,
        entry_id: PoolEntryId,
        payload: &[u8],
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Vec<ReconcileEvent>, PoolClientError> {
        let snapshot = PoolEntrySnapshot::from_bytes(payload).map_err(|source| {
            warn!("PoolClient: dropping entry {}: {}", entry_id, source);
            PoolClientError::Serde {
                entry: entry_id,
                source,
            }
        })?;

        Ok(self
            .reconciler
            .on_entry_received(entry_id, &snapshot, &self.kinds, factory, snapshotter)?)
    }

    /// Forgets every tracked entry; local instances are left as they are.
    pub fn reset(&mut self) {
        self.reconciler.reset();
    }

    // Accessors

    pub fn entry(&self, entry_id: PoolEntryId) -> Option<&ObservedEntry<D>> {
        self.reconciler.entry(entry_id)
    }

    pub fn observer_mask(&self, entry_id: PoolEntryId) -> Option<SlotMask> {
        self.entry(entry_id).map(|entry| entry.observer_mask())
    }

    pub fn known_count(&self, entry_id: PoolEntryId) -> Option<u8> {
        self.entry(entry_id).map(|entry| entry.known_count())
    }

    pub fn tracked_entries(&self) -> usize {
        self.reconciler.len()
    }
}
