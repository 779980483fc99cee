use std::{collections::HashSet, time::Instant};

use log::{debug, info, warn};

use tidepool_shared::{
    Acquired, InstanceFactory, InstanceId, PoolEntry, PoolEntryId, PoolError, PoolKinds,
    PoolRegistry, Released, ReplicationChannel, SpawnParams, StateSnapshotter,
};

use crate::{ExhaustedPolicy, PoolServerConfig, PoolServerError};

/// Result of [`PoolServer::spawn`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawned {
    /// Leased from the kind's pool
    Pooled(Acquired),
    /// Created outside the pool because the kind was exhausted
    Unpooled(InstanceId),
}

impl Spawned {
    pub fn instance(&self) -> InstanceId {
        match self {
            Spawned::Pooled(acquired) => acquired.instance,
            Spawned::Unpooled(instance) => *instance,
        }
    }
}

/// The authority: owns the pool registry and publishes changed entries to
/// observers through a [`ReplicationChannel`].
pub struct PoolServer<D> {
    config: PoolServerConfig,
    kinds: PoolKinds,
    registry: PoolRegistry<D>,
    unpooled: HashSet<InstanceId>,
    last_sync: Option<Instant>,
}

impl<D> PoolServer<D> {
    /// Create a new PoolServer
    pub fn new(config: PoolServerConfig, kinds: PoolKinds) -> Self {
        let registry = PoolRegistry::new(config.max_instances_per_kind);
        Self {
            config,
            kinds,
            registry,
            unpooled: HashSet::new(),
            last_sync: None,
        }
    }

    pub fn config(&self) -> &PoolServerConfig {
        &self.config
    }

    pub fn kinds(&self) -> &PoolKinds {
        &self.kinds
    }

    // Instances

    /// Leases an instance of `params.kind`.
    pub fn spawn(
        &mut self,
        mut params: SpawnParams,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Spawned, PoolServerError> {
        let exhausted = match self.registry.entry_for_kind(&params.kind) {
            Some(entry) => entry.is_saturated(),
            None => self.registry.capacity() == 0,
        };

        if exhausted && self.config.exhausted_policy == ExhaustedPolicy::SpawnUnpooled {
            let kind_name = self.kinds.kind_name(&params.kind);
            let Some(instance) = factory.create(params.kind, &params) else {
                return Err(PoolError::SpawnFailed { kind: kind_name }.into());
            };
            if params.disable_collision_on_spawn {
                factory.set_collision_enabled(instance, false);
            }
            if let Some(callback) = params.on_pre_activate.take() {
                callback(instance);
            }

            warn!(
                "PoolServer: kind {} is exhausted, spawned {:?} outside the pool",
                kind_name, instance
            );
            self.unpooled.insert(instance);
            return Ok(Spawned::Unpooled(instance));
        }

        let acquired = self
            .registry
            .acquire(&self.kinds, params, factory, snapshotter)?;
        Ok(Spawned::Pooled(acquired))
    }

    /// Returns `instance` to its pool. Unpooled instances, and instances no
    /// pool knows, are destroyed.
    pub fn release(
        &mut self,
        instance: InstanceId,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Released, PoolServerError> {
        if self.unpooled.remove(&instance) {
            debug!("PoolServer: destroying unpooled {:?}", instance);
            if factory.is_valid(instance) {
                factory.destroy(instance);
            }
            return Ok(Released::Discarded);
        }

        Ok(self.registry.release(instance, factory, snapshotter)?)
    }

    // Synchronization

    /// Publishes every entry changed since the last cycle, if at least
    /// `sync_interval` has passed since that cycle. Returns the number of
    /// entries published.
    pub fn send_updates(&mut self, now: Instant, channel: &mut dyn ReplicationChannel) -> usize {
        if let Some(last_sync) = self.last_sync {
            if now.saturating_duration_since(last_sync) < self.config.sync_interval {
                return 0;
            }
        }
        self.last_sync = Some(now);
        self.force_send_updates(channel)
    }

    /// Publishes every entry changed since the last cycle, ignoring cadence.
    pub fn force_send_updates(&mut self, channel: &mut dyn ReplicationChannel) -> usize {
        let dirty = self.registry.drain_dirty();
        let mut published = 0;
        for entry_id in dirty {
            if let Some(entry) = self.registry.entry(entry_id) {
                channel.publish(entry_id, &entry.snapshot().to_bytes());
                published += 1;
            }
        }
        if published > 0 {
            debug!("PoolServer: published {} changed entries", published);
        }
        published
    }

    /// Publishes every entry regardless of the dirty set, for an observer
    /// that joins mid-session.
    pub fn send_full_state(&self, channel: &mut dyn ReplicationChannel) -> usize {
        let mut published = 0;
        for entry in self.registry.entries() {
            channel.publish(entry.id(), &entry.snapshot().to_bytes());
            published += 1;
        }
        published
    }

    /// End of session: destroys every instance, pooled or not.
    pub fn shutdown(&mut self, factory: &mut dyn InstanceFactory) {
        info!(
            "PoolServer: shutting down, {} entries and {} unpooled instances",
            self.registry.len(),
            self.unpooled.len()
        );
        self.registry.teardown(factory);
        for instance in self.unpooled.drain() {
            if factory.is_valid(instance) {
                factory.destroy(instance);
            }
        }
        self.last_sync = None;
    }

    // Accessors

    pub fn registry(&self) -> &PoolRegistry<D> {
        &self.registry
    }

    pub fn entry(&self, entry_id: PoolEntryId) -> Option<&PoolEntry<D>> {
        self.registry.entry(entry_id)
    }

    pub fn is_unpooled(&self, instance: InstanceId) -> bool {
        self.unpooled.contains(&instance)
    }

    pub fn unpooled_count(&self) -> usize {
        self.unpooled.len()
    }
}
