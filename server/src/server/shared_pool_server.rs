use std::{
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Instant,
};

use tidepool_shared::{
    InstanceFactory, InstanceId, Released, ReplicationChannel, SpawnParams, StateSnapshotter,
};

use crate::{PoolServer, PoolServerError, Spawned};

/// A [`PoolServer`] that several owners on different threads can hold.
///
/// Every operation takes the lock for its whole duration, so spawn, release
/// and publishing never interleave.
pub struct SharedPoolServer<D> {
    inner: Arc<RwLock<PoolServer<D>>>,
}

impl<D> Clone for SharedPoolServer<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D> SharedPoolServer<D> {
    pub fn new(server: PoolServer<D>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(server)),
        }
    }

    pub fn try_read(&self) -> Result<RwLockReadGuard<'_, PoolServer<D>>, PoolServerError> {
        self.inner
            .read()
            .map_err(|_| PoolServerError::LockPoisoned { operation: "read" })
    }

    pub fn try_write(&self) -> Result<RwLockWriteGuard<'_, PoolServer<D>>, PoolServerError> {
        self.inner
            .write()
            .map_err(|_| PoolServerError::LockPoisoned { operation: "write" })
    }

    pub fn spawn(
        &self,
        params: SpawnParams,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Spawned, PoolServerError> {
        self.try_write()?.spawn(params, factory, snapshotter)
    }

    pub fn release(
        &self,
        instance: InstanceId,
        factory: &mut dyn InstanceFactory,
        snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    ) -> Result<Released, PoolServerError> {
        self.try_write()?.release(instance, factory, snapshotter)
    }

    pub fn send_updates(
        &self,
        now: Instant,
        channel: &mut dyn ReplicationChannel,
    ) -> Result<usize, PoolServerError> {
        Ok(self.try_write()?.send_updates(now, channel))
    }

    pub fn send_full_state(
        &self,
        channel: &mut dyn ReplicationChannel,
    ) -> Result<usize, PoolServerError> {
        Ok(self.try_read()?.send_full_state(channel))
    }
}
