use tidepool_client::{PoolClient, PoolClientError};
use tidepool_shared::{InstanceFactory, PoolEntryId, ReconcileEvent, ReplicationChannel, StateSnapshotter};

/// Ordered, lossless, in-memory replication channel.
#[derive(Default)]
pub struct LocalChannel {
    published: Vec<(PoolEntryId, Vec<u8>)>,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<(PoolEntryId, Vec<u8>)> {
        std::mem::take(&mut self.published)
    }

    pub fn published(&self) -> &[(PoolEntryId, Vec<u8>)] {
        &self.published
    }

    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

impl ReplicationChannel for LocalChannel {
    fn publish(&mut self, entry_id: PoolEntryId, payload: &[u8]) {
        self.published.push((entry_id, payload.to_vec()));
    }
}

/// Feeds everything published so far to `client`, in publish order.
pub fn deliver<D>(
    channel: &mut LocalChannel,
    client: &mut PoolClient<D>,
    factory: &mut dyn InstanceFactory,
    snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
) -> Result<Vec<ReconcileEvent>, PoolClientError> {
    let mut events = Vec::new();
    for (entry_id, payload) in channel.take() {
        events.extend(client.receive(entry_id, &payload, factory, snapshotter)?);
    }
    Ok(events)
}
