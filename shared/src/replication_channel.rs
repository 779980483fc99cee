use crate::PoolEntryId;

/// Outbound half of the transport between the authority and its observers.
///
/// Called once per drained dirty entry per synchronization cycle with the full
/// serialized entry. Delivery, ordering per entry and fan-out to observers are
/// the transport's concern; observers hand what they receive to
/// `Reconciler::on_entry_received` (through `PoolClient::receive`).
pub trait ReplicationChannel {
    fn publish(&mut self, entry_id: PoolEntryId, payload: &[u8]);
}
