use crate::InstanceId;

/// Returns instances to their kind defaults without rebuilding them.
///
/// `capture` runs once, when an auto-collecting instance joins a pool; the
/// pool keeps the snapshot beside the handle and passes it back to `restore`
/// every time the instance is released.
pub trait StateSnapshotter {
    type Snapshot;

    fn capture(&mut self, instance: InstanceId) -> Self::Snapshot;

    fn restore(&mut self, instance: InstanceId, snapshot: &Self::Snapshot);
}
