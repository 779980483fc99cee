//! # Tidepool Shared
//! Pool bookkeeping shared between tidepool-server & tidepool-client crates:
//! slot masks, pool entries, the entry wire format, and the observer-side
//! reconciler.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tidepool_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger,
    UnsignedVariableInteger,
};

mod constants;
mod instance;
mod kinds;
mod pool;
mod replication_channel;
mod types;

pub use constants::MAX_SLOTS;
pub use instance::{
    capability::Capability,
    instance_factory::InstanceFactory,
    instance_id::InstanceId,
    placement::Placement,
    spawn_params::{PreActivateFn, SpawnParams},
    state_snapshotter::StateSnapshotter,
};
pub use kinds::{KindDescriptor, PoolKind, PoolKinds};
pub use pool::{
    error::PoolError,
    host::{
        dirty_tracker::DirtyTracker,
        pool_entry::{PoolEntry, SlotAcquisition},
        pool_registry::{Acquired, PoolRegistry, Released},
    },
    pooled_instance::PooledInstance,
    remote::{
        observed_entry::ObservedEntry, reconcile_event::ReconcileEvent, reconciler::Reconciler,
    },
    slot_arena::{SlotArena, SlotIndex},
    slot_mask::SlotMask,
    snapshot::{PoolEntrySnapshot, SnapshotInstance},
};
pub use replication_channel::ReplicationChannel;
pub use types::PoolEntryId;
