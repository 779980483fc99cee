//! # Tidepool Server
//! The authority side of tidepool: leases instances out of per-kind pools,
//! tracks which pool entries changed, and publishes those entries to
//! observers on a fixed cadence.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tidepool_shared::{
        InstanceFactory, InstanceId, KindDescriptor, Placement, PoolEntryId, PoolEntrySnapshot,
        PoolError, PoolKind, PoolKinds, ReplicationChannel, SpawnParams, StateSnapshotter,
    };
}

mod error;
mod server;

pub use error::PoolServerError;
pub use server::{ExhaustedPolicy, PoolServer, PoolServerConfig, SharedPoolServer, Spawned};
