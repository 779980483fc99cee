//! # Tidepool Client
//! The observer side of tidepool: decodes pool entries published by the
//! authority and mirrors their usage masks onto local instances.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tidepool_shared::{
        InstanceFactory, InstanceId, KindDescriptor, ObservedEntry, Placement, PoolEntryId,
        PoolError, PoolKind, PoolKinds, ReconcileEvent, SerdeErr, SlotMask, StateSnapshotter,
    };
}

mod client;
mod error;

pub use client::{PoolClient, PoolClientConfig};
pub use error::PoolClientError;
