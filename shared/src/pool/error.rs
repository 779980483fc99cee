use thiserror::Error;

use crate::{InstanceId, PoolEntryId};

/// Errors raised by the pool core.
///
/// None of these are fatal: allocation and release errors go back to the
/// caller, who picks a fallback; reconcile-time errors are contained by the
/// observer and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    // Authority: acquire / release

    /// Every one of the kind's slots is leased and the entry is at capacity
    #[error("Pool for kind {kind} exhausted: all {capacity} slots leased")]
    PoolExhausted { kind: String, capacity: u8 },

    /// The factory could not build a new instance
    #[error("Factory failed to create an instance of kind {kind}")]
    SpawnFailed { kind: String },

    /// The released handle is not part of this entry (try the next one)
    #[error("Instance {instance:?} does not belong to pool entry {entry}")]
    TypeMismatchOnRelease { instance: InstanceId, entry: PoolEntryId },

    /// The handle belongs to this entry but its slot is already free
    #[error("Instance {instance:?} in slot {slot} is not leased")]
    SlotNotLeased { instance: InstanceId, slot: u8 },

    /// The handle is leased here but was destroyed out of band
    #[error("Instance {instance:?} in slot {slot} was destroyed before release")]
    StaleHandleOnRelease { instance: InstanceId, slot: u8 },

    // Kinds

    /// The kind was never registered in the kind table
    #[error("Kind {kind} is not registered")]
    UnknownKind { kind: u16 },

    /// A kind with this name is already registered
    #[error("Kind {name} is already registered")]
    DuplicateKind { name: String },

    /// No more kind ids available
    #[error("Cannot register kind {name}: kind table is full")]
    KindTableFull { name: String },

    // Observer: reconciliation

    /// The instance at a changed slot was destroyed out of band
    #[error("Instance {instance:?} in slot {slot} is no longer valid, skipping")]
    StaleHandleOnReconcile { instance: InstanceId, slot: u8 },

    /// A change arrived for an entry that was never introduced
    #[error("Pool entry {entry} was never introduced on this observer")]
    UnknownEntryOnReconcile { entry: PoolEntryId },

    /// A snapshot contradicts what the observer already adopted
    #[error("Pool entry {entry} violates replication protocol: {reason}")]
    ProtocolViolation { entry: PoolEntryId, reason: String },
}
