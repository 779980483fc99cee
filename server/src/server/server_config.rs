use std::{default::Default, time::Duration};

use tidepool_shared::MAX_SLOTS;

/// What `spawn` does once a kind has leased every instance it may hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExhaustedPolicy {
    /// Return `PoolError::PoolExhausted`
    #[default]
    Fail,
    /// Create a throwaway instance outside the pool; it is destroyed on release
    SpawnUnpooled,
}

/// Contains Config properties which will be used by the PoolServer
#[derive(Clone, Debug)]
pub struct PoolServerConfig {
    /// Minimum time between two publishing cycles of `send_updates`.
    /// Defaults to 100ms, i.e. 10 updates per second.
    pub sync_interval: Duration,
    /// Upper bound on instances per kind. Values above 64 are clamped.
    pub max_instances_per_kind: u8,
    /// Behavior of `spawn` when a kind is exhausted
    pub exhausted_policy: ExhaustedPolicy,
}

impl Default for PoolServerConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_millis(100),
            max_instances_per_kind: MAX_SLOTS,
            exhausted_policy: ExhaustedPolicy::default(),
        }
    }
}
