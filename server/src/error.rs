use thiserror::Error;

use tidepool_shared::PoolError;

/// Errors returned by the authority-side facade
#[derive(Debug, Clone, Error)]
pub enum PoolServerError {
    /// A pool operation was rejected
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Another holder of a [`SharedPoolServer`](crate::SharedPoolServer)
    /// panicked while holding the lock
    #[error("Pool server lock was poisoned during {operation}")]
    LockPoisoned { operation: &'static str },
}
