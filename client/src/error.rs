use thiserror::Error;

use tidepool_shared::{PoolEntryId, PoolError, SerdeErr};

#[derive(Debug, Clone, Error)]
pub enum PoolClientError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The payload did not decode as a pool entry
    #[error("Malformed pool entry {entry}: {source}")]
    Serde {
        entry: PoolEntryId,
        #[source]
        source: SerdeErr,
    },
}
