pub mod error;
pub mod host;
pub mod pooled_instance;
pub mod remote;
pub mod slot_arena;
pub mod slot_mask;
pub mod snapshot;

pub(crate) mod lifecycle;
