pub mod dirty_tracker;
pub mod pool_entry;
pub mod pool_registry;
