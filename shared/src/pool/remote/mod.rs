pub mod observed_entry;
pub mod reconcile_event;
pub mod reconciler;
