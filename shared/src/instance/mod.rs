pub mod capability;
pub mod instance_factory;
pub mod instance_id;
pub mod placement;
pub mod spawn_params;
pub mod state_snapshotter;
