use std::fmt;

use crate::{InstanceId, Placement, PoolKind};

pub type PreActivateFn = Box<dyn FnOnce(InstanceId) + Send>;

/// A request for an instance of `kind`.
pub struct SpawnParams {
    pub kind: PoolKind,
    pub placement: Placement,
    /// Instance that owns the spawned one, passed through to the factory
    pub owner: Option<InstanceId>,
    /// Leaves collision off after activation
    pub disable_collision_on_spawn: bool,
    /// Runs once the handle is known: right after creation for a fresh
    /// instance, or just before the begin hook for a reused one.
    pub on_pre_activate: Option<PreActivateFn>,
}

impl SpawnParams {
    pub fn new(kind: PoolKind, placement: Placement) -> Self {
        Self {
            kind,
            placement,
            owner: None,
            disable_collision_on_spawn: false,
            on_pre_activate: None,
        }
    }

    pub fn with_owner(mut self, owner: InstanceId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_collision_disabled(mut self) -> Self {
        self.disable_collision_on_spawn = true;
        self
    }

    pub fn with_pre_activate<F: FnOnce(InstanceId) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_pre_activate = Some(Box::new(callback));
        self
    }

    pub(crate) fn run_pre_activate(&mut self, instance: InstanceId) {
        if let Some(callback) = self.on_pre_activate.take() {
            callback(instance);
        }
    }
}

impl fmt::Debug for SpawnParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnParams")
            .field("kind", &self.kind)
            .field("placement", &self.placement)
            .field("owner", &self.owner)
            .field("disable_collision_on_spawn", &self.disable_collision_on_spawn)
            .field("on_pre_activate", &self.on_pre_activate.is_some())
            .finish()
    }
}
