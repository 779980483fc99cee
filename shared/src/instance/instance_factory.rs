use crate::{Capability, InstanceId, Placement, PoolKind, SpawnParams};

/// Engine-side construction and control of pooled instances.
///
/// The pool decides *when* an instance is created, activated, deactivated or
/// destroyed; the factory decides *how*. Only `create`, `destroy`,
/// `is_valid`, `set_active` and `set_placement` are required; the remaining
/// toggles default to doing nothing for engines without those concepts.
pub trait InstanceFactory {
    /// Builds a new, active instance. `None` means the engine refused.
    fn create(&mut self, kind: PoolKind, params: &SpawnParams) -> Option<InstanceId>;

    /// Permanently removes an instance that is leaving the pool.
    fn destroy(&mut self, instance: InstanceId);

    /// False once the instance was destroyed outside the pool's control.
    fn is_valid(&self, instance: InstanceId) -> bool;

    /// Shows or hides the instance.
    fn set_active(&mut self, instance: InstanceId, active: bool);

    fn set_placement(&mut self, instance: InstanceId, placement: &Placement);

    /// Resolved once per instance and cached by the pool.
    fn capability(&self, _instance: InstanceId) -> Capability {
        Capability::Plain
    }

    fn set_collision_enabled(&mut self, _instance: InstanceId, _enabled: bool) {}

    /// Periodic update ("tick") of the instance and its parts.
    fn set_tick_enabled(&mut self, _instance: InstanceId, _enabled: bool) {}

    fn begin_lifecycle(&mut self, _instance: InstanceId) {}

    fn end_lifecycle(&mut self, _instance: InstanceId) {}

    fn clear_timers(&mut self, _instance: InstanceId) {}

    /// Dormant instances are skipped by the engine's own replication.
    fn set_dormant(&mut self, _instance: InstanceId, _dormant: bool) {}
}
