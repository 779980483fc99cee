use log::trace;

use crate::{InstanceFactory, PooledInstance, PreActivateFn, StateSnapshotter};

/// Brings a leased instance back into play at its recorded placement.
///
/// Shared by the authority (when a free slot is reused) and by observers
/// (when a slot's bit turns on).
pub(crate) fn activate<D>(
    factory: &mut dyn InstanceFactory,
    instance: &PooledInstance<D>,
    start_with_tick_enabled: bool,
    collision_enabled: bool,
    pre_activate: Option<PreActivateFn>,
) {
    let id = instance.id();
    trace!("Lifecycle: activating {:?}", id);

    factory.set_placement(id, instance.placement());
    factory.set_tick_enabled(id, start_with_tick_enabled);
    factory.set_active(id, true);
    factory.set_collision_enabled(id, collision_enabled);
    factory.set_dormant(id, false);

    if let Some(callback) = pre_activate {
        callback(id);
    }

    if instance.capability().has_hooks() {
        factory.begin_lifecycle(id);
    }
}

/// Takes an instance out of play and returns it to its kind defaults.
pub(crate) fn deactivate<D>(
    factory: &mut dyn InstanceFactory,
    snapshotter: &mut dyn StateSnapshotter<Snapshot = D>,
    instance: &PooledInstance<D>,
) {
    let id = instance.id();
    trace!("Lifecycle: deactivating {:?}", id);

    if instance.capability().has_hooks() {
        factory.end_lifecycle(id);
    }

    factory.set_collision_enabled(id, false);
    factory.set_active(id, false);
    factory.set_tick_enabled(id, false);
    factory.clear_timers(id);

    if let Some(defaults) = instance.defaults() {
        snapshotter.restore(id, defaults);
    }

    factory.set_dormant(id, true);
}
