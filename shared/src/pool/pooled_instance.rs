use crate::{Capability, InstanceId, Placement};

/// A handle as stored in a slot, with what the pool cached about it.
#[derive(Clone, Debug)]
pub struct PooledInstance<D> {
    id: InstanceId,
    capability: Capability,
    placement: Placement,
    defaults: Option<D>,
}

impl<D> PooledInstance<D> {
    pub(crate) fn new(id: InstanceId, capability: Capability, placement: Placement, defaults: Option<D>) -> Self {
        Self {
            id,
            capability,
            placement,
            defaults,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Placement recorded the last time the slot was leased
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Default field values captured at registration, if auto-collected
    pub fn defaults(&self) -> Option<&D> {
        self.defaults.as_ref()
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}
