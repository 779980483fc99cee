use std::default::Default;

/// Contains Config properties which will be used by the PoolClient
#[derive(Clone, Debug)]
pub struct PoolClientConfig {
    /// When a received entry contradicts what was tracked for it (different
    /// kind, fewer instances, or different instances in known slots), drop
    /// the tracked state and adopt the entry as new. When false the
    /// contradiction is returned as an error and the tracked state is kept.
    pub reintroduce_on_violation: bool,
}

impl Default for PoolClientConfig {
    fn default() -> Self {
        Self {
            reintroduce_on_violation: true,
        }
    }
}
