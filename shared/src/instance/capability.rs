/// What a pooled instance supports beyond the engine-side toggles every
/// instance gets. Resolved once when the instance enters a pool and cached
/// beside its handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Capability {
    /// Only visibility, collision, periodic update and placement are driven.
    #[default]
    Plain,
    /// Receives begin/end lifecycle hooks. With `auto_collect`, its default
    /// field values are captured at registration and restored on release.
    Hooks { auto_collect: bool },
}

impl Capability {
    pub fn has_hooks(&self) -> bool {
        matches!(self, Capability::Hooks { .. })
    }

    pub fn auto_collect(&self) -> bool {
        matches!(self, Capability::Hooks { auto_collect: true })
    }
}
