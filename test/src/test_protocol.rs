use tidepool_shared::{KindDescriptor, PoolKind, PoolKinds};

/// Kinds registered by [`kinds`]
#[derive(Clone, Copy, Debug)]
pub struct TestKinds {
    /// Ticks from activation
    pub projectile: PoolKind,
    /// Never ticks
    pub decal: PoolKind,
    pub pickup: PoolKind,
}

/// The kind table both sides of a test build.
pub fn kinds() -> (PoolKinds, TestKinds) {
    let mut kinds = PoolKinds::new();
    let projectile = kinds
        .add_kind(KindDescriptor::new("Projectile", true))
        .expect("fresh table");
    let decal = kinds
        .add_kind(KindDescriptor::new("Decal", false))
        .expect("fresh table");
    let pickup = kinds
        .add_kind(KindDescriptor::new("Pickup", true))
        .expect("fresh table");

    (
        kinds,
        TestKinds {
            projectile,
            decal,
            pickup,
        },
    )
}
