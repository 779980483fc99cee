/// Hard ceiling on instances per kind: one bit of a `u64` usage mask each.
pub const MAX_SLOTS: u8 = 64;
