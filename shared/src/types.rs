/// Position of an entry in the authority's registry. Assigned in creation
/// order and never reused while the pool is alive.
pub type PoolEntryId = u16;
