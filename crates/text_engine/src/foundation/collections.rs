//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

/// Handle-based map using slot map for stable references
///
/// Keys stay valid while the value is replaced in place, which is what lets
/// queued work keep referring to a resource across a hot reload.
pub type HandleMap<K, T> = SlotMap<K, T>;
