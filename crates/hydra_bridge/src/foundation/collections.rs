//! Generational handle collections
//!
//! Host entities live in slot maps. A key carries both the slot index and
//! its generation, so a slot reused after a delete never produces a key
//! equal to one handed out earlier.

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Handle of an object in a [`crate::host::HostScene`]
    pub struct ObjectKey;

    /// Handle of a material in a [`crate::host::HostScene`]
    pub struct MaterialKey;
}

/// Pack a key into a single integer that is unique for the life of its map.
pub fn key_bits<K: Key>(key: K) -> u64 {
    key.data().as_ffi()
}
