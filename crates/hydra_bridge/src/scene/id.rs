//! Identity mapping from host handles to scene ids
//!
//! Ids are derived from the host arena key (slot index plus generation), so
//! they are stable for the lifetime of an entity and never reused by a
//! later entity that lands in the same slot.

use std::fmt;

use crate::foundation::collections::{key_bits, MaterialKey, ObjectKey};

/// Stable path naming one primitive in the render index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(String);

impl SceneId {
    /// Wrap an already formatted path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The full path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path component
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SceneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A host handle that can be named in the render index
pub trait SceneEntity: Copy {
    /// Category prefix keeping categories from colliding
    const PREFIX: &'static str;

    /// Integer identity of the handle
    fn identity_bits(self) -> u64;
}

impl SceneEntity for ObjectKey {
    const PREFIX: &'static str = "O_";

    fn identity_bits(self) -> u64 {
        key_bits(self)
    }
}

impl SceneEntity for MaterialKey {
    const PREFIX: &'static str = "M_";

    fn identity_bits(self) -> u64 {
        key_bits(self)
    }
}

/// Formats scene ids under the delegate's root path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneIdMapper {
    root: String,
}

impl SceneIdMapper {
    /// Mapper scoped under `root` (e.g. `/blender_delegate`)
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }

    /// Id of `entity`. Pure: the same handle always yields the same id.
    pub fn scene_id<E: SceneEntity>(&self, entity: E) -> SceneId {
        SceneId(format!(
            "{}/{}{:016X}",
            self.root,
            E::PREFIX,
            entity.identity_bits()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;

    #[test]
    fn test_scene_id_is_stable() {
        let mut objects: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let key = objects.insert(());
        let mapper = SceneIdMapper::new("/root");

        assert_eq!(mapper.scene_id(key), mapper.scene_id(key));
        assert!(mapper.scene_id(key).as_str().starts_with("/root/O_"));
        assert_eq!(mapper.scene_id(key).name().len(), 2 + 16);
    }

    #[test]
    fn test_distinct_entities_never_collide() {
        let mut objects: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let mut materials: SlotMap<MaterialKey, ()> = SlotMap::with_key();
        let mapper = SceneIdMapper::new("/root");

        let a = objects.insert(());
        let b = objects.insert(());
        let m = materials.insert(());
        assert_ne!(mapper.scene_id(a), mapper.scene_id(b));
        // Same slot index in different arenas still differs by prefix
        assert_ne!(a.identity_bits(), b.identity_bits());
        assert_ne!(mapper.scene_id(a).as_str(), mapper.scene_id(m).as_str());
    }

    #[test]
    fn test_slot_reuse_yields_fresh_id() {
        let mut objects: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let mapper = SceneIdMapper::new("/root");
        let old = objects.insert(());
        let old_id = mapper.scene_id(old);
        objects.remove(old);
        let new = objects.insert(());
        assert_ne!(mapper.scene_id(new), old_id);
    }

    #[test]
    fn test_root_slash_is_trimmed() {
        let mapper = SceneIdMapper::new("/");
        let mut objects: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        let key = objects.insert(());
        assert!(mapper.scene_id(key).as_str().starts_with("/O_"));
    }
}
