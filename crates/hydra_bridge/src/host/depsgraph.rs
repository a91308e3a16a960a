//! Dependency-graph change notifications

use crate::foundation::collections::{MaterialKey, ObjectKey};

/// What an update refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateTarget {
    /// A scene object
    Object(ObjectKey),
    /// A material data-block
    Material(MaterialKey),
    /// The scene's collection hierarchy (objects added, removed, hidden)
    Collection,
    /// Any other data-block (world, scene settings, ...); ignored by the delegate
    Other,
}

/// One entry of a change batch.
///
/// The three flags are independent; the host may raise any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepsgraphUpdate {
    /// The changed entity
    pub target: UpdateTarget,
    /// Geometry or data-block contents changed
    pub geometry: bool,
    /// World transform changed
    pub transform: bool,
    /// Shading (material assignment or material contents) changed
    pub shading: bool,
}

impl DepsgraphUpdate {
    /// Update with no flags raised
    pub const fn new(target: UpdateTarget) -> Self {
        Self {
            target,
            geometry: false,
            transform: false,
            shading: false,
        }
    }

    /// Update for an object
    pub const fn object(key: ObjectKey) -> Self {
        Self::new(UpdateTarget::Object(key))
    }

    /// Update for a material
    pub const fn material(key: MaterialKey) -> Self {
        Self::new(UpdateTarget::Material(key))
    }

    /// Collection hierarchy update with both transform and geometry raised,
    /// which is how the host reports objects appearing or disappearing.
    pub const fn collection() -> Self {
        Self::new(UpdateTarget::Collection).with_geometry().with_transform()
    }

    /// Raise the geometry flag
    #[must_use]
    pub const fn with_geometry(mut self) -> Self {
        self.geometry = true;
        self
    }

    /// Raise the transform flag
    #[must_use]
    pub const fn with_transform(mut self) -> Self {
        self.transform = true;
        self
    }

    /// Raise the shading flag
    #[must_use]
    pub const fn with_shading(mut self) -> Self {
        self.shading = true;
        self
    }

    /// OR the flags of `other` into this update
    pub fn merge(&mut self, other: &Self) {
        self.geometry |= other.geometry;
        self.transform |= other.transform;
        self.shading |= other.shading;
    }

    /// Whether any flag is raised
    pub const fn is_tagged(&self) -> bool {
        self.geometry || self.transform || self.shading
    }
}
