//! Host scene container

use crate::foundation::collections::{MaterialKey, ObjectKey, SlotMap};
use crate::foundation::math::Mat4;

use super::{DepsgraphUpdate, HostCamera, HostLight, HostMaterial, HostMesh, UpdateTarget};

/// The data-block an object instantiates
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPayload {
    /// Polygon mesh
    Mesh(HostMesh),
    /// Light
    Light(HostLight),
    /// Camera
    Camera(HostCamera),
    /// Empty (transform-only) object
    Empty,
}

/// A scene object
#[derive(Debug, Clone, PartialEq)]
pub struct HostObject {
    /// Object name
    pub name: String,
    /// Instantiated data
    pub data: ObjectPayload,
    /// Object-to-world matrix
    pub matrix_world: Mat4,
    /// Whether the object is visible for rendering
    pub visible: bool,
    /// Material slots; empty slots are allowed
    pub material_slots: Vec<Option<MaterialKey>>,
}

impl HostObject {
    fn with_payload(name: impl Into<String>, data: ObjectPayload) -> Self {
        Self {
            name: name.into(),
            data,
            matrix_world: Mat4::identity(),
            visible: true,
            material_slots: Vec::new(),
        }
    }

    /// Mesh object
    pub fn mesh(name: impl Into<String>, mesh: HostMesh) -> Self {
        Self::with_payload(name, ObjectPayload::Mesh(mesh))
    }

    /// Light object
    pub fn light(name: impl Into<String>, light: HostLight) -> Self {
        Self::with_payload(name, ObjectPayload::Light(light))
    }

    /// Camera object
    pub fn camera(name: impl Into<String>, camera: HostCamera) -> Self {
        Self::with_payload(name, ObjectPayload::Camera(camera))
    }

    /// Empty object
    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_payload(name, ObjectPayload::Empty)
    }

    /// Set the object-to-world matrix
    #[must_use]
    pub fn with_transform(mut self, matrix_world: Mat4) -> Self {
        self.matrix_world = matrix_world;
        self
    }

    /// Append a material slot
    #[must_use]
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.material_slots.push(Some(material));
        self
    }

    /// Hide the object from rendering
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// All host data-blocks for one scene plus the pending change batch.
///
/// Mutations through the `add_*`/`remove_*`/`tag_*` methods record
/// dependency-graph updates the same way the host would report them. Direct
/// edits through `object_mut` must be followed by a matching `tag_object`.
#[derive(Debug, Default)]
pub struct HostScene {
    objects: SlotMap<ObjectKey, HostObject>,
    materials: SlotMap<MaterialKey, HostMaterial>,
    active_camera: Option<ObjectKey>,
    pending: Vec<DepsgraphUpdate>,
}

impl HostScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object; records an object update and a collection update
    pub fn add_object(&mut self, object: HostObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.record(
            DepsgraphUpdate::object(key)
                .with_geometry()
                .with_transform()
                .with_shading(),
        );
        self.record(DepsgraphUpdate::collection());
        key
    }

    /// Remove an object; records a collection update
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<HostObject> {
        let removed = self.objects.remove(key)?;
        if self.active_camera == Some(key) {
            self.active_camera = None;
        }
        self.record(DepsgraphUpdate::collection());
        Some(removed)
    }

    /// Add a material
    pub fn add_material(&mut self, material: HostMaterial) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Remove a material and clear every slot that pointed at it
    pub fn remove_material(&mut self, key: MaterialKey) -> Option<HostMaterial> {
        let removed = self.materials.remove(key)?;
        let mut touched = Vec::new();
        for (object_key, object) in &mut self.objects {
            let mut changed = false;
            for slot in &mut object.material_slots {
                if *slot == Some(key) {
                    *slot = None;
                    changed = true;
                }
            }
            if changed {
                touched.push(object_key);
            }
        }
        for object_key in touched {
            self.record(DepsgraphUpdate::object(object_key).with_shading());
        }
        Some(removed)
    }

    /// Object by handle
    pub fn object(&self, key: ObjectKey) -> Option<&HostObject> {
        self.objects.get(key)
    }

    /// Mutable object by handle
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut HostObject> {
        self.objects.get_mut(key)
    }

    /// Material by handle
    pub fn material(&self, key: MaterialKey) -> Option<&HostMaterial> {
        self.materials.get(key)
    }

    /// Mutable material by handle
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut HostMaterial> {
        self.materials.get_mut(key)
    }

    /// All objects
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &HostObject)> {
        self.objects.iter()
    }

    /// Objects currently visible for rendering
    pub fn visible_objects(&self) -> impl Iterator<Item = (ObjectKey, &HostObject)> {
        self.objects.iter().filter(|(_, object)| object.visible)
    }

    /// Number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Make `key` the scene camera
    pub fn set_active_camera(&mut self, key: ObjectKey) {
        self.active_camera = Some(key);
    }

    /// The scene camera object and its camera data
    pub fn active_camera(&self) -> Option<(&HostObject, &HostCamera)> {
        let object = self.objects.get(self.active_camera?)?;
        match &object.data {
            ObjectPayload::Camera(camera) => Some((object, camera)),
            _ => None,
        }
    }

    /// Report that an object changed
    pub fn tag_object(&mut self, key: ObjectKey, geometry: bool, transform: bool, shading: bool) {
        self.record(DepsgraphUpdate {
            target: UpdateTarget::Object(key),
            geometry,
            transform,
            shading,
        });
    }

    /// Report that a material changed
    pub fn tag_material(&mut self, key: MaterialKey) {
        self.record(DepsgraphUpdate::material(key).with_shading());
    }

    /// Report a collection hierarchy change (visibility toggles, re-parenting)
    pub fn tag_collection(&mut self) {
        self.record(DepsgraphUpdate::collection());
    }

    /// Drain the pending change batch.
    ///
    /// Updates for the same target are merged into one entry at the
    /// position of the first occurrence.
    pub fn take_updates(&mut self) -> Vec<DepsgraphUpdate> {
        std::mem::take(&mut self.pending)
    }

    fn record(&mut self, update: DepsgraphUpdate) {
        if let Some(existing) = self
            .pending
            .iter_mut()
            .find(|pending| pending.target == update.target)
        {
            existing.merge(&update);
        } else {
            self.pending.push(update);
        }
    }
}
