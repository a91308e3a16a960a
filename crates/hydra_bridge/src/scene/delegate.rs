//! Scene delegate
//!
//! Keeps the object and material tables in step with the host scene and
//! answers the render side's pull queries. All mutation happens inside
//! [`SceneDelegate::populate`]; every query takes `&self` and never fails.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::core::DelegateConfig;
use crate::export::{active_material, MaterialExporter};
use crate::foundation::collections::{MaterialKey, ObjectKey};
use crate::foundation::math::{Bounds3, Mat4};
use crate::host::{DepsgraphUpdate, HostObject, HostScene, UpdateTarget};

use super::{
    DirtyBits, Interpolation, MaterialData, MeshTopology, ObjectData, ObjectKind, PrimCategory,
    PrimType, PrimvarDescriptor, RenderIndex, SceneId, SceneIdMapper, Value,
};

/// Counters for one populate pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulateStats {
    /// Objects inserted
    pub inserted: usize,
    /// Objects re-exported after a geometry update
    pub updated: usize,
    /// Objects patched in place (transform or material binding)
    pub patched: usize,
    /// Objects removed
    pub removed: usize,
    /// Objects skipped as unsupported or degenerate
    pub skipped: usize,
    /// Objects whose export failed
    pub failed: usize,
    /// Materials inserted
    pub materials_inserted: usize,
    /// Materials marked for re-export
    pub materials_updated: usize,
    /// Materials removed
    pub materials_removed: usize,
    /// Calls made to the material exporter
    pub materials_exported: usize,
}

impl PopulateStats {
    /// Whether the pass changed nothing
    pub const fn is_empty(&self) -> bool {
        self.inserted == 0
            && self.updated == 0
            && self.patched == 0
            && self.removed == 0
            && self.materials_inserted == 0
            && self.materials_updated == 0
            && self.materials_removed == 0
    }
}

/// Diff engine between a [`HostScene`] and a [`RenderIndex`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDelegate {
    ids: SceneIdMapper,
    export_materials: bool,
    objects: HashMap<SceneId, ObjectData>,
    materials: HashMap<SceneId, MaterialData>,
    populated: bool,
}

impl SceneDelegate {
    /// Create an unpopulated delegate
    pub fn new(config: &DelegateConfig) -> Self {
        Self {
            ids: SceneIdMapper::new(config.root_path.as_str()),
            export_materials: config.export_materials,
            objects: HashMap::new(),
            materials: HashMap::new(),
            populated: false,
        }
    }

    /// Whether the first full pass has run
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Id of a host object
    pub fn object_id(&self, key: ObjectKey) -> SceneId {
        self.ids.scene_id(key)
    }

    /// Id of a host material
    pub fn material_id(&self, key: MaterialKey) -> SceneId {
        self.ids.scene_id(key)
    }

    /// Object entry by id
    pub fn object(&self, id: &SceneId) -> Option<&ObjectData> {
        self.objects.get(id)
    }

    /// Material entry by id
    pub fn material(&self, id: &SceneId) -> Option<&MaterialData> {
        self.materials.get(id)
    }

    /// All object entries
    pub fn objects(&self) -> impl Iterator<Item = (&SceneId, &ObjectData)> {
        self.objects.iter()
    }

    /// All material entries
    pub fn materials(&self) -> impl Iterator<Item = (&SceneId, &MaterialData)> {
        self.materials.iter()
    }

    /// Number of object entries
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of material entries
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Apply one change batch.
    ///
    /// The first call inserts every visible mesh and light and ignores
    /// `updates`. Later calls apply `updates` in order, then run
    /// reconciliation if the batch carried a collection update with both
    /// geometry and transform raised. Pending material exports run last.
    pub fn populate(
        &mut self,
        scene: &HostScene,
        updates: &[DepsgraphUpdate],
        index: &mut dyn RenderIndex,
        exporter: &dyn MaterialExporter,
    ) -> PopulateStats {
        let mut stats = PopulateStats::default();

        if self.populated {
            let mut reconcile = false;
            for update in updates {
                match update.target {
                    UpdateTarget::Object(key) => {
                        self.apply_object_update(scene, key, update, index, &mut stats);
                    }
                    UpdateTarget::Material(key) => {
                        if update.shading {
                            self.apply_material_update(scene, key, index, &mut stats);
                        }
                    }
                    UpdateTarget::Collection => {
                        reconcile |= update.geometry && update.transform;
                    }
                    UpdateTarget::Other => log::trace!("Ignoring update for untracked data-block"),
                }
            }
            if reconcile {
                self.reconcile(scene, index, &mut stats);
            }
        } else {
            for (key, object) in scene.visible_objects() {
                self.insert_object(scene, key, object, index, &mut stats);
            }
            self.populated = true;
            log::info!(
                "Initial populate: {} objects, {} materials ({} skipped)",
                self.objects.len(),
                self.materials.len(),
                stats.skipped
            );
        }

        if self.export_materials {
            for material in self.materials.values_mut() {
                if material.resolve(exporter) {
                    stats.materials_exported += 1;
                }
            }
        }

        if !stats.is_empty() {
            log::debug!("Populate: {:?}", stats);
        }
        stats
    }

    fn apply_object_update(
        &mut self,
        scene: &HostScene,
        key: ObjectKey,
        update: &DepsgraphUpdate,
        index: &mut dyn RenderIndex,
        stats: &mut PopulateStats,
    ) {
        let id = self.ids.scene_id(key);
        let Some(object) = scene.object(key) else {
            log::debug!("Update for deleted object {}; left to reconciliation", id);
            return;
        };

        let Some(prim_type) = self.objects.get(&id).map(ObjectData::prim_type) else {
            if object.visible {
                self.insert_object(scene, key, object, index, stats);
            }
            return;
        };

        // A failed re-export keeps the old entry; the rest of the update still applies
        if update.geometry && self.reexport_object(scene, &id, object, index, stats) {
            return;
        }

        let mut bits = DirtyBits::empty();
        if update.transform {
            if let Some(data) = self.objects.get_mut(&id) {
                data.set_transform(object.matrix_world);
            }
            bits |= DirtyBits::TRANSFORM;
        }
        if update.shading && prim_type == PrimType::Mesh {
            let material = self.ensure_material(scene, object, index, stats);
            if let Some(data) = self.objects.get_mut(&id) {
                data.set_material(material);
            }
            bits |= DirtyBits::MATERIAL_ID;
        }

        if !bits.is_empty() {
            log::debug!("Object {:?} ({}) patched: {:?}", object.name, id, bits);
            mark_dirty(index, prim_type, &id, bits);
            stats.patched += 1;
        }
    }

    fn apply_material_update(
        &mut self,
        scene: &HostScene,
        key: MaterialKey,
        index: &mut dyn RenderIndex,
        stats: &mut PopulateStats,
    ) {
        let id = self.ids.scene_id(key);
        let Some(data) = self.materials.get_mut(&id) else {
            log::trace!("Shading update for unreferenced material {}", id);
            return;
        };
        let Some(material) = scene.material(key) else {
            log::debug!("Shading update for deleted material {}", id);
            return;
        };

        data.mark_updated(&material.name);
        index.mark_sprim_dirty(&id, DirtyBits::ALL_DIRTY);
        stats.materials_updated += 1;
        log::debug!("Material {:?} updated to version {}", material.name, data.version());
    }

    fn insert_object(
        &mut self,
        scene: &HostScene,
        key: ObjectKey,
        object: &HostObject,
        index: &mut dyn RenderIndex,
        stats: &mut PopulateStats,
    ) {
        let id = self.ids.scene_id(key);
        let mut data = match ObjectData::from_host(object) {
            Ok(data) => data,
            Err(err) if err.is_exclusion() => {
                log::debug!("Skipping {}: {}", id, err);
                stats.skipped += 1;
                return;
            }
            Err(err) => {
                log::warn!("Failed to export {}: {}", id, err);
                stats.failed += 1;
                return;
            }
        };

        if data.kind() == ObjectKind::Mesh {
            let material = self.ensure_material(scene, object, index, stats);
            data.set_material(material);
        }

        log::debug!(
            "Inserting {} {:?} as {}",
            data.prim_type().as_str(),
            object.name,
            id
        );
        insert_prim(index, data.prim_type(), &id);
        self.objects.insert(id, data);
        stats.inserted += 1;
    }

    /// Replace the entry for `id` with a fresh export. Returns `false` when the
    /// export failed and the previous entry was kept.
    fn reexport_object(
        &mut self,
        scene: &HostScene,
        id: &SceneId,
        object: &HostObject,
        index: &mut dyn RenderIndex,
        stats: &mut PopulateStats,
    ) -> bool {
        let Some(old_type) = self.objects.get(id).map(ObjectData::prim_type) else {
            return true;
        };

        let mut data = match ObjectData::from_host(object) {
            Ok(data) => data,
            Err(err) if err.is_exclusion() => {
                log::debug!("Removing {}: {}", id, err);
                self.objects.remove(id);
                remove_prim(index, old_type, id);
                stats.removed += 1;
                return true;
            }
            Err(err) => {
                log::warn!("Failed to re-export {}, keeping previous data: {}", id, err);
                stats.failed += 1;
                return false;
            }
        };

        if data.kind() == ObjectKind::Mesh {
            let material = self.ensure_material(scene, object, index, stats);
            data.set_material(material);
        }

        if data.prim_type() == old_type {
            mark_dirty(index, old_type, id, DirtyBits::ALL_DIRTY);
        } else {
            log::debug!(
                "{} changed type {} -> {}",
                id,
                old_type.as_str(),
                data.prim_type().as_str()
            );
            remove_prim(index, old_type, id);
            insert_prim(index, data.prim_type(), id);
        }
        self.objects.insert(id.clone(), data);
        stats.updated += 1;
        true
    }

    /// Resolve the material bound to `object`, inserting its entry on first use.
    fn ensure_material(
        &mut self,
        scene: &HostScene,
        object: &HostObject,
        index: &mut dyn RenderIndex,
        stats: &mut PopulateStats,
    ) -> Option<SceneId> {
        let key = active_material(object)?;
        let Some(material) = scene.material(key) else {
            log::warn!("Object {:?} references a deleted material", object.name);
            return None;
        };

        let id = self.ids.scene_id(key);
        if !self.materials.contains_key(&id) {
            log::debug!("Inserting material {:?} as {}", material.name, id);
            self.materials
                .insert(id.clone(), MaterialData::new(material.name.as_str()));
            index.insert_sprim(PrimType::Material, &id);
            stats.materials_inserted += 1;
        }
        Some(id)
    }

    /// Bring the object table in line with the visible set, then drop
    /// materials nothing references.
    fn reconcile(&mut self, scene: &HostScene, index: &mut dyn RenderIndex, stats: &mut PopulateStats) {
        let visible: HashSet<SceneId> = scene
            .visible_objects()
            .map(|(key, _)| self.ids.scene_id(key))
            .collect();

        let stale: Vec<SceneId> = self
            .objects
            .keys()
            .filter(|id| !visible.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(data) = self.objects.remove(&id) {
                log::debug!("Removing {} {:?}", id, data.name());
                remove_prim(index, data.prim_type(), &id);
                stats.removed += 1;
            }
        }

        for (key, object) in scene.visible_objects() {
            if !self.objects.contains_key(&self.ids.scene_id(key)) {
                self.insert_object(scene, key, object, index, stats);
            }
        }

        // Full rescan of references
        let orphaned: Vec<SceneId> = {
            let referenced: HashSet<&SceneId> =
                self.objects.values().filter_map(ObjectData::material).collect();
            self.materials
                .keys()
                .filter(|id| !referenced.contains(id))
                .cloned()
                .collect()
        };
        for id in orphaned {
            if let Some(material) = self.materials.remove(&id) {
                log::debug!("Removing unreferenced material {:?}", material.name());
                index.remove_sprim(PrimType::Material, &id);
                stats.materials_removed += 1;
            }
        }

        log::info!(
            "Reconciled: {} objects, {} materials",
            self.objects.len(),
            self.materials.len()
        );
    }

    /// World matrix of `id`; identity when unknown
    pub fn get_transform(&self, id: &SceneId) -> Mat4 {
        self.objects
            .get(id)
            .map_or_else(Mat4::identity, ObjectData::transform)
    }

    /// Triangle topology of `id`; empty when unknown or not a mesh
    pub fn get_mesh_topology(&self, id: &SceneId) -> MeshTopology {
        self.objects
            .get(id)
            .map(ObjectData::topology)
            .unwrap_or_default()
    }

    /// Attribute `token` of an object or material
    pub fn get(&self, id: &SceneId, token: &str) -> Option<Value> {
        let attributes = match self.objects.get(id) {
            Some(object) => object.attributes(),
            None => self.materials.get(id)?.attributes(),
        };
        let value = attributes.get(token).cloned();
        if value.is_none() {
            log::trace!("No {:?} on {}", token, id);
        }
        value
    }

    /// Material bound to the mesh `id`
    pub fn get_material_id(&self, id: &SceneId) -> Option<SceneId> {
        self.objects.get(id)?.material().cloned()
    }

    /// Light parameter `token` of the light `id`
    pub fn get_light_param_value(&self, id: &SceneId, token: &str) -> Option<Value> {
        let object = self.objects.get(id)?;
        if !object.prim_type().is_light() {
            return None;
        }
        object.attributes().get(token).cloned()
    }

    /// Primvars of `id` with the given interpolation
    pub fn get_primvar_descriptors(&self, id: &SceneId, interpolation: Interpolation) -> Vec<PrimvarDescriptor> {
        self.objects
            .get(id)
            .map(|object| object.primvar_descriptors(interpolation))
            .unwrap_or_default()
    }

    /// Whether `id` is rendered
    pub fn get_visible(&self, id: &SceneId) -> bool {
        self.objects.contains_key(id)
    }

    /// Object-space bounds of `id`; empty when unknown
    pub fn get_extent(&self, id: &SceneId) -> Bounds3 {
        self.objects
            .get(id)
            .map_or_else(Bounds3::empty, ObjectData::extent)
    }

    /// Exported shading network of the material `id`
    pub fn get_material_resource(&self, id: &SceneId) -> Option<PathBuf> {
        self.materials.get(id)?.asset_path_buf()
    }
}

fn insert_prim(index: &mut dyn RenderIndex, prim_type: PrimType, id: &SceneId) {
    match prim_type.category() {
        PrimCategory::Rprim => index.insert_rprim(prim_type, id),
        PrimCategory::Sprim => index.insert_sprim(prim_type, id),
    }
}

fn remove_prim(index: &mut dyn RenderIndex, prim_type: PrimType, id: &SceneId) {
    match prim_type.category() {
        PrimCategory::Rprim => index.remove_rprim(id),
        PrimCategory::Sprim => index.remove_sprim(prim_type, id),
    }
}

fn mark_dirty(index: &mut dyn RenderIndex, prim_type: PrimType, id: &SceneId, bits: DirtyBits) {
    match prim_type.category() {
        PrimCategory::Rprim => index.mark_rprim_dirty(id, bits),
        PrimCategory::Sprim => index.mark_sprim_dirty(id, bits),
    }
}
