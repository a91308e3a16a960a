//! Render index: the id-addressed prim registry the delegate feeds
//!
//! The delegate only talks to the [`RenderIndex`] trait. [`MemoryRenderIndex`]
//! is the in-process implementation: it records prims and their dirty bits,
//! and its [`sync_all`](MemoryRenderIndex::sync_all) pass pulls whatever the
//! dirty bits name from the delegate into a render-side cache.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use bitflags::bitflags;
use rayon::prelude::*;

use crate::foundation::math::{Bounds3, Mat4, Vec2, Vec3};

use super::{tokens, AttributeCache, MeshTopology, SceneDelegate, SceneId};

/// Prim category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimCategory {
    /// Renderable geometry
    Rprim,
    /// State prims: lights and materials
    Sprim,
}

/// Prim type inserted into the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType {
    /// Triangle mesh
    Mesh,
    /// Point or spot light
    SphereLight,
    /// Disk or ellipse area light
    DiskLight,
    /// Rectangular area light
    RectLight,
    /// Sun
    DistantLight,
    /// Material
    Material,
}

impl PrimType {
    /// Rprim or sprim
    pub const fn category(self) -> PrimCategory {
        match self {
            Self::Mesh => PrimCategory::Rprim,
            _ => PrimCategory::Sprim,
        }
    }

    /// Hydra type name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mesh => "mesh",
            Self::SphereLight => "sphereLight",
            Self::DiskLight => "diskLight",
            Self::RectLight => "rectLight",
            Self::DistantLight => "distantLight",
            Self::Material => "material",
        }
    }

    /// Whether this is one of the light types
    pub const fn is_light(self) -> bool {
        matches!(
            self,
            Self::SphereLight | Self::DiskLight | Self::RectLight | Self::DistantLight
        )
    }
}

bitflags! {
    /// What changed on a prim since it was last synced
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyBits: u32 {
        /// World transform
        const TRANSFORM = 1 << 0;
        /// Visibility
        const VISIBILITY = 1 << 1;
        /// Bounds
        const EXTENT = 1 << 2;
        /// Vertex positions
        const POINTS = 1 << 3;
        /// Normals
        const NORMALS = 1 << 4;
        /// Any other primvar
        const PRIMVAR = 1 << 5;
        /// Face counts and indices
        const TOPOLOGY = 1 << 6;
        /// Material binding
        const MATERIAL_ID = 1 << 7;
        /// Light parameters
        const PARAMS = 1 << 8;
        /// Material resource
        const RESOURCE = 1 << 9;
        /// Everything
        const ALL_DIRTY = Self::TRANSFORM.bits()
            | Self::VISIBILITY.bits()
            | Self::EXTENT.bits()
            | Self::POINTS.bits()
            | Self::NORMALS.bits()
            | Self::PRIMVAR.bits()
            | Self::TOPOLOGY.bits()
            | Self::MATERIAL_ID.bits()
            | Self::PARAMS.bits()
            | Self::RESOURCE.bits();
    }
}

/// Mutation surface of a render index
pub trait RenderIndex {
    /// Insert a geometry prim; new prims start fully dirty
    fn insert_rprim(&mut self, prim_type: PrimType, id: &SceneId);

    /// Insert a light or material prim; new prims start fully dirty
    fn insert_sprim(&mut self, prim_type: PrimType, id: &SceneId);

    /// Remove a geometry prim
    fn remove_rprim(&mut self, id: &SceneId);

    /// Remove a light or material prim
    fn remove_sprim(&mut self, prim_type: PrimType, id: &SceneId);

    /// OR `bits` into a geometry prim's dirty state
    fn mark_rprim_dirty(&mut self, id: &SceneId, bits: DirtyBits);

    /// OR `bits` into a state prim's dirty state
    fn mark_sprim_dirty(&mut self, id: &SceneId, bits: DirtyBits);
}

/// Light parameters pulled for every light sprim
const LIGHT_PARAMS: [&str; 12] = [
    tokens::INTENSITY,
    tokens::COLOR,
    tokens::EXPOSURE,
    tokens::NORMALIZE,
    tokens::RADIUS,
    tokens::WIDTH,
    tokens::HEIGHT,
    tokens::ANGLE,
    tokens::SHAPING_CONE_ANGLE,
    tokens::SHAPING_CONE_SOFTNESS,
    tokens::TREAT_AS_POINT,
    tokens::SHADOW_ENABLE,
];

/// Render-side copy of a mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncedMesh {
    /// Object-to-world matrix
    pub transform: Mat4,
    /// Visibility
    pub visible: bool,
    /// Object-space bounds
    pub extent: Bounds3,
    /// Vertex positions
    pub points: Vec<Vec3>,
    /// Face-varying normals
    pub normals: Option<Vec<Vec3>>,
    /// Face-varying texture coordinates
    pub uvs: Option<Vec<Vec2>>,
    /// Triangle topology
    pub topology: MeshTopology,
    /// Bound material
    pub material: Option<SceneId>,
}

/// Render-side copy of a light
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncedLight {
    /// Light-to-world matrix
    pub transform: Mat4,
    /// Parameters present on the light
    pub params: AttributeCache,
}

/// Render-side copy of a material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncedMaterial {
    /// Exported shading network, if export succeeded
    pub resource: Option<PathBuf>,
}

/// A prim as last pulled by [`MemoryRenderIndex::sync_all`]
#[derive(Debug, Clone, PartialEq)]
pub enum SyncedPrim {
    /// Mesh rprim
    Mesh(SyncedMesh),
    /// Light sprim
    Light(SyncedLight),
    /// Material sprim
    Material(SyncedMaterial),
}

impl SyncedPrim {
    /// Mesh payload
    pub const fn as_mesh(&self) -> Option<&SyncedMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Light payload
    pub const fn as_light(&self) -> Option<&SyncedLight> {
        match self {
            Self::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Material payload
    pub const fn as_material(&self) -> Option<&SyncedMaterial> {
        match self {
            Self::Material(material) => Some(material),
            _ => None,
        }
    }
}

/// Counters for one sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    /// Dirty prims visited
    pub prims: usize,
    /// Pull queries issued against the delegate
    pub pulls: usize,
    /// Worker threads used
    pub workers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PrimState {
    prim_type: PrimType,
    dirty: DirtyBits,
}

struct SyncJob {
    id: SceneId,
    prim_type: PrimType,
    dirty: DirtyBits,
    previous: Option<SyncedPrim>,
}

/// In-memory render index with dirty tracking
#[derive(Debug, Default)]
pub struct MemoryRenderIndex {
    rprims: BTreeMap<SceneId, PrimState>,
    sprims: BTreeMap<SceneId, PrimState>,
    synced: HashMap<SceneId, SyncedPrim>,
    mutations: usize,
}

impl MemoryRenderIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is registered in either category
    pub fn contains(&self, id: &SceneId) -> bool {
        self.rprims.contains_key(id) || self.sprims.contains_key(id)
    }

    /// Registered type of `id`
    pub fn prim_type(&self, id: &SceneId) -> Option<PrimType> {
        self.state(id).map(|state| state.prim_type)
    }

    /// Pending dirty bits of `id`; empty for unknown ids
    pub fn dirty_bits(&self, id: &SceneId) -> DirtyBits {
        self.state(id).map(|state| state.dirty).unwrap_or_default()
    }

    /// Number of registered rprims
    pub fn rprim_count(&self) -> usize {
        self.rprims.len()
    }

    /// Number of registered sprims
    pub fn sprim_count(&self) -> usize {
        self.sprims.len()
    }

    /// Total number of trait calls received so far
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Whether any prim has pending dirty bits
    pub fn has_dirty(&self) -> bool {
        self.rprims
            .values()
            .chain(self.sprims.values())
            .any(|state| !state.dirty.is_empty())
    }

    /// Forget all pending dirty bits without pulling
    pub fn clear_dirty(&mut self) {
        for state in self.rprims.values_mut().chain(self.sprims.values_mut()) {
            state.dirty = DirtyBits::empty();
        }
    }

    /// Render-side copy of `id` from the last sync
    pub fn synced(&self, id: &SceneId) -> Option<&SyncedPrim> {
        self.synced.get(id)
    }

    /// All synced prims
    pub fn synced_prims(&self) -> impl Iterator<Item = (&SceneId, &SyncedPrim)> {
        self.synced.iter()
    }

    /// Pull every dirty prim from `delegate` and clear its dirty bits.
    ///
    /// Pulls are spread over a pool of up to `workers` threads that is torn
    /// down before this returns, so the delegate is only borrowed shared for
    /// the duration of the call.
    pub fn sync_all(&mut self, delegate: &SceneDelegate, workers: usize) -> SyncStats {
        let Self {
            rprims,
            sprims,
            synced,
            ..
        } = self;
        synced.retain(|id, _| rprims.contains_key(id) || sprims.contains_key(id));

        let mut jobs: Vec<SyncJob> = Vec::new();
        for (id, state) in rprims.iter_mut().chain(sprims.iter_mut()) {
            if state.dirty.is_empty() {
                continue;
            }
            jobs.push(SyncJob {
                id: id.clone(),
                prim_type: state.prim_type,
                dirty: state.dirty,
                previous: synced.remove(id),
            });
            state.dirty = DirtyBits::empty();
        }

        if jobs.is_empty() {
            return SyncStats::default();
        }

        let prims = jobs.len();
        let mut workers = workers.clamp(1, prims);

        let results: Vec<(SceneId, SyncedPrim, usize)> = if workers == 1 {
            jobs.into_iter().map(|job| pull_prim(delegate, job)).collect()
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(|| {
                    jobs.into_par_iter()
                        .map(|job| pull_prim(delegate, job))
                        .collect()
                }),
                Err(err) => {
                    log::warn!("Could not start {} sync workers, pulling inline: {}", workers, err);
                    workers = 1;
                    jobs.into_iter().map(|job| pull_prim(delegate, job)).collect()
                }
            }
        };

        let mut stats = SyncStats {
            prims,
            pulls: 0,
            workers,
        };
        for (id, prim, pulls) in results {
            stats.pulls += pulls;
            self.synced.insert(id, prim);
        }

        log::debug!(
            "Synced {} prims with {} pulls on {} workers",
            stats.prims,
            stats.pulls,
            stats.workers
        );
        stats
    }

    fn state(&self, id: &SceneId) -> Option<&PrimState> {
        self.rprims.get(id).or_else(|| self.sprims.get(id))
    }

    fn insert(&mut self, prim_type: PrimType, id: &SceneId) {
        let state = PrimState {
            prim_type,
            dirty: DirtyBits::ALL_DIRTY,
        };
        let table = match prim_type.category() {
            PrimCategory::Rprim => &mut self.rprims,
            PrimCategory::Sprim => &mut self.sprims,
        };
        if table.insert(id.clone(), state).is_some() {
            log::warn!("Prim {} inserted twice; previous registration replaced", id);
        }
    }

    fn mark(table: &mut BTreeMap<SceneId, PrimState>, id: &SceneId, bits: DirtyBits) {
        match table.get_mut(id) {
            Some(state) => state.dirty |= bits,
            None => log::debug!("Dirty mark for unknown prim {} ignored", id),
        }
    }
}

impl RenderIndex for MemoryRenderIndex {
    fn insert_rprim(&mut self, prim_type: PrimType, id: &SceneId) {
        self.mutations += 1;
        self.insert(prim_type, id);
    }

    fn insert_sprim(&mut self, prim_type: PrimType, id: &SceneId) {
        self.mutations += 1;
        self.insert(prim_type, id);
    }

    fn remove_rprim(&mut self, id: &SceneId) {
        self.mutations += 1;
        self.rprims.remove(id);
        self.synced.remove(id);
    }

    fn remove_sprim(&mut self, prim_type: PrimType, id: &SceneId) {
        self.mutations += 1;
        match self.sprims.get(id) {
            Some(state) if state.prim_type == prim_type => {
                self.sprims.remove(id);
                self.synced.remove(id);
            }
            Some(state) => log::warn!(
                "Sprim {} is a {}, not a {}; not removed",
                id,
                state.prim_type.as_str(),
                prim_type.as_str()
            ),
            None => {}
        }
    }

    fn mark_rprim_dirty(&mut self, id: &SceneId, bits: DirtyBits) {
        self.mutations += 1;
        Self::mark(&mut self.rprims, id, bits);
    }

    fn mark_sprim_dirty(&mut self, id: &SceneId, bits: DirtyBits) {
        self.mutations += 1;
        Self::mark(&mut self.sprims, id, bits);
    }
}

/// Pull the parts of one prim its dirty bits name. Returns the updated
/// render-side copy and the number of queries issued.
fn pull_prim(delegate: &SceneDelegate, job: SyncJob) -> (SceneId, SyncedPrim, usize) {
    let SyncJob {
        id,
        prim_type,
        dirty,
        previous,
    } = job;
    let mut pulls = 0;

    let prim = match prim_type {
        PrimType::Mesh => {
            let mut mesh = match previous {
                Some(SyncedPrim::Mesh(mesh)) => mesh,
                _ => SyncedMesh::default(),
            };
            if dirty.contains(DirtyBits::TRANSFORM) {
                mesh.transform = delegate.get_transform(&id);
                pulls += 1;
            }
            if dirty.contains(DirtyBits::VISIBILITY) {
                mesh.visible = delegate.get_visible(&id);
                pulls += 1;
            }
            if dirty.contains(DirtyBits::EXTENT) {
                mesh.extent = delegate.get_extent(&id);
                pulls += 1;
            }
            if dirty.contains(DirtyBits::POINTS) {
                mesh.points = delegate
                    .get(&id, tokens::POINTS)
                    .and_then(|value| value.as_vec3_array().map(<[Vec3]>::to_vec))
                    .unwrap_or_default();
                pulls += 1;
            }
            if dirty.contains(DirtyBits::NORMALS) {
                mesh.normals = delegate
                    .get(&id, tokens::NORMALS)
                    .and_then(|value| value.as_vec3_array().map(<[Vec3]>::to_vec));
                pulls += 1;
            }
            if dirty.contains(DirtyBits::PRIMVAR) {
                mesh.uvs = delegate
                    .get(&id, tokens::ST)
                    .and_then(|value| value.as_vec2_array().map(<[Vec2]>::to_vec));
                pulls += 1;
            }
            if dirty.contains(DirtyBits::TOPOLOGY) {
                mesh.topology = delegate.get_mesh_topology(&id);
                pulls += 1;
            }
            if dirty.contains(DirtyBits::MATERIAL_ID) {
                mesh.material = delegate.get_material_id(&id);
                pulls += 1;
            }
            SyncedPrim::Mesh(mesh)
        }
        PrimType::Material => {
            let mut material = match previous {
                Some(SyncedPrim::Material(material)) => material,
                _ => SyncedMaterial::default(),
            };
            if dirty.intersects(DirtyBits::RESOURCE | DirtyBits::PARAMS) {
                material.resource = delegate.get_material_resource(&id);
                pulls += 1;
            }
            SyncedPrim::Material(material)
        }
        _ => {
            let mut light = match previous {
                Some(SyncedPrim::Light(light)) => light,
                _ => SyncedLight::default(),
            };
            if dirty.contains(DirtyBits::TRANSFORM) {
                light.transform = delegate.get_transform(&id);
                pulls += 1;
            }
            if dirty.contains(DirtyBits::PARAMS) {
                light.params = AttributeCache::new();
                for token in LIGHT_PARAMS {
                    if let Some(value) = delegate.get_light_param_value(&id, token) {
                        light.params.set(token, value);
                    }
                    pulls += 1;
                }
            }
            SyncedPrim::Light(light)
        }
    };

    log::trace!("Pulled {} ({:?}) with {} queries", id, dirty, pulls);
    (id, prim, pulls)
}
