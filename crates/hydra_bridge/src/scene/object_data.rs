//! Per-object table entry

use crate::export::{export_light, export_mesh, ExportError};
use crate::foundation::math::{Bounds3, Mat4, Vec3};
use crate::host::{HostObject, ObjectPayload};

use super::{tokens, AttributeCache, PrimType, SceneId, Value};

/// Object kind, decided once when the entry is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Polygon mesh, exported as a mesh rprim
    Mesh,
    /// Light, exported as a light sprim
    Light,
    /// Camera; handled by the camera path, never by the delegate
    Camera,
    /// Anything else
    Unsupported,
}

impl ObjectKind {
    /// Kind of the data an object instantiates
    pub const fn of(payload: &ObjectPayload) -> Self {
        match payload {
            ObjectPayload::Mesh(_) => Self::Mesh,
            ObjectPayload::Light(_) => Self::Light,
            ObjectPayload::Camera(_) => Self::Camera,
            ObjectPayload::Empty => Self::Unsupported,
        }
    }

    /// Whether the delegate renders this kind
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Mesh | Self::Light)
    }
}

/// Triangle topology of a mesh entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshTopology {
    /// Vertices per face; always 3
    pub face_vertex_counts: Vec<i32>,
    /// Flat vertex index buffer
    pub face_vertex_indices: Vec<i32>,
}

impl MeshTopology {
    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    /// Whether the topology has no faces
    pub fn is_empty(&self) -> bool {
        self.face_vertex_counts.is_empty()
    }
}

/// Primvar interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// One value for the whole prim
    Constant,
    /// One value per face
    Uniform,
    /// One value per vertex
    Vertex,
    /// One value per face corner
    FaceVarying,
}

/// Semantic role of a primvar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimvarRole {
    /// Positions
    Point,
    /// Normals
    Normal,
    /// Texture coordinates
    TextureCoordinate,
}

/// Describes one primvar a mesh carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimvarDescriptor {
    /// Attribute token
    pub name: &'static str,
    /// Interpolation
    pub interpolation: Interpolation,
    /// Role
    pub role: PrimvarRole,
}

const PRIMVARS: [PrimvarDescriptor; 3] = [
    PrimvarDescriptor {
        name: tokens::POINTS,
        interpolation: Interpolation::Vertex,
        role: PrimvarRole::Point,
    },
    PrimvarDescriptor {
        name: tokens::NORMALS,
        interpolation: Interpolation::FaceVarying,
        role: PrimvarRole::Normal,
    },
    PrimvarDescriptor {
        name: tokens::ST,
        interpolation: Interpolation::FaceVarying,
        role: PrimvarRole::TextureCoordinate,
    },
];

/// Exported snapshot of one rendered object.
///
/// Built fresh on insert and on every geometry update. Transform and
/// material binding can be patched in place; attributes never are.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    kind: ObjectKind,
    prim_type: PrimType,
    name: String,
    transform: Mat4,
    attributes: AttributeCache,
    material: Option<SceneId>,
}

impl ObjectData {
    /// Export `object`.
    ///
    /// Cameras and empties fail with [`ExportError::Unsupported`]; meshes
    /// without vertices fail with [`ExportError::DegenerateMesh`].
    pub fn from_host(object: &HostObject) -> Result<Self, ExportError> {
        let kind = ObjectKind::of(&object.data);
        let (prim_type, attributes) = match &object.data {
            ObjectPayload::Mesh(mesh) => (PrimType::Mesh, export_mesh(&object.name, mesh)?),
            ObjectPayload::Light(light) => {
                let export = export_light(light);
                (export.prim_type, export.attributes)
            }
            ObjectPayload::Camera(_) | ObjectPayload::Empty => {
                return Err(ExportError::Unsupported {
                    name: object.name.clone(),
                })
            }
        };

        Ok(Self {
            kind,
            prim_type,
            name: object.name.clone(),
            transform: object.matrix_world,
            attributes,
            material: None,
        })
    }

    /// Object kind
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Prim type registered in the render index
    pub const fn prim_type(&self) -> PrimType {
        self.prim_type
    }

    /// Host object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object-to-world matrix
    pub const fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Exported attributes
    pub const fn attributes(&self) -> &AttributeCache {
        &self.attributes
    }

    /// Bound material, meshes only
    pub const fn material(&self) -> Option<&SceneId> {
        self.material.as_ref()
    }

    /// Replace the world matrix
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Replace the material binding; returns whether it changed
    pub fn set_material(&mut self, material: Option<SceneId>) -> bool {
        if self.material == material {
            false
        } else {
            self.material = material;
            true
        }
    }

    /// Triangle topology; empty for lights
    pub fn topology(&self) -> MeshTopology {
        let array = |token| {
            self.attributes
                .get(token)
                .and_then(Value::as_int_array)
                .map(<[i32]>::to_vec)
                .unwrap_or_default()
        };
        MeshTopology {
            face_vertex_counts: array(tokens::FACE_VERTEX_COUNTS),
            face_vertex_indices: array(tokens::FACE_VERTEX_INDICES),
        }
    }

    /// Object-space bounds of the points; empty for lights
    pub fn extent(&self) -> Bounds3 {
        self.attributes
            .get(tokens::POINTS)
            .and_then(Value::as_vec3_array)
            .map_or_else(Bounds3::empty, |points: &[Vec3]| Bounds3::from_points(points))
    }

    /// Primvars present on this entry with the given interpolation
    pub fn primvar_descriptors(&self, interpolation: Interpolation) -> Vec<PrimvarDescriptor> {
        if self.kind != ObjectKind::Mesh {
            return Vec::new();
        }
        PRIMVARS
            .iter()
            .filter(|descriptor| {
                descriptor.interpolation == interpolation && self.attributes.contains(descriptor.name)
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::host::{HostCamera, HostLight, HostMesh};

    #[test]
    fn test_kind_is_decided_by_payload() {
        let cube = HostObject::mesh("Cube", HostMesh::cube(1.0));
        let camera = HostObject::camera("Camera", HostCamera::default());
        assert_eq!(ObjectKind::of(&cube.data), ObjectKind::Mesh);
        assert_eq!(ObjectKind::of(&camera.data), ObjectKind::Camera);
        assert!(!ObjectKind::Camera.is_supported());
        assert!(!ObjectKind::Unsupported.is_supported());
    }

    #[test]
    fn test_unsupported_objects_are_rejected() {
        let result = ObjectData::from_host(&HostObject::empty("Empty"));
        assert!(matches!(result, Err(ExportError::Unsupported { .. })));
        assert!(result.unwrap_err().is_exclusion());
    }

    #[test]
    fn test_mesh_entry_has_topology_and_extent() {
        let data = ObjectData::from_host(&HostObject::mesh("Cube", HostMesh::cube(2.0))).unwrap();
        assert_eq!(data.prim_type(), PrimType::Mesh);
        assert_eq!(data.topology().face_count(), 12);

        let extent = data.extent();
        assert_eq!(extent.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(extent.max, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_light_entry_has_no_topology() {
        let data = ObjectData::from_host(&HostObject::light("Lamp", HostLight::point(10.0, 0.1))).unwrap();
        assert_eq!(data.kind(), ObjectKind::Light);
        assert!(data.topology().is_empty());
        assert!(data.extent().is_empty());
        assert!(data.primvar_descriptors(Interpolation::Vertex).is_empty());
    }

    #[test]
    fn test_primvar_descriptors_follow_present_layers() {
        let plane = HostMesh::plane(1.0).with_uv_layer("UVMap", vec![Vec2::zeros(); 4]);
        let data = ObjectData::from_host(&HostObject::mesh("Plane", plane)).unwrap();

        let vertex = data.primvar_descriptors(Interpolation::Vertex);
        assert_eq!(vertex.len(), 1);
        assert_eq!(vertex[0].name, tokens::POINTS);

        let face_varying = data.primvar_descriptors(Interpolation::FaceVarying);
        assert_eq!(face_varying.len(), 1);
        assert_eq!(face_varying[0].role, PrimvarRole::TextureCoordinate);
        assert!(data.primvar_descriptors(Interpolation::Constant).is_empty());
    }

    #[test]
    fn test_set_material_reports_change() {
        let mut data = ObjectData::from_host(&HostObject::mesh("Cube", HostMesh::cube(1.0))).unwrap();
        let id = SceneId::new("/root/M_0000000000000001");
        assert!(data.set_material(Some(id.clone())));
        assert!(!data.set_material(Some(id)));
        assert!(data.set_material(None));
    }
}
