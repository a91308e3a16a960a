//! Mesh export
//!
//! Polygons are fan-triangulated. Positions stay per-vertex; normals and
//! UVs become face-varying, one value per triangle corner, read from the
//! loop each corner came from.

use crate::foundation::math::{Vec2, Vec3};
use crate::host::HostMesh;
use crate::scene::{tokens, AttributeCache};

use super::ExportError;

/// Triangulated copy of a host mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TriangulatedMesh {
    /// Vertex positions
    pub points: Vec<Vec3>,
    /// Always 3 per triangle
    pub face_vertex_counts: Vec<i32>,
    /// Three vertex indices per triangle
    pub face_vertex_indices: Vec<i32>,
    /// Face-varying normals, when the host mesh has split normals
    pub normals: Option<Vec<Vec3>>,
    /// Face-varying UVs from the active UV layer
    pub uvs: Option<Vec<Vec2>>,
}

impl TriangulatedMesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    /// Move the data into an attribute cache. Missing layers stay absent.
    pub fn into_attributes(self) -> AttributeCache {
        let mut attributes = AttributeCache::new()
            .with(tokens::POINTS, self.points)
            .with(tokens::FACE_VERTEX_COUNTS, self.face_vertex_counts)
            .with(tokens::FACE_VERTEX_INDICES, self.face_vertex_indices);
        if let Some(normals) = self.normals {
            attributes.set(tokens::NORMALS, normals);
        }
        if let Some(uvs) = self.uvs {
            attributes.set(tokens::ST, uvs);
        }
        attributes
    }
}

/// Triangulate `mesh`, validating its indices.
pub fn triangulate(name: &str, mesh: &HostMesh) -> Result<TriangulatedMesh, ExportError> {
    if mesh.vertices.is_empty() {
        return Err(ExportError::DegenerateMesh {
            name: name.to_string(),
        });
    }

    let loop_count = mesh.loops.len();
    let normals_layer = mesh
        .loop_normals
        .as_deref()
        .filter(|normals| layer_matches(name, "normals", normals.len(), loop_count));
    let uv_layer = mesh
        .active_uv()
        .map(|layer| layer.uvs.as_slice())
        .filter(|uvs| layer_matches(name, "uv", uvs.len(), loop_count));

    let triangle_estimate: usize = mesh
        .polygons
        .iter()
        .map(|polygon| polygon.loop_total.saturating_sub(2))
        .sum();

    let mut face_vertex_indices = Vec::with_capacity(triangle_estimate * 3);
    let mut normals = normals_layer.map(|_| Vec::with_capacity(triangle_estimate * 3));
    let mut uvs = uv_layer.map(|_| Vec::with_capacity(triangle_estimate * 3));

    for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
        if polygon.loop_total < 3 {
            return Err(ExportError::InvalidPolygon {
                name: name.to_string(),
                polygon: polygon_index,
                corners: polygon.loop_total,
            });
        }
        if polygon.loop_start + polygon.loop_total > loop_count {
            return Err(ExportError::LoopOutOfRange {
                name: name.to_string(),
                polygon: polygon_index,
                loop_count,
            });
        }

        let first = polygon.loop_start;
        for offset in 1..polygon.loop_total - 1 {
            for loop_index in [first, first + offset, first + offset + 1] {
                let vertex = mesh.loops[loop_index];
                if vertex as usize >= mesh.vertices.len() {
                    return Err(ExportError::VertexOutOfRange {
                        name: name.to_string(),
                        loop_index,
                        vertex,
                        vertex_count: mesh.vertices.len(),
                    });
                }
                face_vertex_indices.push(vertex as i32);

                if let (Some(out), Some(layer)) = (normals.as_mut(), normals_layer) {
                    out.push(layer[loop_index]);
                }
                if let (Some(out), Some(layer)) = (uvs.as_mut(), uv_layer) {
                    out.push(layer[loop_index]);
                }
            }
        }
    }

    let triangle_count = face_vertex_indices.len() / 3;
    Ok(TriangulatedMesh {
        points: mesh.vertices.clone(),
        face_vertex_counts: vec![3; triangle_count],
        face_vertex_indices,
        normals,
        uvs,
    })
}

/// Export `mesh` into an attribute snapshot.
pub fn export_mesh(name: &str, mesh: &HostMesh) -> Result<AttributeCache, ExportError> {
    let triangulated = triangulate(name, mesh)?;
    log::trace!(
        "Exported mesh {:?}: {} points, {} triangles",
        name,
        triangulated.points.len(),
        triangulated.triangle_count()
    );
    Ok(triangulated.into_attributes())
}

fn layer_matches(name: &str, layer: &str, found: usize, expected: usize) -> bool {
    if found == expected {
        true
    } else {
        log::warn!(
            "Mesh {:?}: {} layer has {} entries, expected {}; layer skipped",
            name,
            layer,
            found,
            expected
        );
        false
    }
}
