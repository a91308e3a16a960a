//! Host mesh data-block
//!
//! Meshes are stored the way DCC tools keep them: a vertex array, n-gon
//! polygons that index into a loop (corner) array, and optional per-loop
//! layers for split normals and UV coordinates.

use crate::foundation::math::{Vec2, Vec3};

/// One polygon: a contiguous run of loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPolygon {
    /// Index of the first loop of this polygon
    pub loop_start: usize,
    /// Number of loops (corners)
    pub loop_total: usize,
}

/// Per-loop UV coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayer {
    /// Layer name
    pub name: String,
    /// One UV per loop
    pub uvs: Vec<Vec2>,
}

/// Polygon mesh as stored by the host
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostMesh {
    /// Vertex positions in object space
    pub vertices: Vec<Vec3>,
    /// Polygons
    pub polygons: Vec<HostPolygon>,
    /// Vertex index of every loop
    pub loops: Vec<u32>,
    /// Split normals, one per loop, when the host has computed them
    pub loop_normals: Option<Vec<Vec3>>,
    /// UV layers
    pub uv_layers: Vec<UvLayer>,
    /// Index into `uv_layers` of the layer used for rendering
    pub active_uv_layer: Option<usize>,
}

impl HostMesh {
    /// Build a mesh from vertices and polygons given as vertex index lists.
    pub fn from_polygons(vertices: Vec<Vec3>, faces: &[&[u32]]) -> Self {
        let mut polygons = Vec::with_capacity(faces.len());
        let mut loops = Vec::new();
        for face in faces {
            polygons.push(HostPolygon {
                loop_start: loops.len(),
                loop_total: face.len(),
            });
            loops.extend_from_slice(face);
        }

        Self {
            vertices,
            polygons,
            loops,
            ..Default::default()
        }
    }

    /// Axis-aligned cube centred on the origin: 8 vertices, 6 quads.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let faces: [&[u32]; 6] = [
            &[0, 3, 2, 1],
            &[4, 5, 6, 7],
            &[0, 1, 5, 4],
            &[1, 2, 6, 5],
            &[2, 3, 7, 6],
            &[3, 0, 4, 7],
        ];
        Self::from_polygons(vertices, &faces)
    }

    /// Single quad in the XY plane
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ];
        Self::from_polygons(vertices, &[&[0, 1, 2, 3]])
    }

    /// Attach a UV layer and make it active
    #[must_use]
    pub fn with_uv_layer(mut self, name: impl Into<String>, uvs: Vec<Vec2>) -> Self {
        self.uv_layers.push(UvLayer {
            name: name.into(),
            uvs,
        });
        self.active_uv_layer = Some(self.uv_layers.len() - 1);
        self
    }

    /// Attach split normals
    #[must_use]
    pub fn with_loop_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.loop_normals = Some(normals);
        self
    }

    /// Flat per-loop normals computed from polygon winding.
    pub fn flat_loop_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::z(); self.loops.len()];
        for polygon in &self.polygons {
            let corners = &self.loops[polygon.loop_start..polygon.loop_start + polygon.loop_total];
            let mut normal = Vec3::zeros();
            // Newell's method, robust for non-planar n-gons
            for (i, &current) in corners.iter().enumerate() {
                let next = corners[(i + 1) % corners.len()];
                let a = self.vertices[current as usize];
                let b = self.vertices[next as usize];
                normal.x += (a.y - b.y) * (a.z + b.z);
                normal.y += (a.z - b.z) * (a.x + b.x);
                normal.z += (a.x - b.x) * (a.y + b.y);
            }
            let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::z);
            for slot in &mut normals[polygon.loop_start..polygon.loop_start + polygon.loop_total] {
                *slot = normal;
            }
        }
        normals
    }

    /// Number of loops
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// The active UV layer, if any
    pub fn active_uv(&self) -> Option<&UvLayer> {
        self.active_uv_layer.and_then(|index| self.uv_layers.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_structure() {
        let cube = HostMesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.polygons.len(), 6);
        assert_eq!(cube.loop_count(), 24);
    }

    #[test]
    fn test_flat_normals_point_outward() {
        let cube = HostMesh::cube(2.0);
        let normals = cube.flat_loop_normals();
        // Second face is the +Z quad
        let top = &cube.polygons[1];
        for normal in &normals[top.loop_start..top.loop_start + top.loop_total] {
            assert_eq!(*normal, Vec3::z());
        }
    }
}
