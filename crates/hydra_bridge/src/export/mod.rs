//! Export adapters
//!
//! Stateless reads from host data-blocks into owned attribute snapshots.
//! Nothing returned from here borrows host memory; the host is free to
//! mutate or free its data right after an export call returns.

mod camera;
mod light;
mod material;
mod mesh;

pub use camera::{
    export_scene_camera, export_viewport_camera, CameraParams, ProjectionMode, MAX_ORTHO_DEPTH,
    VIEWPORT_SENSOR_SIZE,
};
pub use light::{export_light, LightExport};
pub use material::{active_material, MaterialExportError, MaterialExporter};
pub use mesh::{export_mesh, triangulate, TriangulatedMesh};

use thiserror::Error;

/// Errors raised while exporting a single object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The mesh has no vertices and is excluded from rendering
    #[error("mesh {name:?} has no vertices")]
    DegenerateMesh {
        /// Object name
        name: String,
    },

    /// A polygon has fewer than three corners
    #[error("polygon {polygon} of {name:?} has {corners} corners")]
    InvalidPolygon {
        /// Object name
        name: String,
        /// Polygon index
        polygon: usize,
        /// Corner count
        corners: usize,
    },

    /// A polygon's loops run past the loop array
    #[error("polygon {polygon} of {name:?} references loops beyond {loop_count}")]
    LoopOutOfRange {
        /// Object name
        name: String,
        /// Polygon index
        polygon: usize,
        /// Number of loops in the mesh
        loop_count: usize,
    },

    /// A loop references a vertex that does not exist
    #[error("loop {loop_index} of {name:?} references vertex {vertex} of {vertex_count}")]
    VertexOutOfRange {
        /// Object name
        name: String,
        /// Loop index
        loop_index: usize,
        /// Referenced vertex
        vertex: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// The object type is not rendered by the delegate
    #[error("object {name:?} is not a mesh or light")]
    Unsupported {
        /// Object name
        name: String,
    },
}

impl ExportError {
    /// Whether the error just means "nothing to render" rather than bad data
    pub const fn is_exclusion(&self) -> bool {
        matches!(self, Self::DegenerateMesh { .. } | Self::Unsupported { .. })
    }
}
