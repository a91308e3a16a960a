//! Scene delegate and render index
//!
//! The delegate owns one entry per rendered object and per referenced
//! material, keyed by [`SceneId`]. It pushes inserts, removals and dirty
//! marks into a [`RenderIndex`] and serves the pull queries the render side
//! issues afterwards.

mod attributes;
mod delegate;
mod id;
mod material_data;
mod object_data;
mod render_index;
mod value;

#[cfg(test)]
mod tests;

pub use attributes::AttributeCache;
pub use delegate::{PopulateStats, SceneDelegate};
pub use id::{SceneEntity, SceneId, SceneIdMapper};
pub use material_data::MaterialData;
pub use object_data::{
    Interpolation, MeshTopology, ObjectData, ObjectKind, PrimvarDescriptor, PrimvarRole,
};
pub use render_index::{
    DirtyBits, MemoryRenderIndex, PrimCategory, PrimType, RenderIndex, SyncStats, SyncedLight,
    SyncedMaterial, SyncedMesh, SyncedPrim,
};
pub use value::{tokens, Value};
