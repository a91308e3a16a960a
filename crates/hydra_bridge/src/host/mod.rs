//! Host scene model
//!
//! A plain-data mirror of the host application's scene: objects with their
//! data-blocks, materials, the active camera and the dependency graph's
//! pending change batch. Everything the delegate reads comes from here; the
//! delegate never keeps references into it between syncs.
//!
//! ```text
//! HostScene (mutable, host-owned)
//!      ↓  take_updates()
//! SceneDelegate::populate
//!      ↓
//! RenderIndex
//! ```

mod camera;
mod depsgraph;
mod light;
mod material;
mod mesh;
mod scene;

pub use camera::{CameraProjection, HostCamera, SensorFit, ViewPerspective, ViewportState};
pub use depsgraph::{DepsgraphUpdate, UpdateTarget};
pub use light::{AreaShape, HostLight, LightType};
pub use material::HostMaterial;
pub use mesh::{HostMesh, HostPolygon, UvLayer};
pub use scene::{HostObject, HostScene, ObjectPayload};
