//! # Hydra Bridge
//!
//! Incremental synchronization between a DCC host scene and a Hydra-style
//! retained render index.
//!
//! ## Features
//!
//! - **Scene Delegate**: diff engine applying dependency-graph change batches
//!   as minimal inserts, removals and dirty marks
//! - **Export Adapters**: mesh, light, material and camera exporters
//!   producing owned attribute snapshots
//! - **Render Index**: in-memory prim registry with dirty tracking and a
//!   parallel pull pass
//! - **Render Loop**: final and viewport strategies driving a pluggable
//!   executor
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hydra_bridge::prelude::*;
//! use std::sync::atomic::AtomicBool;
//!
//! struct Black;
//!
//! impl RenderExecutor for Black {
//!     fn execute(&mut self, _frame: &FrameContext<'_>, target: &mut RenderBuffer) -> Result<(), EngineError> {
//!         target.clear([0.0, 0.0, 0.0, 1.0]);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BridgeConfig::default();
//!     let mut scene = HostScene::new();
//!     scene.add_object(HostObject::mesh("Cube", HostMesh::cube(2.0)));
//!     let camera = scene.add_object(HostObject::camera("Camera", HostCamera::default()));
//!     scene.set_active_camera(camera);
//!
//!     let exporter = |name: &str| -> Result<std::path::PathBuf, MaterialExportError> {
//!         Ok(format!("/tmp/{name}.mtlx").into())
//!     };
//!     let mut engine = Engine::final_render(&config, Box::new(Black), Box::new(exporter))?;
//!     let updates = scene.take_updates();
//!     engine.sync(&scene, &updates);
//!     let result = engine.render(&scene, &AtomicBool::new(false))?;
//!     println!("{} samples", result.samples_completed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

// Core configuration
pub mod config;
pub mod core;

pub mod engine;
pub mod export;
pub mod foundation;
pub mod host;
pub mod scene;

pub use engine::{Engine, EngineError};

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        core::{BridgeConfig, Config, DelegateConfig, EngineConfig, RenderConfig},
        engine::{
            Engine, EngineError, FinalRender, FrameContext, RenderBuffer, RenderExecutor,
            RenderResult, RenderStrategy, ViewportRender,
        },
        export::{CameraParams, MaterialExportError, MaterialExporter},
        foundation::math::{Mat4, Transform, Vec2, Vec3},
        host::{
            DepsgraphUpdate, HostCamera, HostLight, HostMaterial, HostMesh, HostObject, HostScene,
            ViewportState,
        },
        scene::{
            tokens, DirtyBits, MemoryRenderIndex, PrimType, RenderIndex, SceneDelegate, SceneId,
            Value,
        },
    };
}
