//! Render executor seam
//!
//! The executor stands in for the render delegate plugin: it reads the
//! synced index and the delegate and writes pixels. It runs strictly after
//! `populate` and the sync pass have returned.

use crate::export::CameraParams;
use crate::scene::{MemoryRenderIndex, SceneDelegate};

use super::{EngineError, RenderBuffer};

/// Everything one execution can read
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Pull surface
    pub delegate: &'a SceneDelegate,
    /// Synced render index
    pub index: &'a MemoryRenderIndex,
    /// Camera for this frame
    pub camera: &'a CameraParams,
    /// Zero-based sample number
    pub sample: u32,
}

/// Produces pixels from a synced scene
pub trait RenderExecutor {
    /// Render one sample of `frame` into `target`
    fn execute(&mut self, frame: &FrameContext<'_>, target: &mut RenderBuffer) -> Result<(), EngineError>;
}
