//! Final and viewport render strategies

use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::RenderConfig;
use crate::export::{export_scene_camera, export_viewport_camera, CameraParams};
use crate::host::{HostScene, ViewportState};
use crate::scene::{MemoryRenderIndex, SceneDelegate};

use super::{EngineError, FrameContext, RenderBuffer, RenderExecutor, RenderPass, RenderResult};

/// Inputs shared by every strategy for one render call
pub struct RenderInputs<'a> {
    /// Host scene, for camera lookup
    pub scene: &'a HostScene,
    /// Populated delegate
    pub delegate: &'a SceneDelegate,
    /// Synced index
    pub index: &'a MemoryRenderIndex,
}

/// How a render call drives the executor
pub trait RenderStrategy {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Camera for the next render
    fn camera(&self, scene: &HostScene) -> Result<CameraParams, EngineError>;

    /// Run the executor and collect its output. `stop` is checked between
    /// executions.
    fn render(
        &mut self,
        inputs: &RenderInputs<'_>,
        executor: &mut dyn RenderExecutor,
        stop: &AtomicBool,
    ) -> Result<RenderResult, EngineError>;

    /// Take new viewport navigation state. Returns whether the strategy uses it.
    fn update_viewport(&mut self, _viewport: &ViewportState) -> bool {
        false
    }
}

/// Offline render through the scene camera with sample accumulation
#[derive(Debug, Clone)]
pub struct FinalRender {
    config: RenderConfig,
}

impl FinalRender {
    /// Strategy rendering at the configured resolution and sample count
    pub const fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl RenderStrategy for FinalRender {
    fn name(&self) -> &'static str {
        "final"
    }

    fn camera(&self, scene: &HostScene) -> Result<CameraParams, EngineError> {
        let (object, camera) = scene.active_camera().ok_or(EngineError::NoCamera)?;
        Ok(export_scene_camera(object, camera, self.config.aspect_ratio()))
    }

    fn render(
        &mut self,
        inputs: &RenderInputs<'_>,
        executor: &mut dyn RenderExecutor,
        stop: &AtomicBool,
    ) -> Result<RenderResult, EngineError> {
        let camera = self.camera(inputs.scene)?;
        let RenderConfig {
            width,
            height,
            samples,
            background,
            ..
        } = self.config;

        let mut combined = RenderBuffer::filled(width, height, background);
        let mut sample_buffer = RenderBuffer::new(width, height);
        let mut completed = 0;
        let mut stopped = false;

        for sample in 0..samples {
            if stop.load(Ordering::Relaxed) {
                log::info!("Final render stopped after {} of {} samples", completed, samples);
                stopped = true;
                break;
            }

            sample_buffer.clear(background);
            let frame = FrameContext {
                delegate: inputs.delegate,
                index: inputs.index,
                camera: &camera,
                sample,
            };
            executor.execute(&frame, &mut sample_buffer)?;
            completed += 1;
            combined.accumulate(&sample_buffer, completed);
        }

        log::debug!("Final render finished {} samples", completed);
        Ok(RenderResult {
            passes: vec![RenderPass {
                name: RenderResult::COMBINED.to_string(),
                buffer: combined,
            }],
            samples_completed: completed,
            stopped,
        })
    }
}

/// Interactive render through the viewport, one execution per draw
#[derive(Debug, Clone)]
pub struct ViewportRender {
    viewport: ViewportState,
    background: [f32; 4],
}

impl ViewportRender {
    /// Strategy for the given initial viewport
    pub const fn new(viewport: ViewportState, background: [f32; 4]) -> Self {
        Self {
            viewport,
            background,
        }
    }

    /// Current viewport state
    pub const fn viewport(&self) -> &ViewportState {
        &self.viewport
    }
}

impl RenderStrategy for ViewportRender {
    fn name(&self) -> &'static str {
        "viewport"
    }

    fn camera(&self, scene: &HostScene) -> Result<CameraParams, EngineError> {
        Ok(export_viewport_camera(&self.viewport, scene.active_camera()))
    }

    fn render(
        &mut self,
        inputs: &RenderInputs<'_>,
        executor: &mut dyn RenderExecutor,
        stop: &AtomicBool,
    ) -> Result<RenderResult, EngineError> {
        let mut buffer = RenderBuffer::filled(self.viewport.width, self.viewport.height, self.background);
        if stop.load(Ordering::Relaxed) {
            return Ok(RenderResult {
                passes: vec![RenderPass {
                    name: RenderResult::COMBINED.to_string(),
                    buffer,
                }],
                samples_completed: 0,
                stopped: true,
            });
        }

        let camera = self.camera(inputs.scene)?;
        let frame = FrameContext {
            delegate: inputs.delegate,
            index: inputs.index,
            camera: &camera,
            sample: 0,
        };
        executor.execute(&frame, &mut buffer)?;

        Ok(RenderResult {
            passes: vec![RenderPass {
                name: RenderResult::COMBINED.to_string(),
                buffer,
            }],
            samples_completed: 1,
            stopped: false,
        })
    }

    fn update_viewport(&mut self, viewport: &ViewportState) -> bool {
        self.viewport = viewport.clone();
        true
    }
}
