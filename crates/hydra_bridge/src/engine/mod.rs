//! Render session driver
//!
//! An [`Engine`] owns everything one render session needs: the scene
//! delegate, the render index, the material exporter, a render strategy and
//! the executor. Each sync runs `populate` followed by the parallel pull
//! pass; rendering only starts once both have returned.

mod buffer;
mod executor;
mod strategy;

pub use buffer::{RenderBuffer, RenderPass, RenderResult};
pub use executor::{FrameContext, RenderExecutor};
pub use strategy::{FinalRender, RenderInputs, RenderStrategy, ViewportRender};

use std::sync::atomic::AtomicBool;

use thiserror::Error;

use crate::core::{BridgeConfig, ConfigError};
use crate::export::MaterialExporter;
use crate::host::{DepsgraphUpdate, HostScene, ViewportState};
use crate::scene::{MemoryRenderIndex, PopulateStats, SceneDelegate, SyncStats};

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A final render needs a scene camera
    #[error("Scene has no active camera")]
    NoCamera,

    /// The render executor reported a failure
    #[error("Render executor failed: {0}")]
    Executor(String),
}

/// Outcome of one [`Engine::sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Delegate diff counters
    pub populate: PopulateStats,
    /// Pull pass counters
    pub sync: SyncStats,
}

/// One render session
pub struct Engine {
    delegate: SceneDelegate,
    index: MemoryRenderIndex,
    exporter: Box<dyn MaterialExporter>,
    strategy: Box<dyn RenderStrategy>,
    executor: Box<dyn RenderExecutor>,
    sync_workers: usize,
}

impl Engine {
    /// Create a session with an explicit strategy
    pub fn new(
        config: &BridgeConfig,
        strategy: Box<dyn RenderStrategy>,
        executor: Box<dyn RenderExecutor>,
        exporter: Box<dyn MaterialExporter>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Creating {} render session under {}",
            strategy.name(),
            config.delegate.root_path
        );

        Ok(Self {
            delegate: SceneDelegate::new(&config.delegate),
            index: MemoryRenderIndex::new(),
            exporter,
            strategy,
            executor,
            sync_workers: config.render.sync_workers,
        })
    }

    /// Session rendering through the scene camera
    pub fn final_render(
        config: &BridgeConfig,
        executor: Box<dyn RenderExecutor>,
        exporter: Box<dyn MaterialExporter>,
    ) -> Result<Self, EngineError> {
        let strategy = Box::new(FinalRender::new(config.render.clone()));
        Self::new(config, strategy, executor, exporter)
    }

    /// Session rendering the interactive viewport
    pub fn viewport(
        config: &BridgeConfig,
        viewport: ViewportState,
        executor: Box<dyn RenderExecutor>,
        exporter: Box<dyn MaterialExporter>,
    ) -> Result<Self, EngineError> {
        let strategy = Box::new(ViewportRender::new(viewport, config.render.background));
        Self::new(config, strategy, executor, exporter)
    }

    /// Apply a change batch and pull everything it dirtied
    pub fn sync(&mut self, scene: &HostScene, updates: &[DepsgraphUpdate]) -> SyncReport {
        let populate = self
            .delegate
            .populate(scene, updates, &mut self.index, self.exporter.as_ref());
        let sync = self.index.sync_all(&self.delegate, self.sync_workers);
        SyncReport { populate, sync }
    }

    /// Render with the session's strategy. `stop` is checked between
    /// executor runs.
    pub fn render(&mut self, scene: &HostScene, stop: &AtomicBool) -> Result<RenderResult, EngineError> {
        if self.index.has_dirty() {
            log::warn!("Rendering with unsynced prims; call sync first");
        }
        let inputs = RenderInputs {
            scene,
            delegate: &self.delegate,
            index: &self.index,
        };
        self.strategy.render(&inputs, self.executor.as_mut(), stop)
    }

    /// Draw the viewport with new navigation state
    pub fn view_draw(&mut self, scene: &HostScene, viewport: &ViewportState) -> Result<RenderResult, EngineError> {
        if !self.strategy.update_viewport(viewport) {
            log::debug!("{} strategy ignores viewport state", self.strategy.name());
        }
        self.render(scene, &AtomicBool::new(false))
    }

    /// Scene delegate
    pub const fn delegate(&self) -> &SceneDelegate {
        &self.delegate
    }

    /// Render index
    pub const fn index(&self) -> &MemoryRenderIndex {
        &self.index
    }

    /// Active strategy name
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
