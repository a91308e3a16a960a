//! Scenario tests for the scene delegate
//!
//! Each test drives a [`Session`]: a host scene, a delegate, an in-memory
//! render index and a material exporter that counts its calls.

mod populate;
mod reconcile;
mod sync;

use std::cell::Cell;
use std::path::PathBuf;

use crate::core::DelegateConfig;
use crate::export::{MaterialExportError, MaterialExporter};
use crate::foundation::collections::ObjectKey;
use crate::host::HostScene;

use super::{MemoryRenderIndex, PopulateStats, SceneDelegate, SceneId};

/// Exporter that records how often it was called
#[derive(Default)]
pub(super) struct CountingExporter {
    calls: Cell<usize>,
    fail: bool,
}

impl CountingExporter {
    pub(super) fn failing() -> Self {
        Self {
            calls: Cell::new(0),
            fail: true,
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MaterialExporter for CountingExporter {
    fn export_material(&self, name: &str) -> Result<PathBuf, MaterialExportError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(MaterialExportError::Failed {
                name: name.to_string(),
                reason: "exporter offline".to_string(),
            });
        }
        Ok(PathBuf::from(format!("/materials/{name}.mtlx")))
    }
}

pub(super) struct Session {
    pub scene: HostScene,
    pub delegate: SceneDelegate,
    pub index: MemoryRenderIndex,
    pub exporter: CountingExporter,
}

impl Session {
    pub(super) fn new() -> Self {
        Self::with_config(&DelegateConfig::default())
    }

    pub(super) fn with_config(config: &DelegateConfig) -> Self {
        Self {
            scene: HostScene::new(),
            delegate: SceneDelegate::new(config),
            index: MemoryRenderIndex::new(),
            exporter: CountingExporter::default(),
        }
    }

    /// Drain the scene's pending updates into the delegate
    pub(super) fn populate(&mut self) -> PopulateStats {
        let updates = self.scene.take_updates();
        self.delegate
            .populate(&self.scene, &updates, &mut self.index, &self.exporter)
    }

    pub(super) fn id(&self, key: ObjectKey) -> SceneId {
        self.delegate.object_id(key)
    }
}
