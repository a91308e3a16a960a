//! Per-material table entry

use std::path::{Path, PathBuf};

use crate::export::{MaterialExportError, MaterialExporter};

use super::{tokens, AttributeCache, Value};

/// A material referenced by at least one rendered object.
///
/// The exported shading network is cached per version: `mark_updated`
/// bumps the version, and `resolve` only calls the exporter when the cached
/// result belongs to an older version.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    name: String,
    version: u64,
    exported_version: Option<u64>,
    attributes: AttributeCache,
}

impl MaterialData {
    /// Entry for the host material called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 0,
            exported_version: None,
            attributes: AttributeCache::new(),
        }
    }

    /// Host material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bumped on every shading update
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Attributes; holds the asset path once resolved
    pub const fn attributes(&self) -> &AttributeCache {
        &self.attributes
    }

    /// Record a shading change. The host may have renamed the material.
    pub fn mark_updated(&mut self, name: &str) {
        self.version += 1;
        if self.name != name {
            self.name = name.to_string();
        }
    }

    /// Whether the current version has not been exported yet
    pub fn needs_export(&self) -> bool {
        self.exported_version != Some(self.version)
    }

    /// Export the current version if needed. Returns whether the exporter
    /// was called.
    ///
    /// A failed export leaves the asset path empty; it is not retried until
    /// the next shading update.
    pub fn resolve(&mut self, exporter: &dyn MaterialExporter) -> bool {
        if !self.needs_export() {
            return false;
        }

        let result = exporter.export_material(&self.name).and_then(|path| {
            if path.as_os_str().is_empty() {
                Err(MaterialExportError::InvalidPath {
                    name: self.name.clone(),
                    path,
                })
            } else {
                Ok(path)
            }
        });

        match result {
            Ok(path) => {
                log::debug!("Material {:?} exported to {}", self.name, path.display());
                self.attributes.set(tokens::MATERIAL_PATH, path);
            }
            Err(err) => {
                log::warn!("Material {:?} left without shading network: {}", self.name, err);
                self.attributes.remove(tokens::MATERIAL_PATH);
            }
        }

        self.exported_version = Some(self.version);
        true
    }

    /// Exported shading network of the last resolved version
    pub fn asset_path(&self) -> Option<&Path> {
        self.attributes
            .get(tokens::MATERIAL_PATH)
            .and_then(Value::as_asset_path)
    }

    /// Owned copy of [`asset_path`](Self::asset_path)
    pub fn asset_path_buf(&self) -> Option<PathBuf> {
        self.asset_path().map(Path::to_path_buf)
    }
}
