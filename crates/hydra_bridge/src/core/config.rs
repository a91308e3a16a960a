//! # Unified Configuration System
//!
//! All settings for one render session live here: logging and debug
//! behaviour, how the scene delegate names and exports its primitives, and
//! the parameters of the render loop.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: log level and debug features
//! - **Delegate Config**: delegate root path, material export toggle
//! - **Render Config**: resolution, sample count, sync workers, background

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Root path used when none is configured.
pub const DEFAULT_ROOT_PATH: &str = "/blender_delegate";

/// # Engine Configuration
///
/// Core behaviour that affects the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter passed to `env_logger` (e.g. `"info"` or `"hydra_bridge=debug"`)
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Delegate Configuration
///
/// Controls the scene delegate: where its primitives live in the render
/// index namespace and whether materials are sent to the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Path prefix every scene id is scoped under
    pub root_path: String,
    /// Call the material exporter for referenced materials
    pub export_materials: bool,
}

impl DelegateConfig {
    /// Create a delegate configuration with the default root path
    pub fn new() -> Self {
        Self {
            root_path: DEFAULT_ROOT_PATH.to_string(),
            export_materials: true,
        }
    }

    /// Set the root path
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Enable or disable material export
    #[must_use]
    pub const fn with_material_export(mut self, enabled: bool) -> Self {
        self.export_materials = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "Delegate root path must be absolute: {:?}",
                self.root_path
            )));
        }
        if self.root_path.len() > 1 && self.root_path.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "Delegate root path must not end with '/': {:?}",
                self.root_path
            )));
        }
        Ok(())
    }
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Render Configuration
///
/// Parameters of the final/viewport render loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Number of executor iterations for a final render
    pub samples: u32,
    /// Worker threads used when pulling dirty prims
    pub sync_workers: usize,
    /// RGBA clear colour of the render buffer
    pub background: [f32; 4],
}

impl RenderConfig {
    /// Create a new render configuration
    pub const fn new() -> Self {
        Self {
            width: 960,
            height: 540,
            samples: 16,
            sync_workers: 4,
            background: [0.05, 0.05, 0.05, 1.0],
        }
    }

    /// Set output resolution
    #[must_use]
    pub const fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set sample count
    #[must_use]
    pub const fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    /// Set sync worker count
    #[must_use]
    pub const fn with_sync_workers(mut self, workers: usize) -> Self {
        self.sync_workers = workers;
        self
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::Invalid("Samples must be at least 1".to_string()));
        }
        if self.sync_workers == 0 {
            return Err(ConfigError::Invalid(
                "Sync workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Bridge Configuration
///
/// Top-level configuration for one render session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene delegate configuration
    pub delegate: DelegateConfig,
    /// Render loop configuration
    pub render: RenderConfig,
}

impl BridgeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delegate.validate()?;
        self.render.validate()?;
        Ok(())
    }
}

impl Config for BridgeConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hydra_bridge_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delegate.root_path, DEFAULT_ROOT_PATH);
    }

    #[test]
    fn test_relative_root_path_rejected() {
        let config = DelegateConfig::new().with_root_path("scene");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = DelegateConfig::new().with_root_path("/scene/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = RenderConfig::new().with_resolution(0, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_save_and_load() {
        let path = temp_path("config.toml");
        let mut config = BridgeConfig::default();
        config.render = config.render.with_samples(3).with_resolution(64, 32);
        config.delegate = config.delegate.with_root_path("/hd");

        config.save_to_file(&path).unwrap();
        let loaded = BridgeConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let path = temp_path("partial.ron");
        std::fs::write(&path, "(render: (samples: 2))").unwrap();
        let loaded = BridgeConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.render.samples, 2);
        assert_eq!(loaded.render.width, RenderConfig::new().width);
        assert_eq!(loaded.delegate, DelegateConfig::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = BridgeConfig::load_from_file("settings.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
