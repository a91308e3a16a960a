//! # Core Module
//!
//! Session-wide configuration shared by the delegate, the render loop and
//! the demo application.

pub mod config;

pub use config::{
    BridgeConfig, Config, ConfigError, DelegateConfig, EngineConfig, RenderConfig,
};
