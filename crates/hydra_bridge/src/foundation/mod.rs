//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the bridge:
//! - Math types and operations
//! - Generational handle collections
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
