//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and pixel-grid helpers
//! - Logging setup
//! - Stable handle maps

pub mod math;
pub mod collections;
pub mod logging;
