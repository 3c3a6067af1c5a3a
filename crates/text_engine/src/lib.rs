//! # Text Engine
//!
//! Batched glyph text rendering for real-time render loops.
//!
//! ## Features
//!
//! - **Deferred Submission**: Styled strings are queued per frame and expanded once
//! - **Font/Depth Batching**: Requests sharing a font map and depth become one draw call
//! - **Word Wrapping**: Pluggable line layout with ink-accurate width measurement
//! - **Bounded Memory**: Every per-frame container is sized once from `max_characters`
//! - **Hot Reload**: Font maps can be replaced in place without invalidating queued text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut backend = HeadlessBackend::new();
//!     let mut fonts = FontMaps::new();
//!     let font = fonts.create(&mut backend, &FontMapParams::default())?;
//!
//!     let mut text = TextContext::new(&mut backend, &TextConfig::default())?;
//!     let mut queue = RenderQueue::new();
//!
//!     text.draw_text(font, &DrawTextParams::new("Hello"));
//!     text.flush_texts(&mut backend, &fonts, &mut queue)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TextConfig},
        foundation::math::{Mat4, Vec2, Vec4},
        render::{
            BackendResult, GraphicsBackend, HeadlessBackend, MaterialHandle, RenderError,
            RenderObject, RenderQueue, TextureHandle,
        },
        render::systems::text::{
            get_text_metrics, DrawTextParams, FontMap, FontMapHandle, FontMapParams, FontMaps,
            Glyph, TextContext, TextMetrics,
        },
    };
}
