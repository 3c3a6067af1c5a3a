//! Text rendering system
//!
//! Font maps, line layout, measurement, and the batched text context.

pub mod font_map;
pub mod glyph;
pub mod text_context;
pub mod text_layout;
pub mod text_metrics;
pub mod vertex;

pub use font_map::{FontError, FontMap, FontMapHandle, FontMapParams, FontMaps, FontResult};
pub use glyph::{Glyph, GlyphTable, FALLBACK_CHARACTER};
pub use text_context::{DrawTextParams, TextContext, TextError, SHADOW_OFFSET, TEXTURE_SIZE_RECIP};
pub use text_layout::{LineLayout, MeasureFn, WordWrapLayout, MAX_LINES};
pub use text_metrics::{get_text_metrics, get_text_metrics_with, measure_line, TextMetrics};
pub use vertex::{pack_color, GlyphVertex, GLYPH_VERTEX_ELEMENTS};
