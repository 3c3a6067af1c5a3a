//! Batched text context
//!
//! Collects styled strings during a frame and turns them into glyph quads
//! once, at flush time.
//!
//! # Batching
//!
//! ```text
//! draw_text ──► text_entries (arena, append only)
//!                    │  next/tail indices link entries of one batch
//!               batches: (font map, depth) ──► head entry index
//!                    │
//! flush_texts ─► one RenderObject + vertex range per batch ──► RenderQueue
//!                    │
//!               staging vertices ──► GPU vertex buffer (single upload)
//! ```
//!
//! Entries of the same batch keep submission order. The order in which
//! batches are visited is unspecified; draw order between batches comes from
//! the render key depth.
//!
//! # Capacity
//!
//! Every container is sized once from `TextConfig::max_characters`. Running
//! out of room drops the offending submission (or the rest of a batch during
//! vertex generation) with a warning; previously accepted work is untouched.

use std::collections::HashMap;

use super::font_map::{FontMap, FontMapHandle, FontMaps};
use super::glyph::Glyph;
use super::text_layout::{LineLayout, WordWrapLayout};
use super::text_metrics::layout_lines;
use super::vertex::{pack_color, GlyphVertex, GLYPH_VERTEX_ELEMENTS};
use crate::config::{TextConfig, VERTICES_PER_GLYPH};
use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec4};
use crate::render::api::{
    BackendResult, BlendFactor, BufferUsage, GraphicsBackend, PrimitiveType, VertexBufferHandle,
    VertexDeclarationHandle,
};
use crate::render::render_object::{RenderKey, RenderObject};
use crate::render::render_queue::RenderQueue;

/// Shader constant holding `(1 / atlas width, 1 / atlas height, 0, 0)`
pub const TEXTURE_SIZE_RECIP: &str = "texture_size_recip";

/// Shader constant name for the font shadow offset, bound by the material
pub const SHADOW_OFFSET: &str = "offset";

/// Reasons a submission or batch is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// Batch table holds the maximum number of distinct (font map, depth) keys
    #[error("Out of text-render batches")]
    OutOfBatches,

    /// Text entry table is full
    #[error("Out of text-render entries")]
    OutOfEntries,

    /// Shared text buffer cannot hold the string and its terminator
    #[error("Out of text-render buffer")]
    OutOfTextBuffer,

    /// Render object pool is exhausted
    #[error("Out of text-render objects")]
    OutOfRenderObjects,

    /// Vertex staging buffer is full; carries the number of glyphs written
    #[error("Fontrenderer: character buffer exceeded (size: {0})")]
    VertexBufferFull(usize),

    /// Batch refers to a font map that no longer exists
    #[error("Unknown font map {0:?}")]
    UnknownFontMap(FontMapHandle),
}

/// One styled string to draw
#[derive(Debug, Clone, Copy)]
pub struct DrawTextParams<'a> {
    /// Transform applied to every glyph corner
    pub world_transform: Mat4,
    /// Face color, RGBA in [0, 1]
    pub face_color: Vec4,
    /// Outline color, RGBA in [0, 1]
    pub outline_color: Vec4,
    /// Shadow color, RGBA in [0, 1]
    pub shadow_color: Vec4,
    /// UTF-8 text; anything after an embedded NUL is ignored
    pub text: &'a str,
    /// Depth layer, part of the batch key
    pub depth: u32,
    /// Wrap width in pixels, used when `line_break` is set
    pub width: f32,
    /// Whether to wrap at `width`
    pub line_break: bool,
}

impl<'a> DrawTextParams<'a> {
    /// Parameters for `text` with default style
    ///
    /// Colors default to `(0, 0, 0, -1)`; a negative alpha is the caller-side
    /// "unset" convention and is packed like any other value.
    pub fn new(text: &'a str) -> Self {
        let unset = Vec4::new(0.0, 0.0, 0.0, -1.0);
        Self {
            world_transform: Mat4::identity(),
            face_color: unset,
            outline_color: unset,
            shadow_color: unset,
            text,
            depth: 0,
            width: f32::MAX,
            line_break: false,
        }
    }

    /// Set the world transform
    #[must_use]
    pub const fn with_transform(mut self, world_transform: Mat4) -> Self {
        self.world_transform = world_transform;
        self
    }

    /// Set face, outline and shadow colors
    #[must_use]
    pub const fn with_colors(mut self, face: Vec4, outline: Vec4, shadow: Vec4) -> Self {
        self.face_color = face;
        self.outline_color = outline;
        self.shadow_color = shadow;
        self
    }

    /// Set the depth layer
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Wrap at `width` pixels
    #[must_use]
    pub const fn with_wrap_width(mut self, width: f32) -> Self {
        self.width = width;
        self.line_break = true;
        self
    }
}

impl Default for DrawTextParams<'_> {
    fn default() -> Self {
        Self::new("")
    }
}

/// Grouping key: all entries of one batch share font map and depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BatchKey {
    font_map: FontMapHandle,
    depth: u32,
}

/// A queued draw request
#[derive(Debug, Clone)]
struct TextEntry {
    transform: Mat4,
    string_offset: usize,
    string_len: usize,
    font_map: FontMapHandle,
    face_color: u32,
    outline_color: u32,
    shadow_color: u32,
    depth: u32,
    width: f32,
    line_break: bool,
    /// Next entry of the same batch
    next: Option<usize>,
    /// Last entry of the batch; only maintained on the head
    tail: Option<usize>,
}

/// Fixed-capacity glyph vertex staging area
#[derive(Debug)]
struct VertexStaging {
    vertices: Vec<GlyphVertex>,
    max_vertex_count: usize,
}

impl VertexStaging {
    fn has_room_for_glyph(&self) -> bool {
        self.vertices.len() + VERTICES_PER_GLYPH <= self.max_vertex_count
    }

    fn glyph_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_GLYPH
    }
}

/// Per-frame text batching state
pub struct TextContext {
    config: TextConfig,
    layout: Box<dyn LineLayout>,

    /// Strings of all entries, each followed by a NUL
    text_buffer: String,
    text_entries: Vec<TextEntry>,
    batches: HashMap<BatchKey, usize>,

    /// Pre-configured render objects, one per batch
    render_objects: Vec<RenderObject>,
    render_object_index: usize,

    staging: VertexStaging,
    vertex_buffer: VertexBufferHandle,
    vertex_declaration: VertexDeclarationHandle,

    /// Line lengths scratch space, reused across entries
    lines: Vec<usize>,
}

impl TextContext {
    /// Allocate all per-frame containers and the GPU vertex buffer
    pub fn new(backend: &mut dyn GraphicsBackend, config: &TextConfig) -> BackendResult<Self> {
        let max_vertex_count = config.max_vertex_count();
        let buffer_size = max_vertex_count * std::mem::size_of::<GlyphVertex>();

        let vertex_buffer = backend.new_vertex_buffer(buffer_size, BufferUsage::StreamDraw)?;
        let vertex_declaration = match backend.new_vertex_declaration(&GLYPH_VERTEX_ELEMENTS) {
            Ok(declaration) => declaration,
            Err(e) => {
                backend.delete_vertex_buffer(vertex_buffer);
                return Err(e);
            }
        };

        let template = RenderObject::with_geometry(vertex_buffer, vertex_declaration, PrimitiveType::Triangles)
            .with_blend_factors(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

        log::debug!(
            "Text context: {} characters, {} entries, {} batches",
            config.max_characters,
            config.max_text_entries(),
            config.max_batches()
        );

        Ok(Self {
            config: config.clone(),
            layout: Box::new(WordWrapLayout::new()),
            text_buffer: String::with_capacity(config.text_buffer_capacity()),
            text_entries: Vec::with_capacity(config.max_text_entries()),
            batches: HashMap::with_capacity(config.max_batches()),
            render_objects: vec![template; config.max_batches()],
            render_object_index: 0,
            staging: VertexStaging {
                vertices: Vec::with_capacity(max_vertex_count),
                max_vertex_count,
            },
            vertex_buffer,
            vertex_declaration,
            lines: Vec::new(),
        })
    }

    /// Replace the line layout service
    #[must_use]
    pub fn with_layout(mut self, layout: Box<dyn LineLayout>) -> Self {
        self.layout = layout;
        self
    }

    /// Release the GPU vertex buffer and vertex declaration
    pub fn finalize(self, backend: &mut dyn GraphicsBackend) {
        backend.delete_vertex_buffer(self.vertex_buffer);
        backend.delete_vertex_declaration(self.vertex_declaration);
    }

    /// Queue a string for drawing this frame
    ///
    /// Never fails from the caller's point of view: a submission that does
    /// not fit is dropped and a warning is logged.
    pub fn draw_text(&mut self, font_map: FontMapHandle, params: &DrawTextParams<'_>) {
        if let Err(e) = self.enqueue(font_map, params) {
            log::warn!("{}", e);
        }
    }

    fn enqueue(&mut self, font_map: FontMapHandle, params: &DrawTextParams<'_>) -> Result<usize, TextError> {
        let key = BatchKey {
            font_map,
            depth: params.depth,
        };

        let head = self.batches.get(&key).copied();
        if head.is_none() && self.batches.len() >= self.config.max_batches() {
            return Err(TextError::OutOfBatches);
        }

        if self.text_entries.len() >= self.config.max_text_entries() {
            return Err(TextError::OutOfEntries);
        }

        let text = params.text.split('\0').next().unwrap_or_default();
        if self.text_buffer.len() + text.len() + 1 > self.config.text_buffer_capacity() {
            return Err(TextError::OutOfTextBuffer);
        }

        let string_offset = self.text_buffer.len();
        self.text_buffer.push_str(text);
        self.text_buffer.push('\0');

        let index = self.text_entries.len();
        self.text_entries.push(TextEntry {
            transform: params.world_transform,
            string_offset,
            string_len: text.len(),
            font_map,
            face_color: pack_color(&params.face_color),
            outline_color: pack_color(&params.outline_color),
            shadow_color: pack_color(&params.shadow_color),
            depth: params.depth,
            width: params.width,
            line_break: params.line_break,
            next: None,
            tail: None,
        });

        if let Some(head) = head {
            let tail = self.text_entries[head].tail.unwrap_or(head);
            self.text_entries[tail].next = Some(index);
            self.text_entries[head].tail = Some(index);
        } else {
            self.batches.insert(key, index);
        }

        Ok(index)
    }

    /// Generate vertices for every pending batch and upload them
    ///
    /// Meant to run once per frame. Per-frame state is reset afterwards, so a
    /// second call without new submissions does nothing.
    pub fn flush_texts(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        font_maps: &FontMaps,
        queue: &mut RenderQueue,
    ) -> BackendResult<()> {
        let mut result = Ok(());

        if !self.batches.is_empty() {
            let mut batches = std::mem::take(&mut self.batches);
            for &head in batches.values() {
                if let Err(e) = self.create_font_vertex_data(font_maps, queue, head) {
                    log::warn!("{}", e);
                }
            }
            batches.clear();
            self.batches = batches;

            result = self.upload(backend);
        }

        self.reset_frame();
        result
    }

    /// Expand one batch into glyph quads and queue its render object
    fn create_font_vertex_data(
        &mut self,
        font_maps: &FontMaps,
        queue: &mut RenderQueue,
        head: usize,
    ) -> Result<(), TextError> {
        let first = &self.text_entries[head];
        let font_map = font_maps
            .get(first.font_map)
            .ok_or(TextError::UnknownFontMap(first.font_map))?;
        let depth = first.depth;

        if !font_map.has_atlas() {
            log::debug!("Skipping text batch for font map without atlas");
            return Ok(());
        }

        if self.render_object_index >= self.render_objects.len() {
            return Err(TextError::OutOfRenderObjects);
        }
        let ro_index = self.render_object_index;
        self.render_object_index += 1;

        let vertex_start = self.staging.vertices.len();
        let recip = font_map.texture_size_recip();

        let ro = &mut self.render_objects[ro_index];
        ro.render_key = RenderKey { depth, order: 0 };
        ro.material = font_map.material();
        ro.texture = Some(font_map.texture());
        ro.vertex_start = vertex_start as u32;
        ro.vertex_count = 0;
        ro.enable_constant(TEXTURE_SIZE_RECIP, Vec4::new(recip.x, recip.y, 0.0, 0.0));

        let mut next = Some(head);
        while let Some(index) = next {
            let entry = &self.text_entries[index];
            let text = &self.text_buffer[entry.string_offset..entry.string_offset + entry.string_len];

            layout_lines(&*self.layout, font_map, text, entry.width, entry.line_break, &mut self.lines);
            emit_entry(&mut self.staging, font_map, entry, text, &self.lines, recip)?;

            next = entry.next;
        }

        let ro = &mut self.render_objects[ro_index];
        ro.vertex_count = (self.staging.vertices.len() - vertex_start) as u32;
        queue.add(ro.clone());
        Ok(())
    }

    fn upload(&self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        let data: &[u8] = bytemuck::cast_slice(&self.staging.vertices);

        // Orphan the old storage first so backends that alias the buffer
        // never see a half-written frame
        backend.set_vertex_buffer_data(self.vertex_buffer, &[], BufferUsage::StreamDraw)?;
        backend.set_vertex_buffer_data(self.vertex_buffer, data, BufferUsage::StreamDraw)
    }

    fn reset_frame(&mut self) {
        self.text_buffer.clear();
        self.text_entries.clear();
        self.staging.vertices.clear();
        self.render_object_index = 0;
    }

    /// Configuration the context was created with
    pub const fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Number of distinct batches queued this frame
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    /// Number of text entries queued this frame
    pub fn entry_count(&self) -> usize {
        self.text_entries.len()
    }

    /// Bytes used in the shared text buffer, terminators included
    pub fn text_buffer_len(&self) -> usize {
        self.text_buffer.len()
    }

    /// Vertices currently staged
    pub fn vertex_count(&self) -> usize {
        self.staging.vertices.len()
    }

    /// Staged vertices not yet reset by a flush
    pub fn vertices(&self) -> &[GlyphVertex] {
        &self.staging.vertices
    }

    /// GPU vertex buffer all text render objects draw from
    pub const fn vertex_buffer(&self) -> VertexBufferHandle {
        self.vertex_buffer
    }

    /// Vertex declaration describing `GlyphVertex`
    pub const fn vertex_declaration(&self) -> VertexDeclarationHandle {
        self.vertex_declaration
    }
}

/// Emit the quads of one text entry
fn emit_entry(
    staging: &mut VertexStaging,
    font_map: &FontMap,
    entry: &TextEntry,
    text: &str,
    lines: &[usize],
    recip: Vec2,
) -> Result<(), TextError> {
    let line_height = font_map.line_height();
    let mut chars = text.chars();

    for (line_index, &line_len) in lines.iter().enumerate() {
        let mut x: i16 = 0;
        let y = (-(line_index as f32) * line_height - 0.5) as i16;

        for j in 0..line_len {
            let Some(c) = chars.next() else {
                break;
            };

            // Skip single trailing white-space
            if j + 1 == line_len && (c == ' ' || c == '\n') {
                continue;
            }

            let Some(glyph) = font_map.glyph(c as u32) else {
                continue;
            };

            if !staging.has_room_for_glyph() {
                return Err(TextError::VertexBufferFull(staging.glyph_count()));
            }

            if glyph.has_ink() {
                staging.vertices.extend_from_slice(&glyph_quad(entry, glyph, x, y, recip));
            }
            x = x.wrapping_add(glyph.advance as i16);
        }
    }

    Ok(())
}

/// Two triangles covering the glyph's ink box, sharing the v2-v3 diagonal
fn glyph_quad(entry: &TextEntry, glyph: &Glyph, x: i16, y: i16, recip: Vec2) -> [GlyphVertex; 6] {
    let width = f32::from(glyph.width as i16);
    let ascent = f32::from(glyph.ascent as i16);
    let descent = f32::from(glyph.descent as i16);

    let left = f32::from(x) + glyph.left_bearing;
    let right = left + width;
    let bottom = f32::from(y) - descent;
    let top = f32::from(y) + ascent;

    let atlas_x = glyph.x as f32 + glyph.left_bearing;
    let atlas_y = glyph.y as f32;
    let u0 = atlas_x * recip.x;
    let u1 = (atlas_x + glyph.width) * recip.x;
    let v_bottom = (atlas_y + descent) * recip.y;
    let v_top = (atlas_y - ascent) * recip.y;

    let corner = |px: f32, py: f32, u: f32, v: f32| GlyphVertex {
        position: entry.transform.transform_plane_point(px, py).into(),
        uv: [u, v],
        face_color: entry.face_color,
        outline_color: entry.outline_color,
        shadow_color: entry.shadow_color,
    };

    let v1 = corner(left, bottom, u0, v_bottom);
    let v2 = corner(left, top, u0, v_top);
    let v3 = corner(right, bottom, u1, v_bottom);
    let v6 = corner(right, top, u1, v_top);

    [v1, v2, v3, v3, v2, v6]
}
