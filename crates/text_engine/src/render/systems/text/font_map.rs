//! Font map system for text rendering
//!
//! A font map pairs a glyph table with the atlas texture the glyphs were
//! packed into, plus the font-wide vertical metrics used for line pitch.
//! Atlas construction happens offline; this module only uploads the finished
//! bitmap and answers per-codepoint metric lookups.
//!
//! Font maps live in a `FontMaps` registry. The `FontMapHandle` returned on
//! creation stays valid across `replace`, so text queued against a font keeps
//! working after a live reload of that font.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::glyph::{Glyph, GlyphTable};
use crate::config::Config;
use crate::foundation::collections::HandleMap;
use crate::foundation::math::Vec2;
use crate::render::api::{
    GraphicsBackend, MaterialHandle, TextureFilter, TextureFormat, TextureHandle, TextureParams,
};
use crate::render::RenderError;

new_key_type! {
    /// Stable identity of a font map inside a `FontMaps` registry
    pub struct FontMapHandle;
}

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to create or update the atlas texture
    #[error("Failed to upload atlas texture: {0}")]
    AtlasUpload(#[from] RenderError),

    /// Handle does not refer to a live font map
    #[error("Unknown font map {0:?}")]
    UnknownFontMap(FontMapHandle),
}

/// Everything needed to build a font map
///
/// Also loadable from a `.ron` or `.toml` font description through `Config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMapParams {
    /// Glyph metrics; duplicates by codepoint overwrite earlier entries
    pub glyphs: Vec<Glyph>,
    /// Atlas width in pixels
    pub texture_width: u32,
    /// Atlas height in pixels
    pub texture_height: u32,
    /// Atlas pixels, tightly packed RGB
    pub texture_data: Vec<u8>,
    /// Shadow offset x, consumed by the material
    pub shadow_x: f32,
    /// Shadow offset y, consumed by the material
    pub shadow_y: f32,
    /// Largest ascent of any glyph
    pub max_ascent: f32,
    /// Largest descent of any glyph
    pub max_descent: f32,
}

impl FontMapParams {
    fn texture_params(&self) -> TextureParams<'_> {
        // No mipmaps for font atlases, so linear filtering both ways
        TextureParams {
            format: TextureFormat::Rgb,
            data: &self.texture_data,
            width: self.texture_width,
            height: self.texture_height,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
        }
    }
}

impl Config for FontMapParams {}

/// A loaded font: glyph table, atlas texture and vertical metrics
#[derive(Debug)]
pub struct FontMap {
    /// Atlas texture
    texture: TextureHandle,

    /// Material used to draw this font; owned by the caller
    material: Option<MaterialHandle>,

    /// Glyph information lookup
    glyphs: GlyphTable,

    /// Atlas texture dimensions
    texture_width: u32,
    texture_height: u32,

    shadow_x: f32,
    shadow_y: f32,
    max_ascent: f32,
    max_descent: f32,
}

impl FontMap {
    /// Build the glyph table and upload the atlas
    pub fn new(backend: &mut dyn GraphicsBackend, params: &FontMapParams) -> FontResult<Self> {
        let texture = backend.new_texture(&params.texture_params())?;

        log::debug!(
            "Created font map: {} glyphs, {}x{} atlas",
            params.glyphs.len(),
            params.texture_width,
            params.texture_height
        );

        Ok(Self {
            texture,
            material: None,
            glyphs: GlyphTable::from_glyphs(&params.glyphs),
            texture_width: params.texture_width,
            texture_height: params.texture_height,
            shadow_x: params.shadow_x,
            shadow_y: params.shadow_y,
            max_ascent: params.max_ascent,
            max_descent: params.max_descent,
        })
    }

    /// Rebuild glyphs and atlas in place, keeping texture handle and material
    pub fn replace(&mut self, backend: &mut dyn GraphicsBackend, params: &FontMapParams) -> FontResult<()> {
        backend.set_texture(self.texture, &params.texture_params())?;

        self.glyphs.rebuild(&params.glyphs);
        self.texture_width = params.texture_width;
        self.texture_height = params.texture_height;
        self.shadow_x = params.shadow_x;
        self.shadow_y = params.shadow_y;
        self.max_ascent = params.max_ascent;
        self.max_descent = params.max_descent;

        log::debug!("Replaced font map: {} glyphs", self.glyphs.len());
        Ok(())
    }

    /// Release the atlas texture
    pub fn delete(self, backend: &mut dyn GraphicsBackend) {
        backend.delete_texture(self.texture);
    }

    /// Atlas texture handle
    pub const fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Material used to draw this font
    pub const fn material(&self) -> Option<MaterialHandle> {
        self.material
    }

    /// Set the material used to draw this font
    pub fn set_material(&mut self, material: MaterialHandle) {
        self.material = Some(material);
    }

    /// Glyph table
    pub const fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    /// Glyph for `character`, or the `~` fallback glyph
    pub fn glyph(&self, character: u32) -> Option<&Glyph> {
        self.glyphs.get_or_fallback(character)
    }

    /// Atlas dimensions
    pub const fn texture_size(&self) -> (u32, u32) {
        (self.texture_width, self.texture_height)
    }

    /// Whether the atlas has a non-zero area
    pub const fn has_atlas(&self) -> bool {
        self.texture_width > 0 && self.texture_height > 0
    }

    /// Reciprocal atlas dimensions, used to turn atlas pixels into UVs
    pub fn texture_size_recip(&self) -> Vec2 {
        Vec2::new(
            1.0 / self.texture_width.max(1) as f32,
            1.0 / self.texture_height.max(1) as f32,
        )
    }

    /// Shadow offset
    pub fn shadow_offset(&self) -> Vec2 {
        Vec2::new(self.shadow_x, self.shadow_y)
    }

    /// Largest ascent of any glyph
    pub const fn max_ascent(&self) -> f32 {
        self.max_ascent
    }

    /// Largest descent of any glyph
    pub const fn max_descent(&self) -> f32 {
        self.max_descent
    }

    /// Distance between consecutive baselines
    pub fn line_height(&self) -> f32 {
        self.max_ascent + self.max_descent
    }
}

/// Registry of font maps with stable handles
#[derive(Debug, Default)]
pub struct FontMaps {
    maps: HandleMap<FontMapHandle, FontMap>,
}

impl FontMaps {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a font map and return its handle
    pub fn create(&mut self, backend: &mut dyn GraphicsBackend, params: &FontMapParams) -> FontResult<FontMapHandle> {
        let font_map = FontMap::new(backend, params)?;
        Ok(self.maps.insert(font_map))
    }

    /// Replace a font map's glyphs and atlas, keeping its handle
    pub fn replace(
        &mut self,
        handle: FontMapHandle,
        backend: &mut dyn GraphicsBackend,
        params: &FontMapParams,
    ) -> FontResult<()> {
        self.maps
            .get_mut(handle)
            .ok_or(FontError::UnknownFontMap(handle))?
            .replace(backend, params)
    }

    /// Delete a font map and release its atlas
    pub fn delete(&mut self, handle: FontMapHandle, backend: &mut dyn GraphicsBackend) -> FontResult<()> {
        let font_map = self.maps.remove(handle).ok_or(FontError::UnknownFontMap(handle))?;
        font_map.delete(backend);
        Ok(())
    }

    /// Look up a font map
    pub fn get(&self, handle: FontMapHandle) -> Option<&FontMap> {
        self.maps.get(handle)
    }

    /// Look up a font map mutably
    pub fn get_mut(&mut self, handle: FontMapHandle) -> Option<&mut FontMap> {
        self.maps.get_mut(handle)
    }

    /// Number of live font maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use crate::render::systems::text::glyph::FALLBACK_CHARACTER;
    use approx::assert_relative_eq;

    fn params(glyphs: Vec<Glyph>, width: u32, height: u32) -> FontMapParams {
        FontMapParams {
            glyphs,
            texture_width: width,
            texture_height: height,
            texture_data: vec![0; (width * height * 3) as usize],
            shadow_x: 1.0,
            shadow_y: -1.0,
            max_ascent: 8.0,
            max_descent: 2.0,
        }
    }

    #[test]
    fn test_create_uploads_linear_rgb_atlas() {
        let mut backend = HeadlessBackend::new();
        let font_map = FontMap::new(&mut backend, &params(vec![Glyph::new(65, 10.0, 12.0)], 64, 32)).unwrap();

        let texture = backend.texture(font_map.texture()).unwrap();
        assert_eq!(texture.format, TextureFormat::Rgb);
        assert_eq!((texture.width, texture.height), (64, 32));
        assert_eq!(texture.min_filter, TextureFilter::Linear);
        assert_eq!(texture.mag_filter, TextureFilter::Linear);

        assert_eq!(font_map.glyphs().len(), 1);
        assert_relative_eq!(font_map.line_height(), 10.0);
        assert_relative_eq!(font_map.texture_size_recip().x, 1.0 / 64.0);
        assert_relative_eq!(font_map.texture_size_recip().y, 1.0 / 32.0);
        assert_relative_eq!(font_map.shadow_offset(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_replace_keeps_handle_and_texture() {
        let mut backend = HeadlessBackend::new();
        let mut fonts = FontMaps::new();
        let handle = fonts.create(&mut backend, &params(vec![Glyph::new(65, 10.0, 12.0)], 16, 16)).unwrap();
        fonts.get_mut(handle).unwrap().set_material(MaterialHandle(7));
        let texture = fonts.get(handle).unwrap().texture();

        let reloaded = params(vec![Glyph::new(66, 5.0, 6.0), Glyph::new(FALLBACK_CHARACTER, 4.0, 5.0)], 32, 8);
        fonts.replace(handle, &mut backend, &reloaded).unwrap();

        let font_map = fonts.get(handle).unwrap();
        assert_eq!(font_map.texture(), texture);
        assert_eq!(font_map.material(), Some(MaterialHandle(7)));
        assert_eq!(font_map.texture_size(), (32, 8));
        assert!(font_map.glyphs().get(65).is_none());
        assert_eq!(font_map.glyph(65).unwrap().character, FALLBACK_CHARACTER);
        assert_eq!(backend.texture(texture).unwrap().width, 32);
        assert_eq!(backend.texture_count(), 1);
    }

    #[test]
    fn test_delete_releases_texture() {
        let mut backend = HeadlessBackend::new();
        let mut fonts = FontMaps::new();
        let handle = fonts.create(&mut backend, &params(Vec::new(), 4, 4)).unwrap();

        fonts.delete(handle, &mut backend).unwrap();
        assert_eq!(backend.texture_count(), 0);
        assert!(fonts.get(handle).is_none());
        assert!(matches!(
            fonts.replace(handle, &mut backend, &FontMapParams::default()),
            Err(FontError::UnknownFontMap(_))
        ));
    }

    #[test]
    fn test_empty_font_map_is_accepted() {
        let mut backend = HeadlessBackend::new();
        let font_map = FontMap::new(&mut backend, &FontMapParams::default()).unwrap();
        assert!(font_map.glyphs().is_empty());
        assert!(!font_map.has_atlas());
        assert!(font_map.glyph(65).is_none());
    }

    #[test]
    fn test_params_from_ron_description() {
        let description = r"(
            glyphs: [(character: 65, width: 10.0, advance: 12.0, ascent: 8.0, descent: 2.0)],
            texture_width: 128,
            texture_height: 64,
            max_ascent: 8.0,
            max_descent: 2.0,
        )";
        let params = FontMapParams::parse("font.ron", description).unwrap();
        assert_eq!(params.glyphs.len(), 1);
        assert_eq!(params.glyphs[0].character, 65);
        assert_relative_eq!(params.glyphs[0].left_bearing, 0.0);
        assert_eq!(params.texture_width, 128);
    }
}
