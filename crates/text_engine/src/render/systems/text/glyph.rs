//! Glyph metrics and per-font glyph lookup

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Codepoint substituted for characters missing from a font map (`~`)
pub const FALLBACK_CHARACTER: u32 = 126;

/// Metrics and atlas location of a single glyph
///
/// All metrics are in atlas pixels. `x`/`y` locate the glyph's pen origin in
/// the atlas; the ink box spans `left_bearing .. left_bearing + width`
/// horizontally and `-ascent .. +descent` vertically around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyph {
    /// Unicode codepoint
    pub character: u32,
    /// Ink width; zero for glyphs without ink such as space
    pub width: f32,
    /// Horizontal pen advance
    pub advance: f32,
    /// Distance from pen position to the left edge of the ink
    pub left_bearing: f32,
    /// Ink extent above the baseline
    pub ascent: f32,
    /// Ink extent below the baseline
    pub descent: f32,
    /// Atlas x position
    pub x: i32,
    /// Atlas y position
    pub y: i32,
}

impl Glyph {
    /// Glyph for `character` with the given ink width and advance, all other metrics zero
    pub const fn new(character: u32, width: f32, advance: f32) -> Self {
        Self {
            character,
            width,
            advance,
            left_bearing: 0.0,
            ascent: 0.0,
            descent: 0.0,
            x: 0,
            y: 0,
        }
    }

    /// Set ascent and descent
    #[must_use]
    pub const fn with_vertical(mut self, ascent: f32, descent: f32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    /// Set the left bearing
    #[must_use]
    pub const fn with_left_bearing(mut self, left_bearing: f32) -> Self {
        self.left_bearing = left_bearing;
        self
    }

    /// Set the atlas position
    #[must_use]
    pub const fn with_atlas_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Whether the glyph produces a visible quad
    pub fn has_ink(&self) -> bool {
        self.width > 0.0
    }
}

/// Codepoint to glyph lookup for one font map
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    glyphs: HashMap<u32, Glyph>,
}

impl GlyphTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a glyph list; later duplicates overwrite earlier ones
    pub fn from_glyphs(glyphs: &[Glyph]) -> Self {
        let mut table = Self::new();
        table.rebuild(glyphs);
        table
    }

    /// Replace every glyph in the table
    ///
    /// Capacity is reserved at 1.5x the glyph count to keep the load factor low.
    pub fn rebuild(&mut self, glyphs: &[Glyph]) {
        self.glyphs.clear();
        self.glyphs.reserve((3 * glyphs.len()) / 2);
        for glyph in glyphs {
            self.glyphs.insert(glyph.character, *glyph);
        }
    }

    /// Exact lookup
    pub fn get(&self, character: u32) -> Option<&Glyph> {
        self.glyphs.get(&character)
    }

    /// Lookup falling back to `FALLBACK_CHARACTER`
    ///
    /// Only `None` when the fallback glyph itself is missing.
    pub fn get_or_fallback(&self, character: u32) -> Option<&Glyph> {
        self.glyphs
            .get(&character)
            .or_else(|| self.glyphs.get(&FALLBACK_CHARACTER))
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the table holds no glyphs
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_duplicate_wins() {
        let table = GlyphTable::from_glyphs(&[
            Glyph::new('A' as u32, 10.0, 12.0),
            Glyph::new('A' as u32, 8.0, 9.0),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get('A' as u32).unwrap().advance, 9.0);
    }

    #[test]
    fn test_missing_glyph_uses_fallback() {
        let tilde = Glyph::new(FALLBACK_CHARACTER, 7.0, 8.0);
        let table = GlyphTable::from_glyphs(&[Glyph::new('A' as u32, 10.0, 12.0), tilde]);

        assert_eq!(table.get_or_fallback('Z' as u32), Some(&tilde));
        assert_eq!(table.get_or_fallback(0x1F600), Some(&tilde));
        assert_eq!(table.get_or_fallback('A' as u32).unwrap().width, 10.0);
    }

    #[test]
    fn test_missing_fallback_yields_none() {
        let table = GlyphTable::from_glyphs(&[Glyph::new('A' as u32, 10.0, 12.0)]);
        assert!(table.get_or_fallback('B' as u32).is_none());
    }

    #[test]
    fn test_rebuild_drops_old_glyphs() {
        let mut table = GlyphTable::from_glyphs(&[Glyph::new('A' as u32, 1.0, 1.0)]);
        table.rebuild(&[Glyph::new('B' as u32, 1.0, 1.0)]);
        assert!(table.get('A' as u32).is_none());
        assert!(table.get('B' as u32).is_some());
    }

    #[test]
    fn test_zero_width_glyph_has_no_ink() {
        assert!(!Glyph::new(' ' as u32, 0.0, 4.0).has_ink());
        assert!(Glyph::new('A' as u32, 10.0, 12.0).has_ink());
    }
}
