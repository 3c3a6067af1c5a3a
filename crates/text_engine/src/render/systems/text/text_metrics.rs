//! Text measurement against a font map
//!
//! `measure_line` is the width callback handed to the line layout service.
//! It measures ink extent rather than pen travel: the first glyph's left
//! bearing and the last glyph's right side bearing are not counted. When the
//! last glyph has no ink (typically a space) its full advance is counted
//! instead, so trailing spaces keep their width.

use super::font_map::FontMap;
use super::text_layout::{LineLayout, WordWrapLayout, MAX_LINES};

/// Size of a laid out string
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Width of the widest line
    pub width: f32,
    /// Font-wide maximum ascent
    pub max_ascent: f32,
    /// Font-wide maximum descent
    pub max_descent: f32,
}

/// Width of a single line of text
///
/// Advances are truncated to whole pixels, matching the pen steps taken
/// during vertex generation.
#[allow(clippy::float_cmp)]
pub fn measure_line(font_map: &FontMap, text: &str) -> f32 {
    let mut width = 0.0f32;
    let mut first = None;
    let mut last = None;

    for c in text.chars() {
        let Some(glyph) = font_map.glyph(c as u32) else {
            continue;
        };
        first.get_or_insert(glyph);
        last = Some(glyph);
        width += f32::from(glyph.advance as i16);
    }

    if let (Some(first), Some(last)) = (first, last) {
        width -= first.left_bearing + (last.advance - last.left_bearing - last.width);
        if last.width == 0.0 {
            width += last.advance;
        }
    }

    width
}

/// Wrap width actually used for a draw: unbounded unless line breaking is on
pub const fn effective_width(width: f32, line_break: bool) -> f32 {
    if line_break {
        width
    } else {
        f32::MAX
    }
}

/// Lay out `text` with `font_map` metrics, writing line lengths to `lines`
///
/// Returns the width of the widest line.
pub fn layout_lines(
    layout: &dyn LineLayout,
    font_map: &FontMap,
    text: &str,
    width: f32,
    line_break: bool,
    lines: &mut Vec<usize>,
) -> f32 {
    let mut measure = |line: &str| measure_line(font_map, line);
    layout.layout(text, effective_width(width, line_break), MAX_LINES, &mut measure, lines)
}

/// Measure `text` without drawing it, using the default word wrapping
pub fn get_text_metrics(font_map: &FontMap, text: &str, width: f32, line_break: bool) -> TextMetrics {
    get_text_metrics_with(&WordWrapLayout, font_map, text, width, line_break)
}

/// Measure `text` without drawing it, using a custom line layout
pub fn get_text_metrics_with(
    layout: &dyn LineLayout,
    font_map: &FontMap,
    text: &str,
    width: f32,
    line_break: bool,
) -> TextMetrics {
    let mut lines = Vec::new();
    TextMetrics {
        width: layout_lines(layout, font_map, text, width, line_break, &mut lines),
        max_ascent: font_map.max_ascent(),
        max_descent: font_map.max_descent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use crate::render::systems::text::font_map::FontMapParams;
    use crate::render::systems::text::glyph::{Glyph, FALLBACK_CHARACTER};
    use approx::assert_relative_eq;

    fn font_map(glyphs: Vec<Glyph>) -> FontMap {
        let mut backend = HeadlessBackend::new();
        let params = FontMapParams {
            glyphs,
            texture_width: 64,
            texture_height: 64,
            max_ascent: 8.0,
            max_descent: 2.0,
            ..Default::default()
        };
        FontMap::new(&mut backend, &params).unwrap()
    }

    fn letter_a() -> Glyph {
        Glyph::new('A' as u32, 10.0, 12.0).with_vertical(8.0, 2.0)
    }

    #[test]
    fn test_measure_excludes_trailing_side_bearing() {
        let font = font_map(vec![letter_a()]);
        assert_relative_eq!(measure_line(&font, "A"), 10.0);
        assert_relative_eq!(measure_line(&font, "AA"), 22.0);
    }

    #[test]
    fn test_measure_excludes_leading_bearing() {
        let font = font_map(vec![Glyph::new('B' as u32, 8.0, 12.0).with_left_bearing(2.0)]);
        // 24 - 2 - (12 - 2 - 8)
        assert_relative_eq!(measure_line(&font, "BB"), 20.0);
    }

    #[test]
    fn test_trailing_space_keeps_full_advance() {
        let font = font_map(vec![letter_a(), Glyph::new(' ' as u32, 0.0, 4.0)]);
        // 12 + 4 - 0 - (4 - 0 - 0) + 4
        assert_relative_eq!(measure_line(&font, "A "), 16.0);
    }

    #[test]
    fn test_advances_are_truncated() {
        let font = font_map(vec![Glyph::new('C' as u32, 5.0, 5.9)]);
        // 5 + 5 - 0 - (5.9 - 0 - 5)
        assert_relative_eq!(measure_line(&font, "CC"), 9.1, epsilon = 1e-5);
    }

    #[test]
    fn test_missing_glyphs_measure_as_fallback() {
        let font = font_map(vec![letter_a(), Glyph::new(FALLBACK_CHARACTER, 6.0, 7.0)]);
        assert_relative_eq!(measure_line(&font, "A?"), measure_line(&font, "A~"));
    }

    #[test]
    fn test_empty_measures_zero() {
        let font = font_map(vec![letter_a()]);
        assert_relative_eq!(measure_line(&font, ""), 0.0);
    }

    #[test]
    fn test_text_metrics_report_font_vertical_metrics() {
        let font = font_map(vec![letter_a()]);
        let metrics = get_text_metrics(&font, "AA", f32::MAX, false);
        assert_eq!(
            metrics,
            TextMetrics {
                width: 22.0,
                max_ascent: 8.0,
                max_descent: 2.0,
            }
        );
    }

    #[test]
    fn test_line_break_flag_controls_wrapping() {
        let font = font_map(vec![letter_a(), Glyph::new(' ' as u32, 0.0, 4.0)]);

        let wrapped = get_text_metrics(&font, "AA AA", 30.0, true);
        assert_relative_eq!(wrapped.width, 22.0);

        let unwrapped = get_text_metrics(&font, "AA AA", 30.0, false);
        // 12 + 12 + 4 + 12 + 12 - 0 - (12 - 0 - 10)
        assert_relative_eq!(unwrapped.width, 50.0);
    }
}
