//! Text layout engine
//!
//! Splits a string into lines that fit a pixel width. Layout knows nothing
//! about glyphs: width is obtained through a measurement callback, so the
//! same breaker works for any font map (or for tests measuring in columns).
//!
//! # Line Convention
//!
//! Lines are reported as codepoint counts. A line that ends at a soft break
//! (space) or a hard break (newline) includes that one breaking codepoint,
//! so consecutive line lengths always sum to the codepoints consumed. The
//! reported width of a line excludes the breaking codepoint.

/// Maximum number of lines produced for one string; the rest is dropped
pub const MAX_LINES: usize = 512;

/// Measures the pixel width of a run of text
pub type MeasureFn<'a> = dyn FnMut(&str) -> f32 + 'a;

/// Line breaking service
pub trait LineLayout {
    /// Break `text` into lines no wider than `max_width`
    ///
    /// Line lengths (in codepoints) are written to `lines`, which is cleared
    /// first; at most `max_lines` lines are produced. Returns the width of
    /// the widest line.
    fn layout(
        &self,
        text: &str,
        max_width: f32,
        max_lines: usize,
        measure: &mut MeasureFn<'_>,
        lines: &mut Vec<usize>,
    ) -> f32;
}

/// Greedy whitespace word wrapping
///
/// Breaks at spaces and newlines only. A single word wider than the limit
/// gets a line of its own rather than being split.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordWrapLayout;

/// One laid out line: codepoints and bytes consumed, and its width
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    chars: usize,
    bytes: usize,
    width: f32,
}

impl WordWrapLayout {
    /// Create the word wrapping layout
    pub const fn new() -> Self {
        Self
    }

    fn next_line(text: &str, max_width: f32, measure: &mut MeasureFn<'_>) -> LineSpan {
        let mut accepted: Option<LineSpan> = None;
        let mut chars = 0;

        for (byte, c) in text.char_indices() {
            if c == ' ' || c == '\n' {
                let width = measure(&text[..byte]);
                if let Some(span) = accepted {
                    if width > max_width {
                        return span;
                    }
                }

                let span = LineSpan {
                    chars: chars + 1,
                    bytes: byte + c.len_utf8(),
                    width,
                };
                if c == '\n' {
                    return span;
                }
                accepted = Some(span);
            }
            chars += 1;
        }

        let width = measure(text);
        match accepted {
            Some(span) if width > max_width => span,
            _ => LineSpan {
                chars,
                bytes: text.len(),
                width,
            },
        }
    }
}

impl LineLayout for WordWrapLayout {
    fn layout(
        &self,
        text: &str,
        max_width: f32,
        max_lines: usize,
        measure: &mut MeasureFn<'_>,
        lines: &mut Vec<usize>,
    ) -> f32 {
        lines.clear();
        let mut layout_width = 0.0f32;
        let mut rest = text;

        while !rest.is_empty() && lines.len() < max_lines {
            let span = Self::next_line(rest, max_width, measure);
            lines.push(span.chars);
            layout_width = layout_width.max(span.width);
            rest = &rest[span.bytes..];
        }

        layout_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One pixel per codepoint
    fn columns(text: &str) -> f32 {
        text.chars().count() as f32
    }

    fn layout(text: &str, max_width: f32) -> (Vec<usize>, f32) {
        let mut lines = Vec::new();
        let width = WordWrapLayout::new().layout(text, max_width, MAX_LINES, &mut columns, &mut lines);
        (lines, width)
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert_eq!(layout("", f32::MAX), (vec![], 0.0));
    }

    #[test]
    fn test_unbounded_width_is_single_line() {
        assert_eq!(layout("hello brave world", f32::MAX), (vec![17], 17.0));
    }

    #[test]
    fn test_wraps_at_spaces() {
        let (lines, width) = layout("hello brave world", 11.0);
        assert_eq!(lines, vec![12, 5]);
        assert_eq!(width, 11.0);
    }

    #[test]
    fn test_line_lengths_cover_every_codepoint() {
        let text = "the quick brown fox jumps over the lazy dog";
        let (lines, _) = layout(text, 9.0);
        assert_eq!(lines.iter().sum::<usize>(), text.chars().count());
        assert_eq!(lines, vec![10, 10, 6, 9, 8]);
    }

    #[test]
    fn test_newline_forces_break() {
        let (lines, width) = layout("ab\ncdef", f32::MAX);
        assert_eq!(lines, vec![3, 4]);
        assert_eq!(width, 4.0);
    }

    #[test]
    fn test_trailing_newline_does_not_open_empty_line() {
        assert_eq!(layout("ab\n", f32::MAX).0, vec![3]);
        assert_eq!(layout("ab\n\ncd", f32::MAX).0, vec![3, 1, 2]);
    }

    #[test]
    fn test_overlong_word_gets_own_line() {
        let (lines, width) = layout("a abcdefgh b", 4.0);
        assert_eq!(lines, vec![2, 9, 1]);
        assert_eq!(width, 8.0);
    }

    #[test]
    fn test_multibyte_text_counts_codepoints() {
        let (lines, _) = layout("héllo wörld", 5.0);
        assert_eq!(lines, vec![6, 5]);
    }

    #[test]
    fn test_line_cap_truncates() {
        let mut lines = Vec::new();
        WordWrapLayout::new().layout("a\nb\nc\nd", f32::MAX, 2, &mut columns, &mut lines);
        assert_eq!(lines, vec![2, 2]);
    }
}
