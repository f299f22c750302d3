//! Width-dependent text leaves.
//!
//! Text is the usual reason a container has to assign widths before it can
//! ask for heights: the number of wrapped lines, and so the preferred height,
//! depends on the width the text was given.
//!
//! Glyph widths are estimated from the font size; hosts with real shaping
//! plug in through [`crate::SizeProvider`] instead.

use combi_core::{Axis, SizeMetrics};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f64 = 0.55;

/// Baseline offset as a fraction of the font size.
const BASELINE_RATIO: f64 = 0.8;

/// Text measurement style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub font_size: f64,
    /// Line height as a multiplier (e.g., 1.5 = 150%)
    pub line_height: f64,
    /// Extra advance per character in pixels
    pub letter_spacing: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

impl TextStyle {
    fn char_width(&self) -> f64 {
        self.font_size * CHAR_WIDTH_RATIO + self.letter_spacing
    }

    fn line_extent(&self) -> f64 {
        self.font_size * self.line_height
    }

    fn word_width(&self, word: &str) -> f64 {
        word.chars().count() as f64 * self.char_width()
    }
}

/// Measured text block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Width of the widest line
    pub width: f64,
    /// Height of all lines
    pub height: f64,
    /// Baseline offset from top
    pub baseline: f64,
    /// Number of lines
    pub lines: u32,
}

/// Measure text, word-wrapping at `max_width` when it is positive.
///
/// Empty text still occupies one line.
pub fn measure_text(text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics {
    let space = style.char_width();
    let mut line_widths: Vec<f64> = Vec::new();
    let mut current = None::<f64>;

    for word in text.split_whitespace() {
        let width = style.word_width(word);
        current = Some(match (current, max_width) {
            (None, _) => width,
            (Some(used), Some(max)) if max > 0.0 && used + space + width > max => {
                line_widths.push(used);
                width
            }
            (Some(used), _) => used + space + width,
        });
    }
    line_widths.extend(current);

    let lines = line_widths.len().max(1) as u32;
    TextMetrics {
        width: line_widths.iter().copied().fold(0.0_f64, f64::max),
        height: lines as f64 * style.line_extent(),
        baseline: style.font_size * BASELINE_RATIO,
        lines,
    }
}

/// A run of text laid out as a single box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
    pub style: TextStyle,
}

impl TextContent {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self { text: text.into(), style }
    }

    /// Width of the widest word: the text cannot get narrower without
    /// breaking inside a word.
    pub fn min_width(&self) -> f64 {
        self.text
            .split_whitespace()
            .map(|word| self.style.word_width(word))
            .fold(0.0_f64, f64::max)
    }

    /// Layout metrics on an axis, given the width the text currently has.
    pub fn size_metrics(&self, axis: Axis, current_width: f64) -> SizeMetrics {
        match axis {
            Axis::Horizontal => {
                let single_line = measure_text(&self.text, &self.style, None);
                SizeMetrics::new(self.min_width(), single_line.width, 0.0)
            }
            Axis::Vertical => {
                let wrapped = measure_text(&self.text, &self.style, Some(current_width));
                SizeMetrics::fixed(wrapped.height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10px font: 5.5px per character, 12px per line.
    fn style() -> TextStyle {
        TextStyle {
            font_size: 10.0,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }

    #[test]
    fn test_measure_empty_text() {
        let metrics = measure_text("", &style(), None);
        assert!(metrics.width < 0.001);
        assert!((metrics.height - 12.0).abs() < 0.001);
        assert_eq!(metrics.lines, 1);
    }

    #[test]
    fn test_measure_single_line() {
        let metrics = measure_text("ab cd", &style(), None);
        assert!((metrics.width - 27.5).abs() < 0.001);
        assert_eq!(metrics.lines, 1);
        assert!((metrics.baseline - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_measure_wrapped_text() {
        // "ab cd" is 27.5 wide; at 20 it breaks after "ab".
        let metrics = measure_text("ab cd ef", &style(), Some(20.0));
        assert_eq!(metrics.lines, 3);
        assert!((metrics.width - 11.0).abs() < 0.001);
        assert!((metrics.height - 36.0).abs() < 0.001);

        let metrics = measure_text("ab cd ef", &style(), Some(30.0));
        assert_eq!(metrics.lines, 2);
    }

    #[test]
    fn test_zero_width_does_not_wrap() {
        let metrics = measure_text("ab cd ef", &style(), Some(0.0));
        assert_eq!(metrics.lines, 1);
    }

    #[test]
    fn test_text_content_metrics() {
        let content = TextContent::new("a bbb cc", style());
        let width = content.size_metrics(Axis::Horizontal, 0.0);
        assert!((width.min - 16.5).abs() < 0.001);
        assert!((width.preferred - 44.0).abs() < 0.001);

        let narrow = content.size_metrics(Axis::Vertical, 20.0);
        let wide = content.size_metrics(Axis::Vertical, 100.0);
        assert!((narrow.preferred - 36.0).abs() < 0.001);
        assert!((wide.preferred - 12.0).abs() < 0.001);
    }
}
