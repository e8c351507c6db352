//! Text measurement boundary used to auto-size text boxes.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use crate::doc::TextStyle;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.1;

/// Measures rendered text extents in canvas units.
pub trait TextMeasure {
    /// `(width, height)` of `text` laid out at `font_size`.
    fn measure(&self, text: &str, font_size: f64, style: &TextStyle) -> (f64, f64);
}

/// Font-agnostic estimate: a fixed advance per glyph, widened for bold.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub advance: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for ApproxMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_size: f64, style: &TextStyle) -> (f64, f64) {
        let advance = if style.bold { self.advance * 1.1 } else { self.advance };
        let lines: Vec<&str> = text.split('\n').collect();
        let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let width = widest as f64 * font_size * advance;
        let height = lines.len() as f64 * font_size * LINE_HEIGHT;
        (width, height)
    }
}
