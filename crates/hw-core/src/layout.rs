use crate::frame::{Dimensions, Line};
use crate::traits::GlyphMetrics;

/// Point d'ancrage d'une ligne (coin gauche de la ligne au repos).
///
/// May be negative when the line is wider than the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Baseline row (or pixel y).
    pub row: i64,
    /// Left column (or pixel x).
    pub col: i64,
}

/// Anchor of `line` on a surface of `dims`, horizontally centered.
///
/// `row = floor(rows · position_factor)`,
/// `col = floor(cols / 2) - floor(width / 2)` where `width` is the sum of
/// the glyph advances (the code point count on a terminal).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use hw_core::effect::EffectConfig;
/// use hw_core::frame::{Dimensions, Line};
/// use hw_core::layout::{anchor, Anchor};
/// use hw_core::traits::CellMetrics;
///
/// let line = Line::new("Hi", 0, 0.5, Arc::new(EffectConfig::default()));
/// assert_eq!(anchor(Dimensions::new(24, 80), &line, &CellMetrics), Anchor { row: 12, col: 39 });
/// ```
#[must_use]
pub fn anchor(dims: Dimensions, line: &Line, metrics: &dyn GlyphMetrics) -> Anchor {
    let width: f64 = line.text().chars().map(|ch| metrics.advance(ch)).sum();
    Anchor {
        row: (f64::from(dims.rows) * line.position_factor()).floor() as i64,
        col: i64::from(dims.cols / 2) - (width / 2.0).floor() as i64,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::effect::EffectConfig;
    use crate::traits::CellMetrics;

    fn line(text: &str, pf: f64) -> Line {
        Line::new(text, 0, pf, Arc::new(EffectConfig::default()))
    }

    #[test]
    fn odd_and_even_lengths_center() {
        let dims = Dimensions::new(24, 80);
        assert_eq!(anchor(dims, &line("abc", 0.0), &CellMetrics).col, 39);
        assert_eq!(anchor(dims, &line("abcd", 0.0), &CellMetrics).col, 38);
        assert_eq!(anchor(Dimensions::new(24, 81), &line("abcd", 0.0), &CellMetrics).col, 38);
    }

    #[test]
    fn counts_code_points_not_bytes() {
        let dims = Dimensions::new(24, 80);
        // 9 code points, 27 UTF-8 bytes
        let a = anchor(dims, &line("こんにちは、世界！", 0.8), &CellMetrics);
        assert_eq!(a, Anchor { row: 19, col: 36 });
    }

    #[test]
    fn row_follows_position_factor() {
        let dims = Dimensions::new(25, 80);
        assert_eq!(anchor(dims, &line("x", 0.0), &CellMetrics).row, 0);
        assert_eq!(anchor(dims, &line("x", 0.2), &CellMetrics).row, 5);
        assert_eq!(anchor(dims, &line("x", 1.0), &CellMetrics).row, 25);
    }

    #[test]
    fn wide_line_anchors_off_screen() {
        let a = anchor(Dimensions::new(10, 10), &line(&"z".repeat(30), 0.5), &CellMetrics);
        assert_eq!(a.col, -10);
    }

    #[test]
    fn empty_text_anchors_at_center() {
        let a = anchor(Dimensions::new(10, 40), &line("", 0.5), &CellMetrics);
        assert_eq!(a, Anchor { row: 5, col: 20 });
    }
}
