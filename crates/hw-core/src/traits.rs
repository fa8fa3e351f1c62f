use crate::frame::{DrawInstruction, Frame};

/// Mesure des glyphes pour une cible de rendu.
///
/// Implémenté par : `CellMetrics` (terminal), `GlyphAtlas` (canvas graphique).
///
/// # Example
/// ```
/// use hw_core::traits::{CellMetrics, GlyphMetrics};
/// assert_eq!(CellMetrics.advance('안'), 1.0);
/// assert!(CellMetrics.pulse_spacing());
/// ```
pub trait GlyphMetrics {
    /// Horizontal advance of `ch` in grid units (columns or pixels).
    fn advance(&self, ch: char) -> f64;

    /// `true` if consecutive characters are spaced by the effect's pulse
    /// multiplier instead of their measured advance.
    fn pulse_spacing(&self) -> bool {
        false
    }
}

/// Terminal metrics: one column per code point, pulse-modulated spacing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellMetrics;

impl GlyphMetrics for CellMetrics {
    #[inline]
    fn advance(&self, _ch: char) -> f64 {
        1.0
    }

    fn pulse_spacing(&self) -> bool {
        true
    }
}

/// Consomme les instructions de dessin d'une frame.
///
/// Fire-and-forget : un caractère qui ne peut pas être réalisé (hors zone,
/// glyphe absent) est ignoré par l'implémentation, jamais remonté.
///
/// # Example
/// ```
/// use hw_core::frame::{DrawInstruction, Frame};
/// use hw_core::traits::DrawSink;
///
/// struct Counter(usize);
/// impl DrawSink for Counter {
///     fn draw(&mut self, _instruction: &DrawInstruction) { self.0 += 1; }
/// }
///
/// let mut sink = Counter(0);
/// sink.render(&Frame::default());
/// assert_eq!(sink.0, 0);
/// ```
pub trait DrawSink {
    /// Called once before the first instruction of a frame.
    fn begin_frame(&mut self, _timestamp: f64) {}

    /// Place one character.
    fn draw(&mut self, instruction: &DrawInstruction);

    /// Called once after the last instruction of a frame.
    fn end_frame(&mut self) {}

    /// Feed a whole frame through the sink.
    fn render(&mut self, frame: &Frame) {
        self.begin_frame(frame.timestamp);
        for instruction in &frame.instructions {
            self.draw(instruction);
        }
        self.end_frame();
    }
}
