use std::sync::Arc;

use crate::color::{DEFAULT_PALETTE_SIZE, color_index};
use crate::effect::EffectConfig;
use crate::layout;
use crate::traits::GlyphMetrics;

/// Une ligne de texte animée. Immuable après construction.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use hw_core::effect::EffectConfig;
/// use hw_core::frame::Line;
/// let line = Line::new("Hi", 0, 1.7, Arc::new(EffectConfig::default()));
/// assert_eq!(line.position_factor(), 1.0);
/// assert_eq!(line.char_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Line {
    text: String,
    color_seed: u32,
    position_factor: f64,
    effect: Arc<EffectConfig>,
}

impl Line {
    /// Build a line. `position_factor` is clamped to [0, 1]; a non-finite
    /// factor centers the line.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        color_seed: u32,
        position_factor: f64,
        effect: Arc<EffectConfig>,
    ) -> Self {
        let position_factor = if position_factor.is_finite() {
            position_factor.clamp(0.0, 1.0)
        } else {
            0.5
        };
        Self {
            text: text.into(),
            color_seed,
            position_factor,
            effect,
        }
    }

    /// Text of the line.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Starting point in the color cycle.
    #[must_use]
    pub fn color_seed(&self) -> u32 {
        self.color_seed
    }

    /// Relative vertical placement in [0, 1].
    #[must_use]
    pub fn position_factor(&self) -> f64 {
        self.position_factor
    }

    /// Effect shared with the other lines of the session.
    #[must_use]
    pub fn effect(&self) -> &EffectConfig {
        &self.effect
    }

    /// Number of code points.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Surface dimensions: cells for the terminal, pixels for the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Rows (terminal) or height in pixels (canvas).
    pub rows: u32,
    /// Columns (terminal) or width in pixels (canvas).
    pub cols: u32,
}

impl Dimensions {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

/// Placement final d'un caractère pour une frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawInstruction {
    /// Character to draw.
    pub ch: char,
    /// Row (or pixel y), always `< rows - 1`.
    pub row: u32,
    /// Column (or pixel x), always `< cols - glyph width`.
    pub col: u32,
    /// 1-based color index from the color cycler.
    pub color: u32,
    /// Index of the source line in the evaluated slice.
    pub line: usize,
}

/// Toutes les instructions de dessin d'un instant de l'animation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Animation time in seconds.
    pub timestamp: f64,
    /// Instructions in line order, then character order.
    pub instructions: Vec<DrawInstruction>,
}

impl Frame {
    /// Instructions belonging to line `line`.
    pub fn for_line(&self, line: usize) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions.iter().filter(move |i| i.line == line)
    }
}

/// Évaluateur de frames.
///
/// Sans état entre deux appels, à l'exception de la source aléatoire
/// injectée qui n'est lue que par l'effet Shake.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use hw_core::effect::EffectConfig;
/// use hw_core::frame::{Dimensions, FrameEvaluator, Line};
/// use hw_core::traits::CellMetrics;
///
/// let lines = vec![Line::new("Hi", 0, 0.5, Arc::new(EffectConfig::default()))];
/// let mut evaluator = FrameEvaluator::seeded(7);
/// let frame = evaluator.evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
/// assert_eq!((frame.instructions[0].row, frame.instructions[0].col), (14, 39));
/// ```
#[derive(Clone, Debug)]
pub struct FrameEvaluator {
    rng: fastrand::Rng,
    palette_size: u32,
}

impl Default for FrameEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEvaluator {
    /// Evaluator with an entropy-seeded random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Evaluator with a pinned seed: Shake becomes reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }

    /// Override the color cycle length (default 3).
    #[must_use]
    pub fn with_palette_size(mut self, palette_size: u32) -> Self {
        self.palette_size = palette_size.max(1);
        self
    }

    /// Evaluate one frame into a fresh [`Frame`].
    pub fn evaluate(
        &mut self,
        time: f64,
        dims: Dimensions,
        lines: &[Line],
        metrics: &dyn GlyphMetrics,
    ) -> Frame {
        let mut frame = Frame::default();
        self.evaluate_into(time, dims, lines, metrics, &mut frame);
        frame
    }

    /// Evaluate one frame, reusing `frame`'s instruction buffer.
    ///
    /// Characters whose position falls outside `[0, rows-1) × [0, cols-width)`
    /// are dropped for this frame. Never fails.
    pub fn evaluate_into(
        &mut self,
        time: f64,
        dims: Dimensions,
        lines: &[Line],
        metrics: &dyn GlyphMetrics,
        frame: &mut Frame,
    ) {
        frame.timestamp = time;
        frame.instructions.clear();

        let max_row = f64::from(dims.rows) - 1.0;
        let pulse_spacing = metrics.pulse_spacing();

        for (line_idx, line) in lines.iter().enumerate() {
            let anchor = layout::anchor(dims, line, metrics);
            let effect = line.effect();
            let pf = line.position_factor();
            let pulse = effect.pulse(time, pf);
            let mut pen = 0.0;

            for (i, ch) in line.text().chars().enumerate() {
                let offset = effect.evaluate(i, time, pf, &mut self.rng);
                let glyph_width = metrics.advance(ch);
                let advance = if pulse_spacing { i as f64 * pulse } else { pen };
                pen += glyph_width;

                let row = (anchor.row as f64 + offset.dy).floor();
                let col = (anchor.col as f64 + advance + offset.dx).floor();
                if !within(row, max_row) || !within(col, f64::from(dims.cols) - glyph_width) {
                    continue;
                }

                frame.instructions.push(DrawInstruction {
                    ch,
                    row: row as u32,
                    col: col as u32,
                    color: color_index(
                        time,
                        i,
                        line.color_seed(),
                        effect.color_speed,
                        self.palette_size,
                    ),
                    line: line_idx,
                });
            }
        }

        log::trace!(
            "frame t={time:.3}s : {} glyphes visibles",
            frame.instructions.len()
        );
    }
}

/// `0 <= v < upper`, false for NaN.
#[inline]
fn within(v: f64, upper: f64) -> bool {
    v >= 0.0 && v < upper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::traits::CellMetrics;

    fn effect(kind: EffectKind) -> Arc<EffectConfig> {
        Arc::new(EffectConfig {
            kind,
            ..EffectConfig::default()
        })
    }

    fn hi_line() -> Vec<Line> {
        vec![Line::new("Hi", 0, 0.5, effect(EffectKind::Wave))]
    }

    struct Proportional;

    impl GlyphMetrics for Proportional {
        fn advance(&self, ch: char) -> f64 {
            if ch.is_ascii() { 10.0 } else { 20.0 }
        }
    }

    #[test]
    fn hi_scenario_matches_formula() {
        let mut ev = FrameEvaluator::seeded(0);
        let frame = ev.evaluate(0.0, Dimensions::new(24, 80), &hi_line(), &CellMetrics);
        assert_eq!(frame.instructions.len(), 2);

        let h = frame.instructions[0];
        assert_eq!((h.ch, h.row, h.col), ('H', 14, 39));

        let i = frame.instructions[1];
        let dy = (0.3 + 0.5 * std::f64::consts::PI).sin() * 2.0;
        assert_eq!(i.ch, 'i');
        assert_eq!(i.row, (12.0 + dy).floor() as u32);
        assert_eq!(i.row, 13);
        assert_eq!(i.col, 40);
    }

    #[test]
    fn colors_follow_the_cycler() {
        let lines = vec![Line::new("abcd", 4, 0.5, effect(EffectKind::Static))];
        let mut ev = FrameEvaluator::seeded(0);
        let frame = ev.evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
        let colors: Vec<u32> = frame.instructions.iter().map(|i| i.color).collect();
        // ((i + 4) % 3) + 1 + 1
        assert_eq!(colors, vec![3, 4, 2, 3]);
    }

    #[test]
    fn evaluation_is_idempotent_for_deterministic_effects() {
        let dims = Dimensions::new(30, 100);
        for kind in [EffectKind::Wave, EffectKind::Bounce, EffectKind::Spiral] {
            let lines = vec![
                Line::new("Hello, World!", 0, 0.2, effect(kind)),
                Line::new("안녕하세요, 세상!", 2, 0.5, effect(kind)),
            ];
            let mut a = FrameEvaluator::seeded(1);
            let mut b = FrameEvaluator::seeded(99);
            for step in 0..20 {
                let t = f64::from(step) * 0.173;
                let first = a.evaluate(t, dims, &lines, &CellMetrics);
                let second = a.evaluate(t, dims, &lines, &CellMetrics);
                assert_eq!(first, second);
                assert_eq!(first, b.evaluate(t, dims, &lines, &CellMetrics));
            }
        }
    }

    #[test]
    fn shake_is_reproducible_with_same_seed() {
        let lines = vec![Line::new("shaky text", 1, 0.5, effect(EffectKind::Shake))];
        let dims = Dimensions::new(24, 80);
        let mut a = FrameEvaluator::seeded(1234);
        let mut b = FrameEvaluator::seeded(1234);
        for step in 0..10 {
            let t = f64::from(step) / 60.0;
            assert_eq!(
                a.evaluate(t, dims, &lines, &CellMetrics),
                b.evaluate(t, dims, &lines, &CellMetrics)
            );
        }
    }

    #[test]
    fn out_of_bounds_characters_are_dropped() {
        let dims = Dimensions::new(24, 80);
        for step in 0..200 {
            let t = f64::from(step) * 0.05;
            let lines = vec![
                Line::new("top edge", 0, 0.0, effect(EffectKind::Spiral)),
                Line::new("bottom edge", 1, 1.0, effect(EffectKind::Wave)),
                Line::new("x".repeat(120), 2, 0.5, effect(EffectKind::Wave)),
            ];
            let frame = FrameEvaluator::seeded(3).evaluate(t, dims, &lines, &CellMetrics);
            for instr in &frame.instructions {
                assert!(instr.row < dims.rows - 1, "row {}", instr.row);
                assert!(instr.col < dims.cols - 1, "col {}", instr.col);
            }
        }
    }

    #[test]
    fn line_wider_than_screen_is_clipped_not_rejected() {
        let lines = vec![Line::new("y".repeat(200), 0, 0.5, effect(EffectKind::Static))];
        let frame =
            FrameEvaluator::seeded(0).evaluate(0.0, Dimensions::new(10, 40), &lines, &CellMetrics);
        assert!(!frame.instructions.is_empty());
        assert!(frame.instructions.len() < 200);
    }

    #[test]
    fn tiny_surface_yields_empty_frame() {
        let frame = FrameEvaluator::seeded(0).evaluate(
            1.0,
            Dimensions::new(1, 1),
            &hi_line(),
            &CellMetrics,
        );
        assert!(frame.instructions.is_empty());
        let frame = FrameEvaluator::seeded(0).evaluate(
            1.0,
            Dimensions::new(0, 0),
            &hi_line(),
            &CellMetrics,
        );
        assert!(frame.instructions.is_empty());
    }

    #[test]
    fn non_finite_effect_parameters_drop_characters() {
        let broken = Arc::new(EffectConfig {
            wave_scale: f64::NAN,
            ..EffectConfig::default()
        });
        let lines = vec![Line::new("nan", 0, 0.5, broken)];
        let frame =
            FrameEvaluator::seeded(0).evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
        assert!(frame.instructions.is_empty());
    }

    #[test]
    fn measured_metrics_advance_by_glyph_width_and_ignore_pulse() {
        let lines = vec![Line::new("ab가", 0, 0.5, effect(EffectKind::Static))];
        let dims = Dimensions::new(800, 1200);
        let frame = FrameEvaluator::seeded(0).evaluate(0.7, dims, &lines, &Proportional);
        let cols: Vec<u32> = frame.instructions.iter().map(|i| i.col).collect();
        // total width 40 → anchor col 600 - 20
        assert_eq!(cols, vec![580, 590, 600]);
        assert!(frame.instructions.iter().all(|i| i.row == 400));
    }

    #[test]
    fn instructions_keep_line_order() {
        let lines = vec![
            Line::new("one", 0, 0.25, effect(EffectKind::Static)),
            Line::new("two", 1, 0.75, effect(EffectKind::Static)),
        ];
        let frame =
            FrameEvaluator::seeded(0).evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
        assert_eq!(frame.for_line(0).count(), 3);
        assert_eq!(frame.for_line(1).map(|i| i.ch).collect::<String>(), "two");
        assert!(frame.instructions.windows(2).all(|w| w[0].line <= w[1].line));
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut ev = FrameEvaluator::seeded(0);
        let mut frame = Frame::default();
        ev.evaluate_into(0.0, Dimensions::new(24, 80), &hi_line(), &CellMetrics, &mut frame);
        ev.evaluate_into(0.5, Dimensions::new(24, 80), &hi_line(), &CellMetrics, &mut frame);
        assert_eq!(frame.instructions.len(), 2);
        assert!((frame.timestamp - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn huge_times_never_fail_the_frame() {
        let lines = vec![Line::new("Hi", 0, 0.5, effect(EffectKind::Static))];
        let mut ev = FrameEvaluator::seeded(0);
        let frame = ev.evaluate(1e19, Dimensions::new(24, 80), &lines, &CellMetrics);
        assert_eq!(frame.instructions.len(), 2);
        assert!(frame.instructions.iter().all(|i| (1..=5).contains(&i.color)));

        // infinite time: the pulse is NaN, glyphs are dropped, the frame still completes
        let frame = ev.evaluate(f64::INFINITY, Dimensions::new(24, 80), &lines, &CellMetrics);
        assert!(frame.instructions.iter().all(|i| (1..=5).contains(&i.color)));
    }

    #[test]
    fn palette_size_changes_cycle_length() {
        let lines = vec![Line::new("abcdef", 0, 0.5, effect(EffectKind::Static))];
        let frame = FrameEvaluator::seeded(0)
            .with_palette_size(6)
            .evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
        let colors: Vec<u32> = frame.instructions.iter().map(|i| i.color).collect();
        assert_eq!(colors, vec![1, 2, 3, 4, 5, 6]);
    }
}
