use hw_core::color::ColorScheme;
use hw_core::frame::DrawInstruction;
use hw_core::traits::DrawSink;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

/// Écrit les instructions de dessin directement dans un `ratatui::Buffer`.
///
/// Pas de widget ratatui : écriture directe, cellule par cellule. Les
/// caractères hors de `area` sont ignorés silencieusement.
///
/// # Example
/// ```
/// use hw_core::color::ColorScheme;
/// use hw_core::frame::DrawInstruction;
/// use hw_core::traits::DrawSink;
/// use hw_render::canvas::TerminalSink;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 0, 10, 3);
/// let mut buf = Buffer::empty(area);
/// let mut sink = TerminalSink::new(&mut buf, area, ColorScheme::Rainbow);
/// sink.draw(&DrawInstruction { ch: 'H', row: 1, col: 2, color: 1, line: 0 });
/// assert_eq!(buf[(2, 1)].symbol(), "H");
/// ```
pub struct TerminalSink<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    scheme: ColorScheme,
    skipped: usize,
}

impl<'a> TerminalSink<'a> {
    /// Sink writing into `area` of `buf`, coloring through `scheme`.
    #[must_use]
    pub fn new(buf: &'a mut Buffer, area: Rect, scheme: ColorScheme) -> Self {
        Self {
            buf,
            area,
            scheme,
            skipped: 0,
        }
    }

    /// Characters dropped since the last `begin_frame`.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn style_for(&self, color: u32) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        match self.scheme.rgb(color) {
            Some((r, g, b)) => style.fg(Color::Rgb(r, g, b)),
            None => style,
        }
    }
}

impl DrawSink for TerminalSink<'_> {
    fn begin_frame(&mut self, _timestamp: f64) {
        self.skipped = 0;
    }

    fn draw(&mut self, instruction: &DrawInstruction) {
        let (Ok(dx), Ok(dy)) = (
            u16::try_from(instruction.col),
            u16::try_from(instruction.row),
        ) else {
            self.skipped += 1;
            return;
        };
        if dx >= self.area.width || dy >= self.area.height || instruction.ch.is_control() {
            self.skipped += 1;
            return;
        }

        let x = self.area.x + dx;
        let y = self.area.y + dy;
        let style = self.style_for(instruction.color);
        let mut utf8 = [0u8; 4];
        let symbol = instruction.ch.encode_utf8(&mut utf8);
        // Wide glyphs occupy two cells; set_stringn clips them at the right edge.
        let room = usize::from(self.area.right() - x);
        self.buf.set_stringn(x, y, &*symbol, room, style);
    }

    fn end_frame(&mut self) {
        if self.skipped > 0 {
            log::trace!("{} caractères ignorés (hors zone)", self.skipped);
        }
    }
}
