use hw_core::color::ColorScheme;
use hw_core::effect::EffectKind;
use hw_core::frame::{Dimensions, Frame as AnimFrame};
use hw_core::traits::DrawSink;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::canvas::TerminalSink;
use crate::fps::FpsCounter;

/// Tout ce qu'il faut pour dessiner une frame terminal.
pub struct DrawContext<'a> {
    /// Evaluated animation frame.
    pub anim: &'a AnimFrame,
    /// Active palette.
    pub scheme: ColorScheme,
    /// Active effect, shown in the status line.
    pub effect: EffectKind,
    /// FPS counter; `Some` shows the status line on the bottom row.
    pub fps: Option<&'a FpsCounter>,
}

/// Grid dimensions of a terminal area.
///
/// # Example
/// ```
/// use hw_render::ui::dimensions;
/// use ratatui::layout::Rect;
/// let dims = dimensions(Rect::new(0, 0, 80, 24));
/// assert_eq!((dims.rows, dims.cols), (24, 80));
/// ```
#[must_use]
pub fn dimensions(area: Rect) -> Dimensions {
    Dimensions::new(u32::from(area.height), u32::from(area.width))
}

/// Draw the animation frame, then the optional status line.
///
/// The evaluator never emits on the last row (`row < rows - 1`), so the
/// status line never overlaps the text.
pub fn draw(frame: &mut Frame, ctx: &DrawContext) {
    let area = frame.area();
    {
        let mut sink = TerminalSink::new(frame.buffer_mut(), area, ctx.scheme);
        sink.render(ctx.anim);
    }

    if let Some(fps) = ctx.fps
        && area.height > 0
    {
        let status_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        frame.render_widget(status_line(ctx, fps), status_area);
    }
}

fn status_line<'a>(ctx: &DrawContext, fps: &FpsCounter) -> Paragraph<'a> {
    let dim = Style::default().fg(Color::DarkGray);
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {:.0} FPS", fps.fps()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(format!("  {:.1}ms", fps.frame_time_ms), dim),
        Span::styled(format!("  {}", ctx.effect.name()), dim),
        Span::styled(format!("  {}", ctx.scheme.name()), dim),
        Span::styled(format!("  {} glyphes", ctx.anim.instructions.len()), dim),
        Span::styled("  any key = quit ", dim),
    ]))
}
