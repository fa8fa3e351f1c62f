use std::path::Path;

use anyhow::{Result, bail};
use hw_core::clock::AnimationClock;
use hw_core::config::AnimationConfig;
use hw_core::frame::{Frame, FrameEvaluator};
use hw_core::traits::DrawSink;
use hw_export::canvas::{Canvas, CanvasSink, GlyphAtlas};
use hw_export::font::find_font;
use hw_export::muxer::Mp4Muxer;
use hw_export::recording::Recorder;

/// Taille du texte sur le canvas, en pixels.
pub const FONT_PX: f32 = 48.0;

/// Paramètres de l'export offline.
pub struct ExportOptions<'a> {
    /// Output MP4 path.
    pub output: &'a Path,
    /// Length of the video in seconds.
    pub duration: f64,
    /// Canvas size in pixels (width, height).
    pub canvas: (u32, u32),
    /// Explicit font; `None` searches the usual CJK fonts.
    pub font: Option<&'a Path>,
}

/// Number of frames for `duration` seconds at `fps`.
///
/// # Errors
/// Returns an error if `duration` is negative or not finite.
pub fn frame_count(duration: f64, fps: u32) -> Result<u64> {
    if !duration.is_finite() || duration < 0.0 {
        bail!("Durée invalide : {duration}");
    }
    Ok((duration * f64::from(fps)).round() as u64)
}

/// Render the animation offline on a fixed clock and encode it as MP4.
///
/// Frames are also pushed to `recorder` when given. Deterministic for a
/// seeded evaluator.
///
/// # Errors
/// Returns an error if no font is usable, ffmpeg fails or the duration is invalid.
pub fn run_export(
    config: &AnimationConfig,
    mut evaluator: FrameEvaluator,
    mut recorder: Option<&mut Recorder>,
    opts: &ExportOptions,
) -> Result<()> {
    let total = frame_count(opts.duration, config.target_fps)?;
    let font_path = find_font(opts.font)?;
    let mut atlas = GlyphAtlas::from_file(&font_path, FONT_PX)?;
    let (width, height) = opts.canvas;
    let mut canvas = Canvas::new(width, height);
    let mut muxer = Mp4Muxer::new(opts.output, width, height, config.target_fps)?;

    let lines = config.canvas_lines();
    let mut clock = AnimationClock::fixed(config.target_fps);
    let mut frame = Frame::default();
    let mut skipped = 0usize;

    log::info!("Rendu de {total} frames ({}s)...", opts.duration);
    for _ in 0..total {
        evaluator.evaluate_into(
            clock.now_secs(),
            canvas.dimensions(),
            &lines,
            &atlas,
            &mut frame,
        );
        {
            let mut sink = CanvasSink::new(&mut canvas, &mut atlas, config.colors);
            sink.render(&frame);
            skipped += sink.skipped();
        }
        muxer.write_frame(&canvas)?;
        if let Some(rec) = recorder.as_deref_mut() {
            rec.push(&frame, &lines);
        }
        clock.advance();
    }
    if skipped > 0 {
        log::warn!("{skipped} glyphes absents de la police {}", font_path.display());
    }
    muxer.finish()
}
