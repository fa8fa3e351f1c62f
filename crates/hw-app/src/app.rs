use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyEventKind};
use hw_core::clock::AnimationClock;
use hw_core::config::AnimationConfig;
use hw_core::frame::{Frame as AnimFrame, FrameEvaluator, Line};
use hw_core::traits::CellMetrics;
use hw_export::recording::Recorder;
use hw_render::fps::FpsCounter;
use hw_render::ui::{self, DrawContext};
use ratatui::backend::Backend;
use ratatui::{DefaultTerminal, Terminal};

/// État de la session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Animation en cours.
    Running,
    /// Fermeture demandée : la boucle s'arrête après la frame courante.
    Quitting,
}

/// Terminal ratatui restauré dans `Drop`, sur tous les chemins de sortie.
struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Session d'animation interactive dans le terminal.
pub struct Session {
    /// Current state.
    pub state: SessionState,
    config: AnimationConfig,
    lines: Vec<Line>,
    evaluator: FrameEvaluator,
    clock: AnimationClock,
    /// Frame pré-allouée, réutilisée à chaque tick.
    frame: AnimFrame,
    fps_counter: FpsCounter,
    show_fps: bool,
    recorder: Option<Recorder>,
}

impl Session {
    /// Build a session. `recorder` is `Some` when frames must be saved.
    #[must_use]
    pub fn new(
        config: AnimationConfig,
        evaluator: FrameEvaluator,
        recorder: Option<Recorder>,
        show_fps: bool,
    ) -> Self {
        let lines = config.lines();
        let fps_counter = FpsCounter::new(config.target_fps as usize);
        Self {
            state: SessionState::Running,
            config,
            lines,
            evaluator,
            clock: AnimationClock::realtime(),
            frame: AnimFrame::default(),
            fps_counter,
            show_fps,
            recorder,
        }
    }

    /// Take over the terminal, animate until a key is pressed, restore the
    /// terminal, then write the recording to `save` if one was requested.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails or the recording cannot be written.
    pub fn run_interactive(mut self, save: Option<&Path>) -> Result<()> {
        let result = TerminalGuard::new().and_then(|mut guard| self.run(&mut guard.terminal));
        self.finish(save)?;
        result
    }

    /// Main loop: pace to the target FPS, poll input, tick.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.config.target_fps));
        let mut last_frame = Instant::now();
        // première frame immédiate
        self.tick(terminal)?;

        while self.state == SessionState::Running {
            let now = Instant::now();
            let elapsed = now - last_frame;

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }
            self.tick(terminal)?;
        }
        Ok(())
    }

    /// One frame: evaluate at the clock's time, draw, count, record.
    ///
    /// Dimensions are read from the frame area each tick, so a resize is
    /// picked up on the next frame.
    ///
    /// # Errors
    /// Returns an error if drawing to the terminal fails.
    pub fn tick<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let time = self.clock.now_secs();
        terminal
            .draw(|f| {
                let dims = ui::dimensions(f.area());
                self.evaluator
                    .evaluate_into(time, dims, &self.lines, &CellMetrics, &mut self.frame);
                let ctx = DrawContext {
                    anim: &self.frame,
                    scheme: self.config.colors,
                    effect: self.config.effect,
                    fps: self.show_fps.then_some(&self.fps_counter),
                };
                ui::draw(f, &ctx);
            })
            .map_err(|e| anyhow!("Erreur de rendu terminal : {e}"))?;
        self.fps_counter.tick();

        if let Some(ref mut recorder) = self.recorder {
            recorder.push(&self.frame, &self.lines);
        }
        Ok(())
    }

    /// Any key press ends the session. Releases, resizes and mouse events
    /// are ignored.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
        {
            log::debug!("Touche {:?} : fin de session", key.code);
            self.state = SessionState::Quitting;
        }
    }

    /// Recorded frames, if recording.
    #[must_use]
    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.fps_counter.total_frames()
    }

    /// Flush the recording once and log the session summary.
    fn finish(&self, save: Option<&Path>) -> Result<()> {
        log::info!(
            "Session terminée : {} frames, {:.1} fps en moyenne",
            self.fps_counter.total_frames(),
            self.fps_counter.session_fps()
        );
        if let (Some(recorder), Some(path)) = (&self.recorder, save) {
            recorder.save(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use hw_core::effect::EffectKind;
    use ratatui::backend::TestBackend;

    use super::*;

    fn session(recording: bool) -> Session {
        let config = AnimationConfig {
            effect: EffectKind::Static,
            ..AnimationConfig::default()
        };
        Session::new(
            config,
            FrameEvaluator::seeded(1),
            recording.then(Recorder::new),
            true,
        )
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn tick_draws_and_records() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut session = session(true);
        session.tick(&mut terminal).unwrap();
        session.tick(&mut terminal).unwrap();

        assert_eq!(session.frames_rendered(), 2);
        let recorder = session.recorder().unwrap();
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.frames()[0].texts.len(), 5);

        // "Hello, World!" centered on row floor(24 * 0.2) = 4
        let first = &recorder.frames()[1].texts[0].positions[0];
        assert_eq!((first.ch, first.y), ('H', 4));
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(first.x as u16, 4)].symbol(), "H");
    }

    #[test]
    fn resize_is_picked_up_next_tick() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut session = session(true);
        session.tick(&mut terminal).unwrap();
        terminal.backend_mut().resize(40, 12);
        session.tick(&mut terminal).unwrap();

        let frames = session.recorder().unwrap().frames();
        assert!(frames[1].texts.iter().flat_map(|t| &t.positions).all(|p| p.y < 11 && p.x < 40));
    }

    #[test]
    fn without_recorder_nothing_is_kept() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut session = session(false);
        session.tick(&mut terminal).unwrap();
        assert!(session.recorder().is_none());
    }

    #[test]
    fn any_key_press_quits() {
        let mut session = session(false);
        session.handle_event(&Event::Resize(10, 10));
        session.handle_event(&key(KeyCode::Char('a'), KeyEventKind::Release));
        assert_eq!(session.state, SessionState::Running);
        session.handle_event(&key(KeyCode::Esc, KeyEventKind::Press));
        assert_eq!(session.state, SessionState::Quitting);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut session = session(false);
        session.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(session.state, SessionState::Quitting);
    }

    #[test]
    fn finish_saves_the_recording() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut session = session(true);
        session.tick(&mut terminal).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.json");
        session.finish(Some(&path)).unwrap();
        let loaded = hw_export::recording::load_recording(&path).unwrap();
        assert_eq!(loaded.len(), 1);
    }
}
