use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// Tracks the session-wide average alongside the sliding window, for the
/// shutdown summary.
///
/// # Example
/// ```
/// use hw_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(60);
/// counter.tick();
/// assert_eq!(counter.total_frames(), 1);
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    /// Timestamps des dernières N frames.
    timestamps: VecDeque<Instant>,
    /// Taille de la fenêtre (nombre de frames à moyenner).
    window: usize,
    /// FPS calculé, mis à jour à chaque tick.
    fps: f64,
    /// Temps de la dernière frame en ms.
    pub frame_time_ms: f64,
    /// First tick of the session.
    first: Option<Instant>,
    /// Frames ticked since creation.
    frames: u64,
}

impl FpsCounter {
    /// Create a new FPS counter with the given averaging window size (min 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time_ms: 0.0,
            first: None,
            frames: 0,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        self.first.get_or_insert(now);
        if let Some(&last) = self.timestamps.back() {
            self.frame_time_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        }
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front()
            && self.timestamps.len() >= 2
        {
            let secs = now.duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frames ticked since creation.
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.frames
    }

    /// Average FPS between the first and the latest tick.
    #[must_use]
    pub fn session_fps(&self) -> f64 {
        match (self.first, self.timestamps.back()) {
            (Some(first), Some(&last)) if self.frames >= 2 => {
                let secs = last.duration_since(first).as_secs_f64();
                if secs > 0.0 {
                    (self.frames - 1) as f64 / secs
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}
