use std::time::Instant;

/// Horloge d'animation.
///
/// `Realtime` pour la session interactive (temps mural écoulé depuis le
/// démarrage), `Fixed` pour l'export offline (`frame / fps`, reproductible).
///
/// # Example
/// ```
/// use hw_core::clock::AnimationClock;
/// let mut clock = AnimationClock::fixed(50);
/// clock.advance();
/// assert!((clock.now_secs() - 0.02).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub enum AnimationClock {
    /// Elapsed wall-clock time since `start`.
    Realtime {
        /// Instant the animation started.
        start: Instant,
    },
    /// Deterministic stepping at a fixed frame rate.
    Fixed {
        /// Frames per second, never zero.
        fps: u32,
        /// Index of the current frame.
        frame: u64,
    },
}

impl AnimationClock {
    /// Start a wall-clock timer now.
    #[must_use]
    pub fn realtime() -> Self {
        Self::Realtime {
            start: Instant::now(),
        }
    }

    /// Fixed-step clock at frame 0.
    #[must_use]
    pub fn fixed(fps: u32) -> Self {
        Self::Fixed {
            fps: fps.max(1),
            frame: 0,
        }
    }

    /// Animation time in seconds.
    #[must_use]
    pub fn now_secs(&self) -> f64 {
        match self {
            Self::Realtime { start } => start.elapsed().as_secs_f64(),
            Self::Fixed { fps, frame } => *frame as f64 / f64::from(*fps),
        }
    }

    /// Step to the next frame. No-op on a realtime clock.
    pub fn advance(&mut self) {
        if let Self::Fixed { frame, .. } = self {
            *frame += 1;
        }
    }
}
