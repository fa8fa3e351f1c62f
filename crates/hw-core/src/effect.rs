use std::f64::consts::PI;

/// Catalogue fixe des effets de mouvement par caractère.
///
/// Résolu une seule fois depuis la configuration (`from_name`), jamais
/// comparé par chaîne dans la boucle de rendu.
///
/// # Example
/// ```
/// use hw_core::effect::EffectKind;
/// assert_eq!(EffectKind::from_name("spiral"), EffectKind::Spiral);
/// assert_eq!(EffectKind::from_name("tornado"), EffectKind::Static);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectKind {
    /// Vertical sine wave travelling along the line.
    #[default]
    Wave,
    /// Rectified sine: characters hop downward and land back on the baseline.
    Bounce,
    /// Each character orbits its anchor.
    Spiral,
    /// Random jitter from the injected random source.
    Shake,
    /// No offset. Fallback for unknown effect names.
    Static,
}

/// Names accepted on the command line and in config files.
pub const EFFECT_NAMES: &[&str] = &["wave", "bounce", "spiral", "shake"];

impl EffectKind {
    /// Resolve an effect name. Unknown names resolve to [`EffectKind::Static`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "wave" => Self::Wave,
            "bounce" => Self::Bounce,
            "spiral" => Self::Spiral,
            "shake" => Self::Shake,
            "static" | "none" => Self::Static,
            other => {
                log::warn!(
                    "Effet inconnu '{other}' (attendu : {}), aucun déplacement appliqué.",
                    EFFECT_NAMES.join(", ")
                );
                Self::Static
            }
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::Bounce => "bounce",
            Self::Spiral => "spiral",
            Self::Shake => "shake",
            Self::Static => "static",
        }
    }

    /// `false` only for effects that read the random source.
    #[must_use]
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Self::Shake)
    }
}

/// Positional offset of one character, in grid units (rows/cols or pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    /// Vertical offset, positive is down.
    pub dy: f64,
    /// Horizontal offset, positive is right.
    pub dx: f64,
}

impl Offset {
    /// No displacement.
    pub const ZERO: Self = Self { dy: 0.0, dx: 0.0 };
}

/// Parameters of one effect instance, shared read-only by every line using it.
///
/// # Example
/// ```
/// use hw_core::effect::{EffectConfig, EffectKind};
/// let config = EffectConfig::default();
/// assert_eq!(config.kind, EffectKind::Wave);
/// assert!((config.wave_scale - 2.0).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    /// Which effect function to apply.
    pub kind: EffectKind,
    /// Angular speed of the positional motion (rad/s).
    pub wave_speed: f64,
    /// Amplitude of the positional motion.
    pub wave_scale: f64,
    /// Angular speed of the character spacing pulse (rad/s).
    pub pulse_speed: f64,
    /// Amplitude of the character spacing pulse.
    pub pulse_scale: f64,
    /// Color steps per second.
    pub color_speed: f64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            kind: EffectKind::Wave,
            wave_speed: 2.0,
            wave_scale: 2.0,
            pulse_speed: 1.5,
            pulse_scale: 0.3,
            color_speed: 2.0,
        }
    }
}

impl EffectConfig {
    /// Offset of character `char_index` at `time` seconds.
    ///
    /// Pure for every kind except [`EffectKind::Shake`], which draws two
    /// values from `rng`. Output magnitude is not bounded here; callers clip.
    ///
    /// # Example
    /// ```
    /// use hw_core::effect::EffectConfig;
    /// let config = EffectConfig::default();
    /// let mut rng = fastrand::Rng::with_seed(0);
    /// let off = config.evaluate(0, 0.0, 0.5, &mut rng);
    /// assert!((off.dy - 2.0).abs() < 1e-9);
    /// assert_eq!(off.dx, 0.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn evaluate(
        &self,
        char_index: usize,
        time: f64,
        position_factor: f64,
        rng: &mut fastrand::Rng,
    ) -> Offset {
        let i = char_index as f64;
        match self.kind {
            EffectKind::Wave => Offset {
                dy: (time * self.wave_speed + i * 0.3 + position_factor * PI).sin()
                    * self.wave_scale,
                dx: 0.0,
            },
            EffectKind::Bounce => Offset {
                dy: (time * self.wave_speed + i * 0.2).sin().abs() * self.wave_scale,
                dx: 0.0,
            },
            EffectKind::Spiral => {
                let angle = time * self.wave_speed + i * 0.2;
                Offset {
                    dy: angle.sin() * self.wave_scale,
                    dx: angle.cos() * self.wave_scale,
                }
            }
            EffectKind::Shake => Offset {
                dy: (rng.f64() - 0.5) * self.wave_scale,
                dx: (rng.f64() - 0.5) * self.wave_scale,
            },
            EffectKind::Static => Offset::ZERO,
        }
    }

    /// Horizontal spacing multiplier between consecutive characters.
    ///
    /// `1.0` is plain spacing; oscillates by `±pulse_scale`.
    #[inline]
    #[must_use]
    pub fn pulse(&self, time: f64, position_factor: f64) -> f64 {
        (time * self.pulse_speed + position_factor * PI).sin() * self.pulse_scale + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: EffectKind) -> EffectConfig {
        EffectConfig {
            kind,
            ..EffectConfig::default()
        }
    }

    fn sample_inputs() -> impl Iterator<Item = (usize, f64, f64)> {
        (0..40).flat_map(|i| {
            (0..25).flat_map(move |t| {
                (0..=10).map(move |p| (i, f64::from(t) * 0.37, f64::from(p) / 10.0))
            })
        })
    }

    #[test]
    fn wave_is_bounded_and_vertical() {
        let c = config(EffectKind::Wave);
        let mut rng = fastrand::Rng::with_seed(1);
        for (i, t, p) in sample_inputs() {
            let off = c.evaluate(i, t, p, &mut rng);
            assert!(off.dy.abs() <= c.wave_scale + 1e-12, "dy={} at {i},{t},{p}", off.dy);
            assert_eq!(off.dx, 0.0);
        }
    }

    #[test]
    fn bounce_stays_between_baseline_and_scale() {
        let c = config(EffectKind::Bounce);
        let mut rng = fastrand::Rng::with_seed(1);
        for (i, t, p) in sample_inputs() {
            let off = c.evaluate(i, t, p, &mut rng);
            assert!(off.dy >= 0.0);
            assert!(off.dy <= c.wave_scale + 1e-12);
            assert_eq!(off.dx, 0.0);
        }
    }

    #[test]
    fn spiral_keeps_constant_radius() {
        let c = config(EffectKind::Spiral);
        let mut rng = fastrand::Rng::with_seed(1);
        for (i, t, p) in sample_inputs() {
            let off = c.evaluate(i, t, p, &mut rng);
            let radius = off.dy.hypot(off.dx);
            assert!((radius - c.wave_scale).abs() < 1e-9);
        }
    }

    #[test]
    fn spiral_ignores_position_factor() {
        let c = config(EffectKind::Spiral);
        let mut rng = fastrand::Rng::with_seed(1);
        let a = c.evaluate(3, 1.25, 0.0, &mut rng);
        let b = c.evaluate(3, 1.25, 0.9, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn shake_is_bounded_and_reproducible_with_seed() {
        let c = config(EffectKind::Shake);
        let mut a = fastrand::Rng::with_seed(42);
        let mut b = fastrand::Rng::with_seed(42);
        for (i, t, p) in sample_inputs().take(500) {
            let off_a = c.evaluate(i, t, p, &mut a);
            let off_b = c.evaluate(i, t, p, &mut b);
            assert_eq!(off_a, off_b);
            assert!(off_a.dy.abs() <= 0.5 * c.wave_scale);
            assert!(off_a.dx.abs() <= 0.5 * c.wave_scale);
        }
    }

    #[test]
    fn static_never_moves() {
        let c = config(EffectKind::Static);
        let mut rng = fastrand::Rng::with_seed(1);
        for (i, t, p) in sample_inputs().take(200) {
            assert_eq!(c.evaluate(i, t, p, &mut rng), Offset::ZERO);
        }
    }

    #[test]
    fn deterministic_kinds_do_not_consume_randomness() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut reference = fastrand::Rng::with_seed(7);
        for kind in [
            EffectKind::Wave,
            EffectKind::Bounce,
            EffectKind::Spiral,
            EffectKind::Static,
        ] {
            let _ = config(kind).evaluate(5, 2.0, 0.3, &mut rng);
        }
        assert_eq!(rng.u64(..), reference.u64(..));
    }

    #[test]
    fn pulse_at_origin() {
        let c = EffectConfig::default();
        assert!((c.pulse(0.0, 0.5) - 1.3).abs() < 1e-12);
        assert!((c.pulse(0.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn names_round_trip() {
        for name in EFFECT_NAMES {
            assert_eq!(EffectKind::from_name(name).name(), *name);
        }
        assert_eq!(EffectKind::from_name("  WAVE "), EffectKind::Wave);
        assert_eq!(EffectKind::from_name("ripple"), EffectKind::Static);
    }

    #[test]
    fn only_shake_is_random() {
        assert!(!EffectKind::Shake.is_deterministic());
        assert!(EffectKind::Wave.is_deterministic());
        assert!(EffectKind::Static.is_deterministic());
    }
}
