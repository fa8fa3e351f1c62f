use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::color::{ColorScheme, DEFAULT_PALETTE_SIZE};
use crate::effect::{EffectConfig, EffectKind};
use crate::error::CoreError;
use crate::frame::Line;

/// Pixels par unité d'effet sur le canvas graphique (une cellule terminal ≈ 5 px).
pub const CANVAS_PX_PER_UNIT: f64 = 5.0;

/// Échantillon multilingue affiché par défaut : (texte, position, graine couleur).
pub const DEFAULT_LINES: &[(&str, f64, u32)] = &[
    ("Hello, World!", 0.2, 0),
    ("Bonjour, le Monde!", 0.35, 1),
    ("안녕하세요, 세상!", 0.5, 2),
    ("¡Hola, Mundo!", 0.65, 3),
    ("こんにちは、世界！", 0.8, 4),
];

/// One line as written in config or on the command line.
///
/// Missing `position` spaces lines evenly, missing `color_seed` uses the line index.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LineSpec {
    /// Text to animate.
    pub text: String,
    /// Vertical placement factor in [0, 1].
    #[serde(default)]
    pub position: Option<f64>,
    /// Starting point in the color cycle.
    #[serde(default)]
    pub color_seed: Option<u32>,
}

impl LineSpec {
    /// Line with automatic position and seed.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: None,
            color_seed: None,
        }
    }
}

/// Configuration complète d'une session d'animation.
///
/// Chaque champ a une valeur par défaut qui donne l'animation multilingue standard.
///
/// # Example
/// ```
/// use hw_core::config::AnimationConfig;
/// let config = AnimationConfig::default();
/// assert_eq!(config.target_fps, 60);
/// assert_eq!(config.lines.len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    // === Animation ===
    /// Effect applied to every line.
    pub effect: EffectKind,
    /// Palette used by the renderers.
    pub colors: ColorScheme,
    /// Target frames per second (advisory).
    pub target_fps: u32,
    /// Length of the per-line color cycle.
    pub palette_size: u32,

    // === Effet ===
    /// Angular speed of the positional motion.
    pub wave_speed: f64,
    /// Amplitude of the positional motion (cells or pixels).
    pub wave_scale: f64,
    /// Angular speed of the spacing pulse.
    pub pulse_speed: f64,
    /// Amplitude of the spacing pulse.
    pub pulse_scale: f64,
    /// Color steps per second.
    pub color_speed: f64,

    // === Texte ===
    /// Lines to display, top to bottom.
    pub lines: Vec<LineSpec>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let effect = EffectConfig::default();
        Self {
            effect: effect.kind,
            colors: ColorScheme::Rainbow,
            target_fps: 60,
            palette_size: DEFAULT_PALETTE_SIZE,
            wave_speed: effect.wave_speed,
            wave_scale: effect.wave_scale,
            pulse_speed: effect.pulse_speed,
            pulse_scale: effect.pulse_scale,
            color_speed: effect.color_speed,
            lines: default_lines(),
        }
    }
}

fn default_lines() -> Vec<LineSpec> {
    DEFAULT_LINES
        .iter()
        .map(|&(text, position, seed)| LineSpec {
            text: text.to_string(),
            position: Some(position),
            color_seed: Some(seed),
        })
        .collect()
}

/// Replace a non-finite value by `fallback`, then clamp.
fn sane(v: f64, fallback: f64, min: f64, max: f64) -> f64 {
    if v.is_finite() { v.clamp(min, max) } else { fallback }
}

impl AnimationConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        let d = EffectConfig::default();
        self.target_fps = self.target_fps.clamp(1, 240);
        self.palette_size = self.palette_size.clamp(1, 64);
        self.wave_speed = sane(self.wave_speed, d.wave_speed, -50.0, 50.0);
        self.wave_scale = sane(self.wave_scale, d.wave_scale, 0.0, 500.0);
        self.pulse_speed = sane(self.pulse_speed, d.pulse_speed, -50.0, 50.0);
        self.pulse_scale = sane(self.pulse_scale, d.pulse_scale, 0.0, 5.0);
        self.color_speed = sane(self.color_speed, d.color_speed, 0.0, 100.0);
        for line in &mut self.lines {
            line.position = line.position.map(|p| sane(p, 0.5, 0.0, 1.0));
        }
        if self.lines.is_empty() {
            log::warn!("Aucune ligne de texte configurée, utilisation de l'échantillon par défaut.");
            self.lines = default_lines();
        }
    }

    /// Replace the lines with plain texts, evenly spaced.
    pub fn set_texts<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = texts.into_iter().map(LineSpec::text).collect();
    }

    /// Effect parameters shared by every line.
    #[must_use]
    pub fn effect_config(&self) -> EffectConfig {
        EffectConfig {
            kind: self.effect,
            wave_speed: self.wave_speed,
            wave_scale: self.wave_scale,
            pulse_speed: self.pulse_speed,
            pulse_scale: self.pulse_scale,
            color_speed: self.color_speed,
        }
    }

    /// Build the session's lines, all sharing one effect instance.
    ///
    /// # Example
    /// ```
    /// use hw_core::config::AnimationConfig;
    /// let mut config = AnimationConfig::default();
    /// config.set_texts(["a", "b", "c"]);
    /// let lines = config.lines();
    /// assert_eq!(lines[0].position_factor(), 0.25);
    /// assert_eq!(lines[2].color_seed(), 2);
    /// ```
    #[must_use]
    pub fn lines(&self) -> Vec<Line> {
        self.lines_with(self.effect_config())
    }

    /// Lines for the pixel canvas: motion amplitude is scaled from cells to
    /// pixels by [`CANVAS_PX_PER_UNIT`].
    #[must_use]
    pub fn canvas_lines(&self) -> Vec<Line> {
        let mut effect = self.effect_config();
        effect.wave_scale *= CANVAS_PX_PER_UNIT;
        self.lines_with(effect)
    }

    fn lines_with(&self, effect: EffectConfig) -> Vec<Line> {
        let effect = Arc::new(effect);
        let n = self.lines.len();
        self.lines
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let position = spec
                    .position
                    .unwrap_or((i + 1) as f64 / (n + 1) as f64);
                let seed = spec.color_seed.unwrap_or(i as u32);
                Line::new(spec.text.clone(), seed, position, Arc::clone(&effect))
            })
            .collect()
    }
}

/// Parse une taille `LARGEURxHAUTEUR` (ex: `1200x800`).
///
/// # Errors
/// Returns [`CoreError::CanvasSize`] if the string is malformed and
/// [`CoreError::InvalidDimensions`] if either side is zero.
///
/// # Example
/// ```
/// use hw_core::config::parse_canvas_size;
/// assert_eq!(parse_canvas_size("1200x800").ok(), Some((1200, 800)));
/// assert!(parse_canvas_size("1200").is_err());
/// ```
pub fn parse_canvas_size(s: &str) -> Result<(u32, u32), CoreError> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| CoreError::CanvasSize(s.to_string()))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| CoreError::CanvasSize(s.to_string()))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| CoreError::CanvasSize(s.to_string()))?;
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    Ok((width, height))
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    animation: Option<AnimationSection>,
    effect: Option<EffectSection>,
    line: Option<Vec<LineSpec>>,
}

/// `[animation]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct AnimationSection {
    effect: Option<String>,
    colors: Option<String>,
    fps: Option<u32>,
    palette_size: Option<u32>,
}

/// `[effect]` section, all fields optional.
#[derive(Deserialize)]
struct EffectSection {
    wave_speed: Option<f64>,
    wave_scale: Option<f64>,
    pulse_speed: Option<f64>,
    pulse_scale: Option<f64>,
    color_speed: Option<f64>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use hw_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AnimationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML content and merge it over the defaults.
///
/// # Errors
/// Returns an error if the content is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<AnimationConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = AnimationConfig::default();

    if let Some(a) = file.animation {
        if let Some(v) = a.effect {
            config.effect = EffectKind::from_name(&v);
        }
        if let Some(v) = a.colors {
            config.colors = ColorScheme::from_name(&v);
        }
        if let Some(v) = a.fps {
            config.target_fps = v;
        }
        if let Some(v) = a.palette_size {
            config.palette_size = v;
        }
    }

    if let Some(e) = file.effect {
        if let Some(v) = e.wave_speed {
            config.wave_speed = v;
        }
        if let Some(v) = e.wave_scale {
            config.wave_scale = v;
        }
        if let Some(v) = e.pulse_speed {
            config.pulse_speed = v;
        }
        if let Some(v) = e.pulse_scale {
            config.pulse_scale = v;
        }
        if let Some(v) = e.color_speed {
            config.color_speed = v;
        }
    }

    if let Some(lines) = file.line {
        config.lines = lines;
    }

    config.clamp_all();
    Ok(config)
}
