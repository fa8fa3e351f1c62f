/// Number of colors the cycler rotates through per line.
pub const DEFAULT_PALETTE_SIZE: u32 = 3;

/// Index du cycle de couleur pour un caractère.
///
/// `((floor(time·color_speed) + char_index + color_seed) mod P) + (color_seed mod P) + 1`
///
/// The result is 1-based (0 is the renderer's default color) and can reach
/// `2P - 1`: the seed term is added outside the modulo. Renderers wrap it
/// through [`ColorScheme::rgb`].
///
/// # Example
/// ```
/// use hw_core::color::color_index;
/// assert_eq!(color_index(0.0, 0, 4, 2.0, 3), 3);
/// ```
#[inline]
#[must_use]
pub fn color_index(
    time: f64,
    char_index: usize,
    color_seed: u32,
    color_speed: f64,
    palette_size: u32,
) -> u32 {
    let p = i64::from(palette_size.max(1));
    // chaque terme est réduit mod P avant la somme : pas de débordement
    let step = (time * color_speed).floor();
    let step = if step.is_finite() {
        step.rem_euclid(p as f64) as i64
    } else {
        0
    };
    let index = (char_index as u64 % p as u64) as i64;
    let seed = i64::from(color_seed).rem_euclid(p);
    let cycled = (step + index + seed).rem_euclid(p);
    (cycled + seed + 1) as u32
}

/// Entrées des palettes (index 1-based → table[(index - 1) % 6]).
const RAINBOW: [(u8, u8, u8); 6] = [
    (255, 0, 0),
    (255, 255, 0),
    (0, 255, 0),
    (0, 255, 255),
    (0, 0, 255),
    (255, 0, 255),
];

const MONOCHROME: [(u8, u8, u8); 6] = [
    (255, 255, 255),
    (215, 215, 215),
    (175, 175, 175),
    (140, 140, 140),
    (110, 110, 110),
    (80, 80, 80),
];

const MATRIX: [(u8, u8, u8); 6] = [
    (0, 255, 65),
    (0, 200, 50),
    (0, 143, 17),
    (150, 255, 150),
    (0, 100, 30),
    (200, 255, 200),
];

/// Color scheme selection.
///
/// # Example
/// ```
/// use hw_core::color::ColorScheme;
/// let scheme = ColorScheme::default();
/// assert_eq!(scheme.rgb(1), Some((255, 0, 0)));
/// assert_eq!(scheme.rgb(0), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// Red, yellow, green, cyan, blue, magenta.
    #[default]
    Rainbow,
    /// Grey ramp.
    Monochrome,
    /// Phosphor greens.
    Matrix,
}

/// Names accepted on the command line and in config files.
pub const COLOR_SCHEME_NAMES: &[&str] = &["rainbow", "monochrome", "matrix"];

impl ColorScheme {
    /// Resolve a scheme name. Unknown names fall back to [`ColorScheme::Rainbow`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rainbow" => Self::Rainbow,
            "monochrome" | "mono" => Self::Monochrome,
            "matrix" => Self::Matrix,
            other => {
                log::warn!(
                    "Palette inconnue '{other}' (attendu : {}), utilisation de 'rainbow'.",
                    COLOR_SCHEME_NAMES.join(", ")
                );
                Self::Rainbow
            }
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rainbow => "rainbow",
            Self::Monochrome => "monochrome",
            Self::Matrix => "matrix",
        }
    }

    fn table(self) -> &'static [(u8, u8, u8); 6] {
        match self {
            Self::Rainbow => &RAINBOW,
            Self::Monochrome => &MONOCHROME,
            Self::Matrix => &MATRIX,
        }
    }

    /// RGB for a 1-based color index. `0` means "renderer default" and maps to `None`.
    #[inline]
    #[must_use]
    pub fn rgb(self, index: u32) -> Option<(u8, u8, u8)> {
        if index == 0 {
            return None;
        }
        let table = self.table();
        Some(table[(index as usize - 1) % table.len()])
    }
}

/// Modulation de luminosité du canvas graphique : `sin(3t)·0.2 + 0.8`.
///
/// # Example
/// ```
/// use hw_core::color::shimmer;
/// assert_eq!(shimmer((100, 200, 250), 0.0), (80, 160, 200));
/// ```
#[must_use]
pub fn shimmer(rgb: (u8, u8, u8), time: f64) -> (u8, u8, u8) {
    let factor = (time * 3.0).sin() * 0.2 + 0.8;
    let scale = |c: u8| (f64::from(c) * factor).clamp(0.0, 255.0) as u8;
    (scale(rgb.0), scale(rgb.1), scale(rgb.2))
}
