use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use hw_core::color::{ColorScheme, shimmer};
use hw_core::frame::{Dimensions, DrawInstruction};
use hw_core::traits::{DrawSink, GlyphMetrics};

/// Fond du canvas graphique (bleu nuit).
pub const BACKGROUND: (u8, u8, u8) = (10, 10, 20);

/// Drop shadow offset in pixels, right and down.
const SHADOW_OFFSET: i64 = 2;

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use hw_export::canvas::Canvas;
/// let canvas = Canvas::new(4, 2);
/// assert_eq!(canvas.data.len(), 32);
/// assert_eq!(canvas.dimensions().rows, 2);
/// ```
#[derive(Clone, Debug)]
pub struct Canvas {
    /// Pixels RGBA, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Opaque black canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        };
        canvas.fill((0, 0, 0));
        canvas
    }

    /// Evaluator dimensions: rows = height, cols = width.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    /// Paint every pixel with `rgb`.
    pub fn fill(&mut self, rgb: (u8, u8, u8)) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
    }

    /// Pixel (x, y) → (r, g, b, a). `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some((
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ))
    }

    /// Composite a glyph coverage mask at cell origin (`x`, `y`) in `rgb`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn blit(&mut self, glyph: &GlyphBitmap, x: i64, y: i64, rgb: (u8, u8, u8)) {
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        for gy in 0..glyph.height {
            let py = y + i64::from(glyph.top) + i64::from(gy);
            if py < 0 || py >= h {
                continue;
            }
            for gx in 0..glyph.width {
                let px = x + i64::from(glyph.left) + i64::from(gx);
                if px < 0 || px >= w {
                    continue;
                }
                let coverage = glyph.coverage[(gy * glyph.width + gx) as usize];
                if coverage == 0 {
                    continue;
                }
                let a = f32::from(coverage) / 255.0;
                let idx = ((py * w + px) * 4) as usize;
                let mix = |src: u8, dst: u8| (f32::from(src) * a + f32::from(dst) * (1.0 - a)) as u8;
                self.data[idx] = mix(rgb.0, self.data[idx]);
                self.data[idx + 1] = mix(rgb.1, self.data[idx + 1]);
                self.data[idx + 2] = mix(rgb.2, self.data[idx + 2]);
                self.data[idx + 3] = 255;
            }
        }
    }
}

/// Masque de couverture d'un glyphe, relatif à l'origine de sa cellule.
#[derive(Clone, Debug)]
pub struct GlyphBitmap {
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
    /// Offset of the mask's left edge from the cell origin.
    pub left: i32,
    /// Offset of the mask's top edge from the cell origin.
    pub top: i32,
    /// Coverage, row-major, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Police chargée + cache des glyphes rasterisés.
///
/// Les glyphes sont rasterisés à la demande (le texte est multilingue, un
/// atlas pré-calculé couvrirait mal le CJK) puis gardés en cache.
pub struct GlyphAtlas {
    font: FontVec,
    scale: PxScale,
    /// `None` = glyph absent from the font or without outline.
    cache: HashMap<char, Option<GlyphBitmap>>,
}

impl GlyphAtlas {
    /// Load a TTF/OTF/TTC file at `px` pixels.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid font.
    pub fn from_file(path: &Path, px: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        Self::from_bytes(data, px)
            .with_context(|| format!("Police invalide : {}", path.display()))
    }

    /// Load a font from memory at `px` pixels.
    ///
    /// # Errors
    /// Returns an error if the data is not a valid font.
    pub fn from_bytes(data: Vec<u8>, px: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(data)?;
        Ok(Self {
            font,
            scale: PxScale::from(px.max(1.0)),
            cache: HashMap::new(),
        })
    }

    /// Cached coverage mask of `ch`, rasterized on first use.
    pub fn glyph(&mut self, ch: char) -> Option<&GlyphBitmap> {
        let font = &self.font;
        let scale = self.scale;
        self.cache
            .entry(ch)
            .or_insert_with(|| rasterize(font, scale, ch))
            .as_ref()
    }
}

impl GlyphMetrics for GlyphAtlas {
    fn advance(&self, ch: char) -> f64 {
        let scaled = self.font.as_scaled(self.scale);
        f64::from(scaled.h_advance(self.font.glyph_id(ch)))
    }
}

fn rasterize(font: &FontVec, scale: PxScale, ch: char) -> Option<GlyphBitmap> {
    // glyph_id 0 = .notdef : on ne dessine pas de boîte de remplacement
    let id = font.glyph_id(ch);
    if id.0 == 0 {
        log::debug!("Glyphe absent de la police : {ch:?}");
        return None;
    }
    let ascent = font.as_scaled(scale).ascent();
    let outline = font.outline_glyph(id.with_scale_and_position(scale, point(0.0, ascent)))?;
    let bounds = outline.px_bounds();
    let width = bounds.width() as u32;
    let height = bounds.height() as u32;
    let mut coverage = vec![0u8; width as usize * height as usize];
    outline.draw(|x, y, v| {
        if let Some(c) = coverage.get_mut((y * width + x) as usize) {
            *c = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    });
    Some(GlyphBitmap {
        width,
        height,
        left: bounds.min.x as i32,
        top: bounds.min.y as i32,
        coverage,
    })
}

/// Cible graphique : dessine les instructions dans un [`Canvas`].
///
/// Chaque frame repart du fond, chaque glyphe a une ombre portée noire et
/// sa couleur de palette modulée par [`shimmer`].
pub struct CanvasSink<'a> {
    canvas: &'a mut Canvas,
    atlas: &'a mut GlyphAtlas,
    scheme: ColorScheme,
    time: f64,
    skipped: usize,
}

impl<'a> CanvasSink<'a> {
    /// Sink drawing into `canvas` with glyphs from `atlas`.
    #[must_use]
    pub fn new(canvas: &'a mut Canvas, atlas: &'a mut GlyphAtlas, scheme: ColorScheme) -> Self {
        Self {
            canvas,
            atlas,
            scheme,
            time: 0.0,
            skipped: 0,
        }
    }

    /// Characters without a drawable glyph in the current frame.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl DrawSink for CanvasSink<'_> {
    fn begin_frame(&mut self, timestamp: f64) {
        self.time = timestamp;
        self.skipped = 0;
        self.canvas.fill(BACKGROUND);
    }

    fn draw(&mut self, instruction: &DrawInstruction) {
        let Some(glyph) = self.atlas.glyph(instruction.ch) else {
            self.skipped += 1;
            return;
        };
        let base = self.scheme.rgb(instruction.color).unwrap_or((255, 255, 255));
        let x = i64::from(instruction.col);
        let y = i64::from(instruction.row);
        self.canvas
            .blit(glyph, x + SHADOW_OFFSET, y + SHADOW_OFFSET, (0, 0, 0));
        self.canvas.blit(glyph, x, y, shimmer(base, self.time));
    }
}
