use std::path::PathBuf;

use clap::Parser;
use hw_core::color::ColorScheme;
use hw_core::config::{AnimationConfig, parse_canvas_size};
use hw_core::effect::EffectKind;

/// hellowave : texte multilingue animé dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Texte(s) à animer, une ligne par valeur. Remplace les lignes de la config.
    #[arg(short, long, num_args = 1..)]
    pub text: Vec<String>,

    /// Effet : wave, bounce, spiral, shake, static.
    #[arg(long)]
    pub effect: Option<String>,

    /// FPS cible.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Palette : rainbow, monochrome, matrix.
    #[arg(long)]
    pub colors: Option<String>,

    /// Enregistrer chaque frame en JSON dans ce fichier.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Graine du générateur aléatoire (rend l'effet shake reproductible).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Afficher la ligne de statut (FPS, effet, palette).
    #[arg(long, default_value_t = false)]
    pub show_fps: bool,

    /// Exporter une vidéo MP4 au lieu d'animer le terminal. Requiert ffmpeg.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Durée de l'export en secondes.
    #[arg(long, default_value_t = 5.0)]
    pub duration: f64,

    /// Taille du canvas d'export, LARGEURxHAUTEUR.
    #[arg(long, default_value = "1200x800")]
    pub canvas: String,

    /// Police TTF/OTF/TTC pour l'export (défaut : première police CJK trouvée).
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AnimationConfig) {
        if let Some(ref name) = self.effect {
            config.effect = EffectKind::from_name(name);
        }
        if let Some(ref name) = self.colors {
            config.colors = ColorScheme::from_name(name);
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if !self.text.is_empty() {
            config.set_texts(self.text.iter().cloned());
        }
        config.clamp_all();
    }

    /// Export canvas size.
    ///
    /// # Errors
    /// Returns an error if `--canvas` is not `WIDTHxHEIGHT`.
    pub fn canvas_size(&self) -> anyhow::Result<(u32, u32)> {
        Ok(parse_canvas_size(&self.canvas)?)
    }
}
