use anyhow::Result;
use clap::Parser;
use hw_core::config::{AnimationConfig, load_config};
use hw_core::frame::FrameEvaluator;
use hw_export::recording::{Recorder, check_save_path};

pub mod app;
pub mod cli;
pub mod export;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply(&mut config);
    log::info!(
        "Effet {}, palette {}, {} lignes @ {} fps",
        config.effect.name(),
        config.colors.name(),
        config.lines.len(),
        config.target_fps
    );

    // 4. Évaluateur (graine fixe => shake reproductible)
    let evaluator = match cli.seed {
        Some(seed) => FrameEvaluator::seeded(seed),
        None => FrameEvaluator::new(),
    }
    .with_palette_size(config.palette_size);
    if !config.effect.is_deterministic() && cli.seed.is_none() {
        log::info!("Effet {} sans --seed : animation non reproductible.", config.effect.name());
    }

    // 4b. Valider --save avant l'animation, pas après
    if let Some(ref path) = cli.save {
        check_save_path(path)?;
    }
    let recorder = cli.save.as_ref().map(|_| Recorder::new());

    // 5a. Export offline
    if let Some(ref output) = cli.export {
        let mut recorder = recorder;
        let opts = export::ExportOptions {
            output,
            duration: cli.duration,
            canvas: cli.canvas_size()?,
            font: cli.font.as_deref(),
        };
        export::run_export(&config, evaluator, recorder.as_mut(), &opts)?;
        if let (Some(recorder), Some(path)) = (&recorder, &cli.save) {
            recorder.save(path)?;
        }
        return Ok(());
    }

    // 5b. Session terminal (restaure le terminal sur tous les chemins)
    app::Session::new(config, evaluator, recorder, cli.show_fps).run_interactive(cli.save.as_deref())
}

/// Load `--config`, or fall back to the defaults when the file is missing.
fn resolve_config(cli: &cli::Cli) -> Result<AnimationConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AnimationConfig::default())
    }
}
