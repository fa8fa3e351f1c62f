use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use hw_core::frame::{Frame, Line};
use serde::{Deserialize, Serialize};

/// Position enregistrée d'un caractère.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordedPosition {
    /// Character drawn.
    #[serde(rename = "char")]
    pub ch: char,
    /// Column (or pixel x).
    pub x: u32,
    /// Row (or pixel y).
    pub y: u32,
    /// 1-based color index.
    pub color: u32,
}

/// Visible characters of one line for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordedText {
    /// Full text of the line.
    pub text: String,
    /// Characters that were on screen, in text order.
    pub positions: Vec<RecordedPosition>,
}

/// Une frame sérialisée : `{time, texts: [{text, positions: [{char, x, y, color}]}]}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RecordedFrame {
    /// Animation time in seconds.
    pub time: f64,
    /// One entry per line, in line order, including lines with nothing visible.
    pub texts: Vec<RecordedText>,
}

impl RecordedFrame {
    /// Group a frame's instructions by the line they came from.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use hw_core::effect::EffectConfig;
    /// use hw_core::frame::{Dimensions, FrameEvaluator, Line};
    /// use hw_core::traits::CellMetrics;
    /// use hw_export::recording::RecordedFrame;
    ///
    /// let lines = vec![Line::new("Hi", 0, 0.5, Arc::new(EffectConfig::default()))];
    /// let frame = FrameEvaluator::seeded(0).evaluate(0.0, Dimensions::new(24, 80), &lines, &CellMetrics);
    /// let rec = RecordedFrame::from_frame(&frame, &lines);
    /// assert_eq!(rec.texts[0].positions[0].x, 39);
    /// ```
    #[must_use]
    pub fn from_frame(frame: &Frame, lines: &[Line]) -> Self {
        let texts = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| RecordedText {
                text: line.text().to_string(),
                positions: frame
                    .for_line(idx)
                    .map(|instr| RecordedPosition {
                        ch: instr.ch,
                        x: instr.col,
                        y: instr.row,
                        color: instr.color,
                    })
                    .collect(),
            })
            .collect();
        Self {
            time: frame.timestamp,
            texts,
        }
    }
}

/// Journal d'enregistrement en mémoire, append-only.
///
/// Écrit sur disque une seule fois, à la fin de la session.
///
/// # Example
/// ```no_run
/// use hw_export::recording::Recorder;
/// let recorder = Recorder::new();
/// recorder.save(std::path::Path::new("animation.json")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    frames: Vec<RecordedFrame>,
}

impl Recorder {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed frame.
    pub fn push(&mut self, frame: &Frame, lines: &[Line]) {
        self.frames.push(RecordedFrame::from_frame(frame, lines));
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Number of frames recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Write all frames as one JSON array.
    ///
    /// The array goes to a temporary file next to `path` which then replaces
    /// `path`, so a reader never sees a partial recording.
    ///
    /// # Errors
    /// Returns an error if the directory is not writable or serialization fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = target_dir(path);
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Impossible de créer un fichier dans {}", dir.display()))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &self.frames)
                .context("Sérialisation de l'enregistrement")?;
            writer.flush()?;
        }
        tmp.persist(path)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!(
            "{} frames enregistrées dans {}",
            self.frames.len(),
            path.display()
        );
        Ok(())
    }
}

/// Directory the recording file is written into.
fn target_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Vérifie au démarrage que `path` pourra recevoir l'enregistrement.
///
/// # Errors
/// Returns an error if `path` is a directory or its parent directory does not exist.
pub fn check_save_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        bail!("--save pointe vers un répertoire : {}", path.display());
    }
    let dir = target_dir(path);
    if !dir.is_dir() {
        bail!("Répertoire introuvable pour --save : {}", dir.display());
    }
    Ok(())
}

/// Read a recording written by [`Recorder::save`].
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a recording.
pub fn load_recording(path: &Path) -> Result<Vec<RecordedFrame>> {
    let file =
        File::open(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Enregistrement invalide : {}", path.display()))
}
