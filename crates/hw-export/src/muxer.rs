use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::canvas::Canvas;

/// Encode des frames RGBA du [`Canvas`] dans un fichier MP4 via ffmpeg.
///
/// Les pixels sont envoyés bruts sur le stdin de ffmpeg, encodés en H.264
/// `yuv420p` pour rester lisibles par les lecteurs courants.
pub struct Mp4Muxer {
    ffmpeg_child: Child,
    width: u32,
    height: u32,
    frames: u64,
}

impl Mp4Muxer {
    /// Démarre ffmpeg pour une vidéo `width`x`height` à `fps` images/s.
    ///
    /// # Errors
    /// Retourne une erreur si ffmpeg n'est pas installé ou impossible à démarrer.
    pub fn new(output_path: &Path, width: u32, height: u32, fps: u32) -> Result<Self> {
        let path_str = output_path.to_str().context("Chemin invalide")?;
        // yuv420p impose des dimensions paires
        if width % 2 != 0 || height % 2 != 0 {
            bail!("Dimensions vidéo impaires : {width}x{height}");
        }

        let child = Command::new("ffmpeg")
            .args([
                "-y",
                "-f",
                "rawvideo",
                "-vcodec",
                "rawvideo",
                "-s",
                &format!("{width}x{height}"),
                "-pix_fmt",
                "rgba",
                "-r",
                &fps.to_string(),
                "-i",
                "-",
                "-c:v",
                "libx264",
                "-crf",
                "18",
                "-preset",
                "medium",
                "-pix_fmt",
                "yuv420p",
                "-hide_banner",
                "-loglevel",
                "error",
                path_str,
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Échec du lancement de ffmpeg. (Est-il dans PATH ?)")?;

        log::info!("Export MP4 : {} ({width}x{height} @ {fps} fps)", output_path.display());
        Ok(Self {
            ffmpeg_child: child,
            width,
            height,
            frames: 0,
        })
    }

    /// Envoie une frame au flux.
    ///
    /// # Errors
    /// Retourne une erreur si le canvas n'a pas la taille de la vidéo ou si
    /// l'écriture dans le pipe échoue.
    pub fn write_frame(&mut self, canvas: &Canvas) -> Result<()> {
        if canvas.width != self.width || canvas.height != self.height {
            bail!(
                "Canvas {}x{} ≠ vidéo {}x{}",
                canvas.width,
                canvas.height,
                self.width,
                self.height
            );
        }
        let stdin = self
            .ffmpeg_child
            .stdin
            .as_mut()
            .context("Pipe ffmpeg fermé")?;
        stdin
            .write_all(&canvas.data)
            .context("Écriture vers ffmpeg")?;
        self.frames += 1;
        Ok(())
    }

    /// Frames sent so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ferme le flux et attend la fin de l'encodage.
    ///
    /// # Errors
    /// Retourne une erreur si ffmpeg signale une erreur de terminaison.
    pub fn finish(mut self) -> Result<()> {
        drop(self.ffmpeg_child.stdin.take());

        let output = self.ffmpeg_child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffmpeg encoder error: {stderr}");
        }
        log::info!("Export terminé : {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_dimensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = Mp4Muxer::new(&dir.path().join("odd.mp4"), 63, 64, 30);
        assert!(result.is_err());
    }

    #[test]
    fn encodes_when_ffmpeg_is_available() {
        // Either outcome of new() is valid: ffmpeg may be missing.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let Ok(mut muxer) = Mp4Muxer::new(&path, 64, 64, 30) else {
            return;
        };
        let canvas = Canvas::new(64, 64);
        assert!(muxer.write_frame(&Canvas::new(32, 32)).is_err());
        assert_eq!(muxer.frames(), 0);
        // a build without libx264 exits early and breaks the pipe
        let written = (0..3).all(|_| muxer.write_frame(&canvas).is_ok());
        if muxer.finish().is_ok() && written {
            assert!(path.is_file());
        }
    }
}
