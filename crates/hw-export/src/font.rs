use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Polices CJK essayées quand aucune n'est fournie (`--font`).
pub const FONT_CANDIDATES: &[&str] = &[
    "NotoSansCJK-Regular.ttc",
    "NotoSansJP-Regular.otf",
    "NanumGothic.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

/// Resolve the font to rasterize with.
///
/// An explicit path must exist. Otherwise the first existing candidate wins.
///
/// # Errors
/// Returns an error if the explicit path is missing or no candidate exists.
pub fn find_font(explicit: Option<&Path>) -> Result<PathBuf> {
    find_font_in(explicit, FONT_CANDIDATES)
}

fn find_font_in(explicit: Option<&Path>, candidates: &[&str]) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        bail!("Police introuvable : {}", path.display());
    }
    for candidate in candidates {
        let path = Path::new(candidate);
        if path.is_file() {
            log::info!("Police sélectionnée : {}", path.display());
            return Ok(path.to_path_buf());
        }
    }
    bail!("Aucune police CJK trouvée. Utilisez --font <fichier .ttf/.otf/.ttc>.")
}
