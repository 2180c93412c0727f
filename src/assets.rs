//! Asset provider: fonts (required) and institutional logos (optional).
//!
//! Fonts are cached process-wide since parsing a TTF is not free and every
//! render uses the same three faces. Logos are resolved once at load time;
//! a missing logo is a normal outcome, not an error.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::DynamicImage;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use tracing::warn;

use crate::cert::CertError;

static FONT_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Root of the asset tree: `ASSETS_DIR` env var, falling back to the
/// `assets/` directory next to the manifest.
pub fn assets_dir() -> PathBuf {
    if let Ok(p) = std::env::var("ASSETS_DIR") {
        return PathBuf::from(p);
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

pub fn load_font_cached(path: &Path) -> Result<Arc<Font<'static>>, CertError> {
    if let Some(f) = FONT_CACHE.lock().get(path) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| CertError::AssetLoad(format!("read font {}: {e}", path.display())))?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| CertError::AssetLoad(format!("parse font {}", path.display())))?;

    let font = Arc::new(font);
    FONT_CACHE
        .lock()
        .insert(path.to_path_buf(), Arc::clone(&font));
    Ok(font)
}

/// Immutable, pre-resolved drawing assets passed into every render call.
pub struct Assets {
    pub regular: Arc<Font<'static>>,
    pub bold: Arc<Font<'static>>,
    pub oblique: Arc<Font<'static>>,
    pub logo_left: Option<DynamicImage>,
    pub logo_right: Option<DynamicImage>,
}

impl Assets {
    pub fn load() -> Result<Self, CertError> {
        Self::load_from(&assets_dir())
    }

    pub fn load_from(dir: &Path) -> Result<Self, CertError> {
        let fonts = dir.join("fonts");
        Ok(Self {
            regular: load_font_cached(&fonts.join("DejaVuSans.ttf"))?,
            bold: load_font_cached(&fonts.join("DejaVuSans-Bold.ttf"))?,
            oblique: load_font_cached(&fonts.join("DejaVuSans-Oblique.ttf"))?,
            logo_left: load_logo(dir, "logo_left"),
            logo_right: load_logo(dir, "logo_right"),
        })
    }

    /// Same fonts, no logos. Rendering must produce identical output for
    /// everything outside the logo slots.
    pub fn without_logos(&self) -> Self {
        Self {
            regular: Arc::clone(&self.regular),
            bold: Arc::clone(&self.bold),
            oblique: Arc::clone(&self.oblique),
            logo_left: None,
            logo_right: None,
        }
    }
}

fn load_logo(dir: &Path, name: &str) -> Option<DynamicImage> {
    let path = dir.join(format!("{name}.png"));
    if !path.exists() {
        return None;
    }
    match image::open(&path) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("skipping unreadable logo {}: {e}", path.display());
            None
        }
    }
}
