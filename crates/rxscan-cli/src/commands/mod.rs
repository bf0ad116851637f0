//! Subcommands and the helpers they share.

pub mod allergy;
pub mod batch;
pub mod check;
pub mod config;
pub mod extract;
pub mod session;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use rxscan_core::models::config::RxConfig;
use rxscan_core::ocr::TextRecognizer;
use rxscan_core::session::{FileStore, PrescriptionSession};
use rxscan_core::PureOcrEngine;

/// Image extensions routed through OCR.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"];

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rxscan")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RxConfig> {
    if let Some(path) = config_path {
        return Ok(RxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(RxConfig::from_file(&default_path)?)
    } else {
        Ok(RxConfig::default())
    }
}

/// Open the session file named by the config (or the default location).
pub fn open_store(config: &RxConfig) -> anyhow::Result<FileStore> {
    let path = config.storage.path.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rxscan")
            .join("session.json")
    });
    Ok(FileStore::open(path)?)
}

/// Load the saved session. A configured login id goes through reconciliation.
pub fn load_session(config: &RxConfig, store: &mut FileStore) -> anyhow::Result<PrescriptionSession> {
    let session = match config.api.session_id.as_deref() {
        Some(login) => PrescriptionSession::load(store, Some(login))?,
        None => PrescriptionSession::from_store(store)?,
    };
    Ok(session)
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read prescription text from a text file, stdin (`-`), or an image via OCR.
pub fn read_prescription(input: &Path, force_image: bool, config: &RxConfig) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    if force_image || is_image(input) {
        let image = image::open(input)?;
        let engine = PureOcrEngine::from_config(&config.ocr).map_err(|e| {
            anyhow::anyhow!(
                "{}\n\nPlace det/rec models and the dictionary in {} or set ocr.model_dir.",
                e,
                config.ocr.model_dir.display()
            )
        })?;
        return Ok(engine.recognize(&image)?);
    }

    Ok(fs::read_to_string(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("scan.PNG")));
        assert!(is_image(Path::new("a/b/rx.jpeg")));
        assert!(!is_image(Path::new("rx.txt")));
        assert!(!is_image(Path::new("rx")));
    }

    #[test]
    fn test_read_text_prescription() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rx.txt");
        fs::write(&path, "Aspirin 81mg").unwrap();

        let text = read_prescription(&path, false, &RxConfig::default()).unwrap();
        assert_eq!(text, "Aspirin 81mg");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_prescription(Path::new("/nonexistent/rx.txt"), false, &RxConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
