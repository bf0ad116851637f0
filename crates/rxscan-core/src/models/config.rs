//! Configuration structures for the prescription pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for rxscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RxConfig {
    /// Medicine extraction configuration.
    pub extraction: ExtractionConfig,

    /// Conflict-check endpoint configuration.
    pub api: ApiConfig,

    /// Session persistence configuration.
    pub storage: StorageConfig,

    /// OCR model configuration.
    pub ocr: OcrConfig,
}

/// Medicine extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of names returned per text. Values above 10 are capped.
    pub max_results: usize,

    /// Minimum token length considered by the fuzzy tier.
    pub min_fuzzy_token_len: usize,

    /// Length of the vocabulary-name prefix searched for inside a token.
    pub fuzzy_prefix_len: usize,

    /// Minimum token length considered by the suffix tier.
    pub min_suffix_token_len: usize,

    /// Optional JSON vocabulary replacing the built-in one.
    pub vocabulary_file: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_results: crate::extraction::MAX_RESULTS,
            min_fuzzy_token_len: 4,
            fuzzy_prefix_len: 4,
            min_suffix_token_len: 6,
            vocabulary_file: None,
        }
    }
}

/// Conflict-check endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (without trailing path).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Login session id forwarded as `session_id`.
    pub session_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            session_id: None,
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file path. Defaults to the user config directory.
    pub path: Option<PathBuf>,
}

/// OCR model file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers in recognized text instead of blanking them.
    pub keep_unknown: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unknown: false,
        }
    }
}

impl RxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
