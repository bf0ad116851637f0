//! Core library for prescription OCR processing.
//!
//! This crate provides:
//! - Medicine name extraction from noisy OCR text (exact, fuzzy and suffix tiers)
//! - Per-session prescription state with pluggable key-value persistence
//! - Wire types (and a native HTTP client) for the conflict-check endpoint
//! - An OCR seam, with a pure Rust engine behind the `native` feature

pub mod error;
pub mod models;
pub mod extraction;
pub mod session;
pub mod conflict;
pub mod ocr;

pub use error::{RxError, Result};
pub use models::config::RxConfig;
pub use extraction::{
    extract_medicines, ExtractionResult, MatchTier, MedicineExtractor, TieredExtractor, Vocabulary,
};
pub use session::{FileStore, KeyValueStore, MemoryStore, PrescriptionSession, Slot};
pub use conflict::{ConflictReport, ConflictRequest, RiskLevel};
pub use ocr::TextRecognizer;

#[cfg(feature = "native")]
pub use conflict::ConflictClient;
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
