//! Medicine name extraction from OCR text.

mod normalize;
mod tiered;
pub mod vocabulary;

pub use normalize::{normalize_text, tokenize};
pub use tiered::TieredExtractor;
pub use vocabulary::{Vocabulary, KNOWN_MEDICINES, MEDICINE_SUFFIXES};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Hard upper bound on names in one result, whatever the configuration says.
pub const MAX_RESULTS: usize = 10;

/// Trait for medicine name extractors.
pub trait MedicineExtractor {
    /// Extract candidate medicine names from raw OCR text.
    ///
    /// Never fails; text without recognizable medicines yields an empty result.
    fn extract(&self, text: &str) -> ExtractionResult;
}

/// Matching stage that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Whole-token match against the vocabulary.
    Exact,
    /// Substring / shared-prefix match against the vocabulary.
    Fuzzy,
    /// Drug-like token by suffix, not in the vocabulary.
    Suffix,
}

/// Ordered, duplicate-free list of extracted medicine names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Names in order of first discovery.
    pub medicines: Vec<String>,
    /// Tier that produced the names, `None` when nothing was found.
    pub tier: Option<MatchTier>,
}

impl ExtractionResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no medicines were detected.
    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }

    /// Number of extracted names.
    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    /// Extracted names.
    pub fn names(&self) -> &[String] {
        &self.medicines
    }

    /// Consume the result, keeping only the names.
    pub fn into_names(self) -> Vec<String> {
        self.medicines
    }
}

lazy_static! {
    static ref DEFAULT_EXTRACTOR: TieredExtractor = TieredExtractor::new();
}

/// Extract medicine names with the built-in vocabulary.
pub fn extract_medicines(text: &str) -> Vec<String> {
    DEFAULT_EXTRACTOR.extract(text).into_names()
}
