//! Three-tier medicine extractor: exact, then fuzzy, then suffix.

use std::collections::HashSet;

use tracing::debug;

use crate::error::RxError;
use crate::models::config::ExtractionConfig;

use super::normalize::tokenize;
use super::vocabulary::Vocabulary;
use super::{ExtractionResult, MatchTier, MedicineExtractor, MAX_RESULTS};

const TIERS: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Fuzzy, MatchTier::Suffix];

/// Vocabulary-driven extractor with fallback tiers.
///
/// A later tier only runs when every earlier tier came back empty. The
/// result is capped at `max_results` entries after the winning tier, and
/// `max_results` itself never exceeds [`MAX_RESULTS`].
#[derive(Debug, Clone)]
pub struct TieredExtractor {
    vocabulary: Vocabulary,
    max_results: usize,
    min_fuzzy_token_len: usize,
    fuzzy_prefix_len: usize,
    min_suffix_token_len: usize,
}

impl TieredExtractor {
    /// Create an extractor with the built-in vocabulary and default limits.
    pub fn new() -> Self {
        Self::with_config(Vocabulary::builtin(), &ExtractionConfig::default())
    }

    /// Create an extractor from configuration, loading the vocabulary file if set.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, RxError> {
        let vocabulary = match &config.vocabulary_file {
            Some(path) => Vocabulary::from_file(path)?,
            None => Vocabulary::builtin(),
        };
        Ok(Self::with_config(vocabulary, config))
    }

    fn with_config(vocabulary: Vocabulary, config: &ExtractionConfig) -> Self {
        Self {
            vocabulary,
            max_results: config.max_results.min(MAX_RESULTS),
            min_fuzzy_token_len: config.min_fuzzy_token_len,
            fuzzy_prefix_len: config.fuzzy_prefix_len.max(1),
            min_suffix_token_len: config.min_suffix_token_len,
        }
    }

    /// Replace the vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the maximum number of names returned, up to [`MAX_RESULTS`].
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_RESULTS);
        self
    }

    /// The vocabulary in use.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn run_tier(&self, tier: MatchTier, tokens: &[String]) -> Vec<String> {
        match tier {
            MatchTier::Exact => self.exact_matches(tokens),
            MatchTier::Fuzzy => self.fuzzy_matches(tokens),
            MatchTier::Suffix => self.suffix_matches(tokens),
        }
    }

    fn exact_matches(&self, tokens: &[String]) -> Vec<String> {
        let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let mut found = Vec::new();

        for name in self.vocabulary.medicines() {
            if token_set.contains(name.as_str()) {
                push_unique(&mut found, name);
            }
        }

        found
    }

    fn fuzzy_matches(&self, tokens: &[String]) -> Vec<String> {
        let mut found = Vec::new();

        for token in tokens.iter().filter(|t| t.len() >= self.min_fuzzy_token_len) {
            for name in self.vocabulary.medicines() {
                if name.contains(token.as_str())
                    || token.contains(name_prefix(name, self.fuzzy_prefix_len))
                {
                    push_unique(&mut found, name);
                }
            }
        }

        found
    }

    fn suffix_matches(&self, tokens: &[String]) -> Vec<String> {
        let mut found = Vec::new();

        for token in tokens {
            if token.len() >= self.min_suffix_token_len && self.vocabulary.has_drug_suffix(token) {
                push_unique(&mut found, token);
            }
        }

        found
    }
}

impl Default for TieredExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicineExtractor for TieredExtractor {
    fn extract(&self, text: &str) -> ExtractionResult {
        let tokens = tokenize(text);

        let Some((tier, mut medicines)) = TIERS
            .into_iter()
            .map(|tier| (tier, self.run_tier(tier, &tokens)))
            .find(|(_, found)| !found.is_empty())
        else {
            debug!("No medicines found in {} tokens", tokens.len());
            return ExtractionResult::empty();
        };

        medicines.truncate(self.max_results);
        debug!("{:?} tier matched {} medicines", tier, medicines.len());

        ExtractionResult {
            medicines,
            tier: Some(tier),
        }
    }
}

fn push_unique(found: &mut Vec<String>, name: &str) {
    if !found.iter().any(|f| f == name) {
        found.push(name.to_string());
    }
}

/// First `len` characters of `name`, or all of it when shorter.
fn name_prefix(name: &str, len: usize) -> &str {
    name.char_indices()
        .nth(len)
        .map_or(name, |(end, _)| &name[..end])
}
