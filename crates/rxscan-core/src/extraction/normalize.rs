//! OCR text normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that is not a lowercase ASCII letter or whitespace.
    static ref NON_LETTER: Regex = Regex::new(r"[^a-z\s]").unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercase, blank out non-letters, collapse whitespace and trim.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let letters_only = NON_LETTER.replace_all(&lowered, " ");
    WHITESPACE_RUN
        .replace_all(&letters_only, " ")
        .trim()
        .to_string()
}

/// Split normalized text into tokens. Every token is non-empty ASCII `a-z`.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_strips_noise() {
        assert_eq!(
            normalize_text("  Rx: Metformin-500mg\n\tBID!! "),
            "rx metformin mg bid"
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n 123 %% ").is_empty());
    }

    #[test]
    fn test_tokenize_drops_non_ascii_letters() {
        assert_eq!(tokenize("Ibuprofène 400"), vec!["ibuprof", "ne"]);
    }

    #[test]
    fn test_underscore_splits_tokens() {
        assert_eq!(tokenize("cough_syrup"), vec!["cough", "syrup"]);
    }
}
