//! Reference vocabulary for medicine name matching.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RxError;

/// Built-in medicine names, in match order.
pub static KNOWN_MEDICINES: &[&str] = &[
    "metformin", "ibuprofen", "amoxicillin", "paracetamol", "aspirin",
    "warfarin", "azithromycin", "cetirizine", "pantoprazole", "omeprazole",
    "clopidogrel", "lisinopril", "amlodipine", "simvastatin", "levocetirizine",
    "montelukast", "diclofenac", "sertraline", "tramadol", "metronidazole",
    "acetaminophen", "cough_syrup", "insulin", "atenolol", "erythromycin",
    "statins", "ceftriaxone", "doxycycline", "antacids", "prednisolone",
    "losartan", "furosemide", "gabapentin", "citalopram", "fluoxetine",
    "lansoprazole", "esomeprazole", "ranitidine", "loratadine", "glipizide",
    "glyburide", "pioglitazone", "metoprolol", "propranolol", "carvedilol",
    "digoxin", "spironolactone", "hydrochlorothiazide", "prednisone",
    "dexamethasone", "levothyroxine", "albuterol", "fluticasone", "budesonide",
    "salbutamol", "beclomethasone", "beta_blockers", "ace_inhibitors", "macrolide",
];

/// Endings that mark an unknown token as drug-like.
pub static MEDICINE_SUFFIXES: &[&str] = &[
    "in", "ol", "pril", "ine", "ate", "ide", "mycin", "azole", "statin",
];

/// Ordered medicine names plus the suffixes used by the last-resort tier.
///
/// Entries are stored lowercase, trimmed and without duplicates; empty
/// entries are dropped. Order is preserved because it decides match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    medicines: Vec<String>,
    suffixes: Vec<String>,
}

/// On-disk vocabulary shape. Suffixes fall back to the built-in list.
#[derive(Deserialize)]
struct VocabularyFile {
    medicines: Vec<String>,
    #[serde(default)]
    suffixes: Option<Vec<String>>,
}

impl Vocabulary {
    /// Build a vocabulary from arbitrary names and suffixes.
    pub fn new<M, S>(medicines: M, suffixes: S) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            medicines: clean_entries(medicines),
            suffixes: clean_entries(suffixes),
        }
    }

    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        Self::new(KNOWN_MEDICINES.iter(), MEDICINE_SUFFIXES.iter())
    }

    /// Parse a JSON vocabulary: `{"medicines": [...], "suffixes": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, RxError> {
        let file: VocabularyFile = serde_json::from_str(json)
            .map_err(|e| RxError::Config(format!("invalid vocabulary: {}", e)))?;

        let vocabulary = match file.suffixes {
            Some(suffixes) => Self::new(file.medicines, suffixes),
            None => Self::new(file.medicines, MEDICINE_SUFFIXES.iter()),
        };

        if vocabulary.medicines.is_empty() {
            return Err(RxError::Config("vocabulary has no medicine names".to_string()));
        }

        Ok(vocabulary)
    }

    /// Load a JSON vocabulary from disk.
    pub fn from_file(path: &Path) -> Result<Self, RxError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Medicine names in match order.
    pub fn medicines(&self) -> &[String] {
        &self.medicines
    }

    /// Pharmacological suffixes.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Whether `token` ends with any known suffix.
    pub fn has_drug_suffix(&self, token: &str) -> bool {
        self.suffixes.iter().any(|s| token.ends_with(s.as_str()))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn clean_entries<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim().to_lowercase();
        if !entry.is_empty() && !cleaned.contains(&entry) {
            cleaned.push(entry);
        }
    }
    cleaned
}
