//! Per-session prescription state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::conflict::ConflictRequest;
use crate::error::{Result, SessionError};
use crate::extraction::ExtractionResult;

use super::store::{load_list, save_list, KeyValueStore};

/// Storage key for the user's allergy list.
pub const ALLERGIES_KEY: &str = "userAllergies";

/// Storage key for the login id the saved data belongs to.
pub const LAST_SESSION_KEY: &str = "lastSessionId";

/// Which of the two prescriptions a list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Both slots, in display order.
    pub const ALL: [Slot; 2] = [Slot::A, Slot::B];

    /// Key under which the slot's medicines are persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            Slot::A => "doctorA",
            Slot::B => "doctorB",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "doctora" => Ok(Slot::A),
            "b" | "doctorb" => Ok(Slot::B),
            other => Err(format!("unknown prescription slot: {}", other)),
        }
    }
}

/// Medicines and allergies for one user session.
///
/// The session never touches storage on its own; every mutating operation
/// takes the store it should write through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionSession {
    doctor_a: Vec<String>,
    doctor_b: Vec<String>,
    allergies: Vec<String>,
    #[serde(skip)]
    processing_a: bool,
    #[serde(skip)]
    processing_b: bool,
}

impl PrescriptionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load whatever `store` holds, without login reconciliation.
    pub fn from_store(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            doctor_a: load_list(store, Slot::A.storage_key())?,
            doctor_b: load_list(store, Slot::B.storage_key())?,
            allergies: load_list(store, ALLERGIES_KEY)?,
            ..Self::default()
        })
    }

    /// Load a session from `store` for the given login.
    pub fn load(store: &mut dyn KeyValueStore, current_login: Option<&str>) -> Result<Self> {
        let mut session = Self::new();
        session.restore(store, current_login)?;
        Ok(session)
    }

    /// Medicines recorded for `slot`.
    pub fn medicines(&self, slot: Slot) -> &[String] {
        match slot {
            Slot::A => &self.doctor_a,
            Slot::B => &self.doctor_b,
        }
    }

    fn medicines_mut(&mut self, slot: Slot) -> &mut Vec<String> {
        match slot {
            Slot::A => &mut self.doctor_a,
            Slot::B => &mut self.doctor_b,
        }
    }

    /// Self-reported allergies, in insertion order.
    pub fn allergies(&self) -> &[String] {
        &self.allergies
    }

    /// Whether OCR for `slot` is still running.
    pub fn is_processing(&self, slot: Slot) -> bool {
        match slot {
            Slot::A => self.processing_a,
            Slot::B => self.processing_b,
        }
    }

    fn set_processing(&mut self, slot: Slot, processing: bool) {
        match slot {
            Slot::A => self.processing_a = processing,
            Slot::B => self.processing_b = processing,
        }
    }

    /// Mark `slot` as waiting for OCR output.
    pub fn begin_processing(&mut self, slot: Slot) {
        self.set_processing(slot, true);
    }

    /// Clear the processing flag after an OCR failure. Saved medicines stay.
    pub fn fail_processing(&mut self, slot: Slot) {
        self.set_processing(slot, false);
    }

    /// Store the extraction for `slot` and persist it.
    pub fn record_extraction(
        &mut self,
        slot: Slot,
        result: ExtractionResult,
        store: &mut dyn KeyValueStore,
    ) -> Result<()> {
        let medicines = result.into_names();
        save_list(store, slot.storage_key(), &medicines)?;

        info!("Recorded {} medicines for prescription {}", medicines.len(), slot);
        *self.medicines_mut(slot) = medicines;
        self.set_processing(slot, false);
        Ok(())
    }

    /// Add an allergy. Names are trimmed and compared case-insensitively.
    pub fn add_allergy(&mut self, name: &str, store: &mut dyn KeyValueStore) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyAllergy.into());
        }

        let lowered = name.to_lowercase();
        if self.allergies.iter().any(|a| a.to_lowercase() == lowered) {
            return Err(SessionError::DuplicateAllergy(name.to_string()).into());
        }

        self.allergies.push(name.to_string());
        save_list(store, ALLERGIES_KEY, &self.allergies)?;
        Ok(())
    }

    /// Remove an allergy by exact name. Returns whether it was present.
    pub fn remove_allergy(&mut self, name: &str, store: &mut dyn KeyValueStore) -> Result<bool> {
        let before = self.allergies.len();
        self.allergies.retain(|a| a != name);

        if self.allergies.len() == before {
            return Ok(false);
        }

        save_list(store, ALLERGIES_KEY, &self.allergies)?;
        Ok(true)
    }

    /// Both prescriptions have medicines and neither is still processing.
    pub fn can_check(&self) -> bool {
        self.readiness().is_ok()
    }

    fn readiness(&self) -> std::result::Result<(), SessionError> {
        for slot in Slot::ALL {
            if self.is_processing(slot) {
                return Err(SessionError::StillProcessing(slot.to_string()));
            }
        }
        for slot in Slot::ALL {
            if self.medicines(slot).is_empty() {
                return Err(SessionError::MissingMedicines(slot.to_string()));
            }
        }
        Ok(())
    }

    /// Build the conflict-check payload for this session.
    pub fn conflict_request(
        &self,
        session_id: Option<String>,
    ) -> std::result::Result<ConflictRequest, SessionError> {
        self.readiness()?;

        Ok(ConflictRequest {
            doctor_a_medicines: self.doctor_a.clone(),
            doctor_b_medicines: self.doctor_b.clone(),
            user_allergies: self.allergies.clone(),
            session_id,
        })
    }

    /// Forget both medicine lists. Allergies are kept.
    pub fn clear_medicines(&mut self, store: &mut dyn KeyValueStore) -> Result<()> {
        for slot in Slot::ALL {
            self.medicines_mut(slot).clear();
            store.remove(slot.storage_key())?;
        }
        Ok(())
    }

    /// Forget medicines, allergies and processing state.
    pub fn clear_all(&mut self, store: &mut dyn KeyValueStore) -> Result<()> {
        self.clear_medicines(store)?;
        self.allergies.clear();
        store.remove(ALLERGIES_KEY)?;
        self.processing_a = false;
        self.processing_b = false;
        Ok(())
    }

    /// Reconcile in-memory state with `store` for the current login.
    ///
    /// A new login discards saved medicines but keeps allergies; the same
    /// login reloads everything; no login clears everything.
    pub fn restore(&mut self, store: &mut dyn KeyValueStore, current_login: Option<&str>) -> Result<()> {
        let Some(login) = current_login else {
            info!("No active login, clearing saved prescription data");
            self.clear_all(store)?;
            store.remove(LAST_SESSION_KEY)?;
            return Ok(());
        };

        let last_login = store.get(LAST_SESSION_KEY)?;
        if last_login.as_deref() == Some(login) {
            for slot in Slot::ALL {
                *self.medicines_mut(slot) = load_list(store, slot.storage_key())?;
            }
        } else {
            info!("New login detected, clearing saved medicines");
            self.clear_medicines(store)?;
            store.set(LAST_SESSION_KEY, login)?;
        }

        self.allergies = load_list(store, ALLERGIES_KEY)?;
        Ok(())
    }
}
