//! Prescription session state and its persistence.

mod state;
mod store;

pub use state::{PrescriptionSession, Slot, ALLERGIES_KEY, LAST_SESSION_KEY};
pub use store::{load_list, save_list, FileStore, KeyValueStore, MemoryStore};
