//! WASM bindings for prescription medicine extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers. Session
//! state is persisted through `window.localStorage`.

use wasm_bindgen::prelude::*;

use rxscan_core::error::StorageError;
use rxscan_core::extraction::{self, ExtractionResult, MedicineExtractor as _, TieredExtractor, Vocabulary};
use rxscan_core::session::{KeyValueStore, MemoryStore, PrescriptionSession as Session, Slot};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract medicine names from OCR text with the built-in vocabulary.
#[wasm_bindgen]
pub fn extract_medicines(text: &str) -> js_sys::Array {
    to_array(&extraction::extract_medicines(text))
}

fn to_array(names: &[String]) -> js_sys::Array {
    names.iter().map(|name| JsValue::from_str(name)).collect()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_slot(slot: &str) -> Result<Slot, JsValue> {
    slot.parse::<Slot>().map_err(|e| JsValue::from_str(&e))
}

/// Medicine extractor class for browser use.
#[wasm_bindgen]
pub struct MedicineExtractor {
    inner: TieredExtractor,
}

#[wasm_bindgen]
impl MedicineExtractor {
    /// Create an extractor over the built-in vocabulary.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: TieredExtractor::new(),
        }
    }

    /// Create an extractor over a custom vocabulary.
    #[wasm_bindgen]
    pub fn with_vocabulary(medicines: Vec<String>, suffixes: Vec<String>) -> Result<MedicineExtractor, JsValue> {
        let vocabulary = Vocabulary::new(medicines, suffixes);
        if vocabulary.medicines().is_empty() {
            return Err(JsValue::from_str("vocabulary has no medicine names"));
        }

        Ok(Self {
            inner: TieredExtractor::new().with_vocabulary(vocabulary),
        })
    }

    /// Extract medicine names from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> js_sys::Array {
        to_array(self.inner.extract(text).names())
    }

    /// Extraction result with the tier that produced it.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result: ExtractionResult = self.inner.extract(text);
        serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
    }
}

impl Default for MedicineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// `KeyValueStore` over `window.localStorage`.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Backend("no global window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(backend_error)?
            .ok_or_else(|| StorageError::Backend("localStorage is unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

fn backend_error(e: JsValue) -> StorageError {
    StorageError::Backend(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(backend_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(backend_error)
    }
}

/// Two-prescription session for browser use.
#[wasm_bindgen]
pub struct PrescriptionSession {
    session: Session,
    store: Box<dyn KeyValueStore>,
    extractor: TieredExtractor,
}

#[wasm_bindgen]
impl PrescriptionSession {
    /// Open a session persisted in `localStorage`. Falls back to memory
    /// when storage is blocked.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "rxscan: {}, session will not persist",
                    e
                )));
                Box::new(MemoryStore::new())
            }
        };
        Self::with_store(store)
    }

    /// Reconcile with storage for the current login (or none).
    #[wasm_bindgen]
    pub fn restore(&mut self, login_id: Option<String>) -> Result<(), JsValue> {
        self.session
            .restore(self.store.as_mut(), login_id.as_deref())
            .map_err(to_js_error)
    }

    /// Extract medicines from OCR text into slot "A" or "B".
    #[wasm_bindgen]
    pub fn record(&mut self, slot: &str, text: &str) -> Result<js_sys::Array, JsValue> {
        let slot = parse_slot(slot)?;
        let result = self.extractor.extract(text);
        self.session
            .record_extraction(slot, result, self.store.as_mut())
            .map_err(to_js_error)?;
        Ok(to_array(self.session.medicines(slot)))
    }

    /// Mark a slot as waiting on OCR.
    #[wasm_bindgen]
    pub fn begin_processing(&mut self, slot: &str) -> Result<(), JsValue> {
        self.session.begin_processing(parse_slot(slot)?);
        Ok(())
    }

    /// Clear the waiting flag after OCR failed.
    #[wasm_bindgen]
    pub fn fail_processing(&mut self, slot: &str) -> Result<(), JsValue> {
        self.session.fail_processing(parse_slot(slot)?);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn medicines(&self, slot: &str) -> Result<js_sys::Array, JsValue> {
        Ok(to_array(self.session.medicines(parse_slot(slot)?)))
    }

    #[wasm_bindgen]
    pub fn add_allergy(&mut self, name: &str) -> Result<(), JsValue> {
        self.session
            .add_allergy(name, self.store.as_mut())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn remove_allergy(&mut self, name: &str) -> Result<bool, JsValue> {
        self.session
            .remove_allergy(name, self.store.as_mut())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn allergies(&self) -> js_sys::Array {
        to_array(self.session.allergies())
    }

    #[wasm_bindgen]
    pub fn can_check(&self) -> bool {
        self.session.can_check()
    }

    /// Payload for `POST /check-conflicts`, as a plain JS object.
    #[wasm_bindgen]
    pub fn conflict_request(&self, session_id: Option<String>) -> Result<JsValue, JsValue> {
        let request = self.session.conflict_request(session_id).map_err(to_js_error)?;
        let json = serde_json::to_string(&request).map_err(to_js_error)?;
        js_sys::JSON::parse(&json)
    }

    #[wasm_bindgen]
    pub fn clear_medicines(&mut self) -> Result<(), JsValue> {
        self.session
            .clear_medicines(self.store.as_mut())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn clear_all(&mut self) -> Result<(), JsValue> {
        self.session.clear_all(self.store.as_mut()).map_err(to_js_error)
    }
}

impl PrescriptionSession {
    fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        let session = match Session::from_store(store.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("rxscan: {}", e)));
                Session::new()
            }
        };

        Self {
            session,
            store,
            extractor: TieredExtractor::new(),
        }
    }
}

impl Default for PrescriptionSession {
    fn default() -> Self {
        Self::new()
    }
}
