//! Error types for the rxscan-core library.

use thiserror::Error;

/// Main error type for the rxscan library.
#[derive(Error, Debug)]
pub enum RxError {
    /// Persistence error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session state error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Conflict check error.
    #[error("conflict check error: {0}")]
    Check(#[from] CheckError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to key-value persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying store rejected the operation.
    #[error("backend failure: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("malformed value under key {key}: {reason}")]
    Malformed { key: String, reason: String },
}

/// Errors related to prescription session state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Allergy name was empty after trimming.
    #[error("allergy name is empty")]
    EmptyAllergy,

    /// Allergy is already on the list (case-insensitive).
    #[error("allergy already recorded: {0}")]
    DuplicateAllergy(String),

    /// A slot has no extracted medicines yet.
    #[error("no medicines recorded for prescription {0}")]
    MissingMedicines(String),

    /// A slot is still waiting for OCR output.
    #[error("prescription {0} is still being processed")]
    StillProcessing(String),
}

/// Errors related to the conflict-check endpoint.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Request could not be sent or the connection failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not a valid report.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Result type for the rxscan library.
pub type Result<T> = std::result::Result<T, RxError>;
