//! Upload pipeline: validation, text extraction, summarization, and topic detection.

mod service;
pub mod types;

pub use service::{DocumentApi, DocumentService, MIN_TEXT_CHARS, validate_filename};
pub use types::{DocumentDigest, ProcessingError, UploadedDocument};
