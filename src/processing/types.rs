//! Core data types and error definitions for the upload pipeline.

use crate::extract::ExtractionError;
use crate::summarize::SummarySource;
use serde::Serialize;
use thiserror::Error;

/// Errors emitted by the document processing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Uploaded filename does not carry a `.pdf` extension.
    #[error("Only PDF files are allowed")]
    InvalidUpload,
    /// Uploaded bytes could not be parsed as a PDF.
    #[error("Failed to extract text from PDF: {0}")]
    InvalidDocument(String),
    /// Extracted text is too short to summarize.
    #[error("PDF appears to be empty or contains no readable text")]
    EmptyContent,
    /// Any other failure while processing the upload.
    #[error("Error processing PDF: {0}")]
    Internal(String),
}

impl ProcessingError {
    /// Whether the failure was caused by the uploaded content rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

impl From<ExtractionError> for ProcessingError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::InvalidDocument(reason) => Self::InvalidDocument(reason),
        }
    }
}

/// File received from a caller. Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Client-supplied filename.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Wrap a filename and its contents.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Result of digesting one uploaded PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDigest {
    /// Short natural-language summary of the document.
    pub summary: String,
    /// Up to five detected topics, in vocabulary order.
    pub topics: Vec<String>,
    /// Character count of the extracted text.
    pub text_length: usize,
    /// Filename as supplied by the caller.
    pub filename: String,
    /// Path that produced `summary`; kept out of the response body.
    #[serde(skip)]
    pub summary_source: SummarySource,
}
