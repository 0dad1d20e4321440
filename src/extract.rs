//! Text extraction from raw PDF bytes.
//!
//! Parsing is delegated to `lopdf`. Pages are visited in document order and each page's text is
//! followed by a newline before the whole result is trimmed.

use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Errors raised while turning PDF bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The byte stream could not be parsed as a PDF, or a page could not be decoded.
    #[error("{0}")]
    InvalidDocument(String),
}

/// Extract the text of every page, in order, from an in-memory PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::InvalidDocument(
            "document stream is empty".into(),
        ));
    }

    // lopdf can panic on some malformed inputs; report those like any other parse failure.
    match panic::catch_unwind(AssertUnwindSafe(|| extract_pages(bytes))) {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::InvalidDocument(
            "PDF parser aborted on malformed input".into(),
        )),
    }
}

fn extract_pages(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes)
        .map_err(|error| ExtractionError::InvalidDocument(error.to_string()))?;

    let mut text = String::new();
    for page_number in document.get_pages().into_keys() {
        let page_text = document.extract_text(&[page_number]).map_err(|error| {
            ExtractionError::InvalidDocument(format!("page {page_number}: {error}"))
        })?;
        text.push_str(&page_text);
        text.push('\n');
    }

    tracing::debug!(
        bytes = bytes.len(),
        chars = text.chars().count(),
        "Extracted PDF text"
    );
    Ok(text.trim().to_string())
}
