//! Document summarizer with a model-backed primary path and an extractive fallback.
//!
//! Both paths produce a [`Summary`]; a model failure is logged and absorbed here so callers
//! never see an error from summarization.

use crate::summarization::{SummarizationClient, SummarizationRequest};
use regex::Regex;
use std::sync::LazyLock;

/// Input budget handed to the model, in characters.
pub const MAX_INPUT_CHARS: usize = 4000;
/// Upper bound on generated summary length.
pub const MAX_SUMMARY_LENGTH: usize = 4000;
/// Lower bound on generated summary length.
pub const MIN_SUMMARY_LENGTH: usize = 30;
/// Character budget of the extractive fallback.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence break pattern is valid"));

/// Which path produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// Generated by the abstractive model.
    Model,
    /// Derived from the leading sentences of the document.
    Extractive,
}

/// Summary text together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Summary shown to the caller.
    pub text: String,
    /// Path that produced `text`.
    pub source: SummarySource,
}

impl Summary {
    fn model(text: String) -> Self {
        Self {
            text,
            source: SummarySource::Model,
        }
    }

    fn extractive(text: String) -> Self {
        Self {
            text,
            source: SummarySource::Extractive,
        }
    }
}

/// Summarizes extracted document text.
///
/// Holds the long-lived model client so it is created once at start-up rather than per request.
pub struct Summarizer {
    client: Option<Box<dyn SummarizationClient>>,
    model: String,
}

impl Summarizer {
    /// Build a summarizer that tries `client` first and falls back to extractive summaries.
    pub fn new(client: Option<Box<dyn SummarizationClient>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build a summarizer that always uses the extractive fallback.
    pub fn extractive_only() -> Self {
        Self::new(None, String::new())
    }

    /// Whether a model client is configured.
    pub fn has_model(&self) -> bool {
        self.client.is_some()
    }

    /// Summarize `text`. Never fails.
    pub async fn summarize(&self, text: &str) -> Summary {
        let Some(client) = self.client.as_ref() else {
            return Summary::extractive(extractive_summary(text));
        };

        let request = SummarizationRequest {
            model: self.model.clone(),
            text: truncate_chars(text, MAX_INPUT_CHARS).to_string(),
            max_length: MAX_SUMMARY_LENGTH,
            min_length: MIN_SUMMARY_LENGTH,
        };

        match client.generate_summary(request).await {
            Ok(summary) => Summary::model(summary),
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    model = %self.model,
                    "Abstractive summarization failed; falling back to extractive"
                );
                Summary::extractive(extractive_summary(text))
            }
        }
    }
}

/// Build a deterministic summary from the leading sentences of `text`.
///
/// Sentences are accumulated while the running length stays under
/// [`FALLBACK_SUMMARY_CHARS`]; accumulation stops at the first empty or oversized sentence.
/// When nothing fits, the first [`FALLBACK_SUMMARY_CHARS`] characters are returned instead,
/// with an ellipsis if the text was cut.
pub fn extractive_summary(text: &str) -> String {
    let mut summary = String::new();
    let mut summary_chars = 0usize;

    for piece in SENTENCE_BREAK.split(text) {
        let sentence = piece.trim();
        let sentence_chars = sentence.chars().count();
        if sentence.is_empty() || summary_chars + sentence_chars >= FALLBACK_SUMMARY_CHARS {
            break;
        }
        summary.push_str(sentence);
        summary.push_str(". ");
        summary_chars += sentence_chars + 2;
    }

    if summary.is_empty() {
        let prefix = truncate_chars(text, FALLBACK_SUMMARY_CHARS);
        summary = if prefix.len() < text.len() {
            format!("{prefix}...")
        } else {
            text.to_string()
        };
    }

    summary.trim().to_string()
}

/// Borrow at most `max_chars` characters from the front of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
