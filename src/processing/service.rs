//! Processing service coordinating validation, extraction, summarization, and topic detection.

use crate::{
    config::Config,
    extract::extract_text,
    metrics::{DigestMetrics, MetricsSnapshot},
    processing::types::{DocumentDigest, ProcessingError, UploadedDocument},
    summarization::{SummarizationClientError, build_summarization_client},
    summarize::Summarizer,
    topics::{TopicVocabulary, detect_topics},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Minimum number of extracted characters worth summarizing.
pub const MIN_TEXT_CHARS: usize = 10;

/// Runs the upload pipeline: extension check, text extraction, summary, and topic tags.
///
/// The service owns the long-lived summarizer, the shared topic vocabulary, and the metrics
/// registry. Construct it once near process start and share it through an `Arc`.
pub struct DocumentService {
    summarizer: Summarizer,
    vocabulary: Arc<TopicVocabulary>,
    metrics: Arc<DigestMetrics>,
}

/// Abstraction over the processing pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Reject filenames that cannot be processed, before any content is read.
    fn check_filename(&self, filename: &str) -> Result<(), ProcessingError>;

    /// Extract, summarize, and tag an uploaded document.
    async fn process_upload(
        &self,
        upload: UploadedDocument,
    ) -> Result<DocumentDigest, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl DocumentService {
    /// Assemble a service from an existing summarizer and vocabulary.
    pub fn new(summarizer: Summarizer, vocabulary: Arc<TopicVocabulary>) -> Self {
        Self {
            summarizer,
            vocabulary,
            metrics: Arc::new(DigestMetrics::new()),
        }
    }

    /// Build a service from configuration, creating the summarization client up front.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        tracing::info!(provider = ?config.summarization_provider, "Initializing summarization client");
        let client = build_summarization_client(config)?;
        if client.is_none() {
            tracing::info!("No summarization model configured; using extractive summaries");
        }
        let summarizer = Summarizer::new(client, config.summarization_model.clone());
        let vocabulary = Arc::new(TopicVocabulary::default());
        tracing::debug!(topics = vocabulary.len(), "Topic vocabulary loaded");
        Ok(Self::new(summarizer, vocabulary))
    }

    /// Reject filenames that do not end in `.pdf` (case-insensitive).
    pub fn check_filename(&self, filename: &str) -> Result<(), ProcessingError> {
        validate_filename(filename).inspect_err(|_| {
            self.metrics.record_rejection();
            tracing::info!(filename, "Rejected non-PDF upload");
        })
    }

    /// Extract, summarize, and tag an uploaded document.
    pub async fn process_upload(
        &self,
        upload: UploadedDocument,
    ) -> Result<DocumentDigest, ProcessingError> {
        let filename = upload.filename.clone();
        let result = self.digest(upload).await;
        match &result {
            Ok(digest) => {
                self.metrics.record_document(digest.summary_source);
                tracing::info!(
                    filename = %digest.filename,
                    text_length = digest.text_length,
                    topics = digest.topics.len(),
                    summary_source = ?digest.summary_source,
                    "Upload processed"
                );
            }
            Err(error) => self.record_error(&filename, error),
        }
        result
    }

    /// Count a failed upload as a rejection (bad input) or a server-side failure.
    fn record_error(&self, filename: &str, error: &ProcessingError) {
        if error.is_client_error() {
            self.metrics.record_rejection();
            tracing::info!(filename, error = %error, "Upload rejected");
        } else {
            self.metrics.record_failure();
            tracing::error!(filename, error = %error, "Upload processing failed");
        }
    }

    async fn digest(&self, upload: UploadedDocument) -> Result<DocumentDigest, ProcessingError> {
        let UploadedDocument { filename, bytes } = upload;
        validate_filename(&filename)?;

        tracing::debug!(filename = %filename, bytes = bytes.len(), "Extracting PDF text");
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|error| ProcessingError::Internal(error.to_string()))??;

        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return Err(ProcessingError::EmptyContent);
        }

        let (summary, topics) = tokio::join!(self.summarizer.summarize(&text), async {
            detect_topics(&text, &self.vocabulary)
        });

        Ok(DocumentDigest {
            summary: summary.text,
            topics,
            text_length: text.chars().count(),
            filename,
            summary_source: summary.source,
        })
    }

    /// Snapshot processing counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Accept only filenames ending in `.pdf`, ignoring case.
pub fn validate_filename(filename: &str) -> Result<(), ProcessingError> {
    if filename.to_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(ProcessingError::InvalidUpload)
    }
}

#[async_trait]
impl DocumentApi for DocumentService {
    fn check_filename(&self, filename: &str) -> Result<(), ProcessingError> {
        DocumentService::check_filename(self, filename)
    }

    async fn process_upload(
        &self,
        upload: UploadedDocument,
    ) -> Result<DocumentDigest, ProcessingError> {
        DocumentService::process_upload(self, upload).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DocumentService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> DocumentService {
        DocumentService::new(
            Summarizer::extractive_only(),
            Arc::new(TopicVocabulary::default()),
        )
    }

    #[test]
    fn filename_check_is_case_insensitive() {
        assert!(validate_filename("report.pdf").is_ok());
        assert!(validate_filename("REPORT.PDF").is_ok());
        assert!(matches!(
            validate_filename("report.pdf.txt"),
            Err(ProcessingError::InvalidUpload)
        ));
        assert!(validate_filename("pdf").is_err());
    }

    #[tokio::test]
    async fn rejects_wrong_extension_without_parsing() {
        let service = service();
        let error = service
            .process_upload(UploadedDocument::new("notes.txt", b"not read".to_vec()))
            .await
            .expect_err("wrong extension");

        assert!(matches!(error, ProcessingError::InvalidUpload));
        assert_eq!(error.to_string(), "Only PDF files are allowed");
        assert_eq!(service.metrics_snapshot().rejected_uploads, 1);
    }

    #[tokio::test]
    async fn unparseable_bytes_are_invalid_documents() {
        let service = service();
        let error = service
            .process_upload(UploadedDocument::new("broken.pdf", b"%PDF-garbage".to_vec()))
            .await
            .expect_err("corrupt pdf");

        assert!(matches!(error, ProcessingError::InvalidDocument(_)));
        assert!(error.is_client_error());
        assert!(
            error
                .to_string()
                .starts_with("Failed to extract text from PDF: ")
        );
    }

    #[test]
    fn check_filename_counts_rejections() {
        let service = service();
        assert!(service.check_filename("slides.pptx").is_err());
        assert!(service.check_filename("slides.pdf").is_ok());
        assert_eq!(service.metrics_snapshot().rejected_uploads, 1);
    }

    #[tokio::test]
    async fn internal_errors_are_counted_as_failures_not_rejections() {
        let service = service();
        service
            .process_upload(UploadedDocument::new("broken.pdf", b"%PDF-garbage".to_vec()))
            .await
            .expect_err("corrupt pdf");
        service.record_error("report.pdf", &ProcessingError::Internal("worker panicked".into()));

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.rejected_uploads, 1);
        assert_eq!(snapshot.failed_uploads, 1);
        assert_eq!(snapshot.documents_processed, 0);
    }
}
