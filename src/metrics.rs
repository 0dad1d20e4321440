use crate::summarize::SummarySource;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing upload processing activity.
#[derive(Default)]
pub struct DigestMetrics {
    documents_processed: AtomicU64,
    model_summaries: AtomicU64,
    extractive_summaries: AtomicU64,
    rejected_uploads: AtomicU64,
    failed_uploads: AtomicU64,
}

impl DigestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed document and the path that summarized it.
    pub fn record_document(&self, source: SummarySource) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        let counter = match source {
            SummarySource::Model => &self.model_summaries,
            SummarySource::Extractive => &self.extractive_summaries,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload rejected because of its content (extension, parse, or empty text).
    pub fn record_rejection(&self) {
        self.rejected_uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload that failed on the server side.
    pub fn record_failure(&self) {
        self.failed_uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            model_summaries: self.model_summaries.load(Ordering::Relaxed),
            extractive_summaries: self.extractive_summaries.load(Ordering::Relaxed),
            rejected_uploads: self.rejected_uploads.load(Ordering::Relaxed),
            failed_uploads: self.failed_uploads.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of processing counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents digested since startup.
    pub documents_processed: u64,
    /// Digests whose summary came from the model.
    pub model_summaries: u64,
    /// Digests whose summary came from the extractive fallback.
    pub extractive_summaries: u64,
    /// Uploads rejected for validation, parse, or empty-content errors.
    pub rejected_uploads: u64,
    /// Uploads that failed with a server-side error.
    pub failed_uploads: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_by_summary_source() {
        let metrics = DigestMetrics::new();
        metrics.record_document(SummarySource::Model);
        metrics.record_document(SummarySource::Extractive);
        metrics.record_document(SummarySource::Extractive);
        metrics.record_rejection();
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_processed, 3);
        assert_eq!(snapshot.model_summaries, 1);
        assert_eq!(snapshot.extractive_summaries, 2);
        assert_eq!(snapshot.rejected_uploads, 1);
        assert_eq!(snapshot.failed_uploads, 1);
    }

    #[test]
    fn snapshot_starts_empty() {
        assert_eq!(DigestMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
