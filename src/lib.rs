#![deny(missing_docs)]

//! Core library for the PDF Digest service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Processing counters.
pub mod metrics;
/// Upload processing pipeline.
pub mod processing;
/// Summarization provider abstraction and adapters.
pub mod summarization;
/// Summaries with model and extractive paths.
pub mod summarize;
/// Topic vocabulary and detection.
pub mod topics;
