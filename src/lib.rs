#![deny(missing_docs)]

//! Core library for the lab report simplifier service.

/// HTTP routing and the upload handler.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Language-model client abstraction and adapters.
pub mod inference;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload classification and summarization pipeline.
pub mod processing;
