//! Core data types and error definitions for the simplification pipeline.

use crate::{extraction::ExtractionError, inference::InferenceError};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// A single uploaded document as received from the caller.
///
/// Filename and content type are trusted as declared; missing values are stored as empty
/// strings.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Raw file contents.
    pub bytes: Bytes,
    /// Filename declared by the client.
    pub filename: String,
    /// Content type declared by the client.
    pub content_type: String,
}

/// Input branch that produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Text was extracted from a PDF.
    Pdf,
    /// An image was forwarded to the model.
    Image,
}

impl SourceType {
    /// Wire representation used in responses and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

/// Outcome of a successful simplification, serialized directly as the response body.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifyResult {
    summary: String,
    source_type: SourceType,
}

impl SimplifyResult {
    /// Pair a model summary with the branch that produced it.
    pub fn new(summary: String, source_type: SourceType) -> Self {
        Self {
            summary,
            source_type,
        }
    }

    /// Model output, unmodified.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Branch that produced the summary.
    pub fn source_type(&self) -> SourceType {
        self.source_type
    }
}

/// Errors emitted while simplifying an upload.
///
/// Display strings for the client-facing variants are the exact messages returned to callers.
#[derive(Debug, Error)]
pub enum SimplifyError {
    /// Upload carried zero bytes.
    #[error("Uploaded file is empty.")]
    EmptyUpload,
    /// Neither the filename nor the content type identified a PDF or image.
    #[error("Unsupported file type. Upload a PDF or image file.")]
    UnsupportedFileType,
    /// The PDF could not be parsed.
    #[error("Unable to read PDF. Make sure the file is not scanned or blurry.")]
    UnreadablePdf(#[from] ExtractionError),
    /// The PDF parsed but contained no extractable text.
    #[error("No readable text found in PDF.")]
    NoReadableText,
    /// The inference provider failed.
    #[error("Failed to generate summary: {0}")]
    Inference(#[from] InferenceError),
    /// A background task failed unexpectedly.
    #[error("Internal error: {0}")]
    Internal(String),
}
