//! Simplification service coordinating classification, extraction, and inference.

use crate::{
    extraction::extract_pdf_text,
    inference::InferenceClient,
    processing::{
        classify::classify,
        types::{SimplifyError, SimplifyResult, SourceType, UploadedFile},
    },
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use std::sync::Arc;

/// Abstraction over the simplification pipeline used by the HTTP surface.
#[async_trait]
pub trait SimplifyApi: Send + Sync {
    /// Classify an upload and produce a plain-language summary for it.
    async fn simplify(&self, upload: UploadedFile) -> Result<SimplifyResult, SimplifyError>;
}

/// Routes uploads to the PDF or image branch and delegates summarization to an injected
/// [`InferenceClient`].
///
/// The service holds no per-request state; construct it once and share it through an `Arc`.
pub struct SimplifyService {
    inference: Arc<dyn InferenceClient>,
}

impl SimplifyService {
    /// Build a service around the given inference capability.
    pub fn new(inference: Arc<dyn InferenceClient>) -> Self {
        Self { inference }
    }

    async fn simplify_pdf(&self, bytes: Bytes) -> Result<String, SimplifyError> {
        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|error| {
                SimplifyError::Internal(format!("PDF extraction task failed: {error}"))
            })??;
        if text.is_empty() {
            return Err(SimplifyError::NoReadableText);
        }

        tracing::debug!(chars = text.len(), "Extracted text from PDF");
        Ok(self.inference.summarize_text(&text).await?)
    }

    async fn simplify_image(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, SimplifyError> {
        let payload = STANDARD.encode(bytes);
        Ok(self.inference.summarize_image(&payload, mime_type).await?)
    }
}

#[async_trait]
impl SimplifyApi for SimplifyService {
    async fn simplify(&self, upload: UploadedFile) -> Result<SimplifyResult, SimplifyError> {
        let UploadedFile {
            bytes,
            filename,
            content_type,
        } = upload;

        if bytes.is_empty() {
            return Err(SimplifyError::EmptyUpload);
        }

        let source_type =
            classify(&filename, &content_type).ok_or(SimplifyError::UnsupportedFileType)?;
        tracing::info!(
            source_type = source_type.as_str(),
            size = bytes.len(),
            content_type = %content_type,
            "Simplifying upload"
        );

        let summary = match source_type {
            SourceType::Pdf => self.simplify_pdf(bytes).await?,
            SourceType::Image => self.simplify_image(&bytes, &content_type).await?,
        };
        Ok(SimplifyResult::new(summary, source_type))
    }
}
