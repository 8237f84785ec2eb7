//! Abstractions for generating plain-language summaries via a hosted language model.
//!
//! The processing layer only sees [`InferenceClient`]; the production implementation talks to
//! the OpenAI Responses API, and tests substitute a deterministic stub. Model output is passed
//! through untouched, including the disclaimer the instructions ask for.

mod openai;
pub mod prompts;
#[cfg(test)]
pub(crate) mod testing;

pub use openai::OpenAiResponsesClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced while calling the inference provider.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// HTTP client could not be constructed.
    #[error("Failed to build inference client: {0}")]
    Client(String),
    /// Provider could not be reached.
    #[error("Inference provider unreachable: {0}")]
    Transport(String),
    /// Provider answered with a non-success status.
    #[error("Inference provider returned {status}: {body}")]
    Upstream {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },
    /// Provider response could not be decoded.
    #[error("Malformed inference response: {0}")]
    InvalidResponse(String),
}

/// Capability exposing the two summarization entry points.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Summarize text extracted from a lab report.
    async fn summarize_text(&self, raw_text: &str) -> Result<String, InferenceError>;

    /// Summarize a lab report image supplied as a base64 payload of the given mime type.
    async fn summarize_image(
        &self,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<String, InferenceError>;
}

/// Wrap a base64 payload in a `data:` URL.
pub fn data_url(mime_type: &str, base64_payload: &str) -> String {
    format!("data:{mime_type};base64,{base64_payload}")
}
