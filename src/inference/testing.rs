//! Deterministic inference stub used by unit tests.

use super::{InferenceClient, InferenceError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A recorded call to the stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InferenceCall {
    Text(String),
    Image { payload: String, mime_type: String },
}

/// Records every call and answers with a fixed summary, or fails when configured to.
#[derive(Clone)]
pub(crate) struct RecordingInferenceClient {
    calls: Arc<Mutex<Vec<InferenceCall>>>,
    reply: Option<String>,
}

impl RecordingInferenceClient {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Some(reply.to_string()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: None,
        }
    }

    pub(crate) async fn recorded_calls(&self) -> Vec<InferenceCall> {
        self.calls.lock().await.clone()
    }

    fn answer(&self) -> Result<String, InferenceError> {
        self.reply.clone().ok_or_else(|| InferenceError::Upstream {
            status: 500,
            body: "stub failure".into(),
        })
    }
}

#[async_trait]
impl InferenceClient for RecordingInferenceClient {
    async fn summarize_text(&self, raw_text: &str) -> Result<String, InferenceError> {
        self.calls
            .lock()
            .await
            .push(InferenceCall::Text(raw_text.to_string()));
        self.answer()
    }

    async fn summarize_image(
        &self,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<String, InferenceError> {
        self.calls.lock().await.push(InferenceCall::Image {
            payload: base64_payload.to_string(),
            mime_type: mime_type.to_string(),
        });
        self.answer()
    }
}
