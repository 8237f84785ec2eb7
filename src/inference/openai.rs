use super::{InferenceClient, InferenceError, data_url, prompts};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Inference client backed by the OpenAI Responses API.
///
/// Each call is a single request with no retry; the reqwest default timeout applies.
pub struct OpenAiResponsesClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiResponsesClient {
    /// Build a client for the given endpoint, key, and model.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .user_agent(concat!("lab-simplifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| InferenceError::Client(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from the loaded service configuration.
    pub fn from_config(config: &Config) -> Result<Self, InferenceError> {
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }

    async fn create_response(
        &self,
        instructions: &str,
        content: Vec<InputContent<'_>>,
    ) -> Result<String, InferenceError> {
        let payload = ResponsesRequest {
            model: &self.model,
            instructions,
            input: vec![InputMessage {
                role: "user",
                content,
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                InferenceError::Transport(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: ResponsesResponse = response.json().await.map_err(|error| {
            InferenceError::InvalidResponse(format!("failed to decode response: {error}"))
        })?;

        body.into_output_text().ok_or_else(|| {
            InferenceError::InvalidResponse("response contained no output text".into())
        })
    }
}

#[async_trait]
impl InferenceClient for OpenAiResponsesClient {
    async fn summarize_text(&self, raw_text: &str) -> Result<String, InferenceError> {
        let prompt = prompts::text_prompt(raw_text);
        tracing::debug!(model = %self.model, chars = raw_text.len(), "Requesting text summary");
        self.create_response(
            prompts::TEXT_INSTRUCTIONS,
            vec![InputContent::InputText { text: &prompt }],
        )
        .await
    }

    async fn summarize_image(
        &self,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<String, InferenceError> {
        tracing::debug!(
            model = %self.model,
            mime_type,
            encoded_len = base64_payload.len(),
            "Requesting image summary"
        );
        self.create_response(
            prompts::IMAGE_INSTRUCTIONS,
            vec![
                InputContent::InputText {
                    text: prompts::IMAGE_PROMPT,
                },
                InputContent::InputImage {
                    image_url: data_url(mime_type, base64_payload),
                },
            ],
        )
        .await
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputContent<'a> {
    InputText { text: &'a str },
    InputImage { image_url: String },
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part, mirroring the SDK's `output_text` convenience.
    fn into_output_text(self) -> Option<String> {
        if let Some(text) = self.output_text {
            return Some(text);
        }

        let mut parts = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .peekable();
        parts.peek()?;
        Some(parts.collect())
    }
}
