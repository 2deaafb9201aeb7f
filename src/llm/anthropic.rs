use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, Provider, TokenUsage};
use crate::error::LlmError;

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
    usage: Option<AnthropicUsage>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// The Messages API takes the system prompt as a top-level field and has no
/// JSON output mode; the system message already demands JSON.
fn build_request(req: &GenerateRequest) -> AnthropicRequest {
    AnthropicRequest {
        model: req.model.clone(),
        max_tokens: req.max_tokens,
        temperature: req.temperature,
        system: req.system.clone().filter(|s| !s.is_empty()),
        messages: vec![AnthropicMessage {
            role: "user".to_string(),
            content: req.prompt.clone(),
        }],
    }
}

#[async_trait::async_trait]
impl Provider for AnthropicProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| LlmError::generation(self.name(), format!("invalid API key header: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = build_request(req);

        tracing::debug!(model = %req.model, max_tokens = req.max_tokens, "Sending Anthropic request");

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::generation(self.name(), e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<AnthropicError>(&error_body) {
                Ok(err) => err.error.message,
                Err(_) => error_body,
            };
            return Err(LlmError::generation(
                self.name(),
                format!("Anthropic API error ({status}): {message}"),
            ));
        }

        let resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::generation(self.name(), e))?;

        let content = resp
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let usage = match resp.usage {
            Some(usage) => TokenUsage::reported(usage.input_tokens, usage.output_tokens),
            None => TokenUsage::estimate_from_output(&content),
        };

        Ok(GenerateResponse {
            content,
            model: resp.model,
            usage,
            finish_reason: resp.stop_reason.unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
