use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, ResponseFormat,
    },
};

use super::{GenerateRequest, GenerateResponse, JSON_ONLY_SUFFIX, Provider, TokenUsage};
use crate::error::LlmError;

/// How a chat-completions backend is asked for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStrategy {
    /// Native `response_format: json_object`, only for the gpt-4 family.
    ResponseFormat,
    /// Instruction appended to the prompt.
    PromptSuffix,
}

/// OpenAI chat completions, also used for OpenAI-compatible custom endpoints.
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    json_strategy: JsonStrategy,
}

impl OpenAIProvider {
    pub fn new(api_key: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            provider_name: "openai".to_string(),
            json_strategy: JsonStrategy::ResponseFormat,
        }
    }

    pub fn new_custom(api_url: &str, api_key: Option<&str>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.unwrap_or_default())
            .with_api_base(api_url.trim_end_matches('/'));
        Self {
            client: Client::with_config(config),
            provider_name: "custom".to_string(),
            json_strategy: JsonStrategy::PromptSuffix,
        }
    }
}

/// gpt-4 family models accept the native JSON output mode; older ones
/// reject the parameter.
pub fn supports_json_response_format(model: &str) -> bool {
    model.starts_with("gpt-4")
}

/// Prompt text and `response_format` for a request under `strategy`.
fn json_enforcement(
    strategy: JsonStrategy,
    req: &GenerateRequest,
) -> (String, Option<ResponseFormat>) {
    match strategy {
        JsonStrategy::ResponseFormat
            if req.json_mode && supports_json_response_format(&req.model) =>
        {
            (req.prompt.clone(), Some(ResponseFormat::JsonObject))
        }
        JsonStrategy::PromptSuffix if req.json_mode => {
            (format!("{}{JSON_ONLY_SUFFIX}", req.prompt), None)
        }
        _ => (req.prompt.clone(), None),
    }
}

fn build_messages(req: &GenerateRequest, prompt: String) -> Vec<ChatCompletionRequestMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = req.system.as_deref().filter(|s| !s.is_empty()) {
        messages.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                name: None,
            },
        ));
    }
    messages.push(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(prompt),
            name: None,
        },
    ));
    messages
}

#[async_trait::async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let (prompt, response_format) = json_enforcement(self.json_strategy, req);

        #[allow(deprecated)]
        let request = CreateChatCompletionRequest {
            model: req.model.clone(),
            messages: build_messages(req, prompt),
            temperature: Some(req.temperature),
            max_completion_tokens: Some(req.max_tokens),
            response_format,
            ..Default::default()
        };

        tracing::debug!(
            provider = %self.provider_name,
            model = %req.model,
            max_tokens = req.max_tokens,
            "Sending chat completion request"
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::generation(&self.provider_name, e))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let finish_reason = response
            .choices
            .first()
            .and_then(|c| c.finish_reason)
            .map(|r| format!("{r:?}").to_lowercase())
            .unwrap_or_default();

        let usage = match &response.usage {
            Some(usage) => TokenUsage::reported(usage.prompt_tokens, usage.completion_tokens),
            None => TokenUsage::estimate_from_output(&content),
        };

        Ok(GenerateResponse {
            content,
            model: response.model,
            usage,
            finish_reason,
        })
    }

    fn name(&self) -> &str {
        &self.provider_name
    }
}
