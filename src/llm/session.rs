use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use serde_json::Value;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{GenerateRequest, GenerateResponse, Provider};
use crate::error::LlmError;
use crate::telemetry::metrics::{GEN_AI_ERROR_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_TOKEN_USAGE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            json_mode: true,
        }
    }
}

/// A resolved provider bound to a model.
///
/// The token counter reflects the most recent call only; it is overwritten,
/// not accumulated.
pub struct ProviderSession {
    provider: Arc<dyn Provider>,
    model: String,
    timeout: Duration,
    last_tokens_used: u32,
    last_tokens_estimated: bool,
}

impl ProviderSession {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout,
            last_tokens_used: 0,
            last_tokens_estimated: false,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn last_tokens_used(&self) -> u32 {
        self.last_tokens_used
    }

    pub fn last_tokens_estimated(&self) -> bool {
        self.last_tokens_estimated
    }

    pub async fn generate(
        &mut self,
        prompt: &str,
        system: Option<&str>,
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        let req = GenerateRequest {
            model: self.model.clone(),
            system: system.map(str::to_string),
            prompt: prompt.to_string(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            json_mode: options.json_mode,
        };

        let resp = self.generate_once(&req).await?;

        self.last_tokens_used = resp.usage.total();
        self.last_tokens_estimated = resp.usage.estimated;
        tracing::debug!(
            provider = self.provider.name(),
            model = %resp.model,
            tokens_used = self.last_tokens_used,
            tokens_estimated = self.last_tokens_estimated,
            "LLM call completed"
        );

        Ok(resp.content)
    }

    /// Generates with JSON mode on and decodes the reply.
    ///
    /// Text that is not JSON (after unwrapping a markdown fence, if any) is a
    /// [`LlmError::InvalidResponseFormat`], never a transport error.
    pub async fn generate_json(
        &mut self,
        prompt: &str,
        system: Option<&str>,
        options: GenerationOptions,
    ) -> Result<Value, LlmError> {
        let text = self
            .generate(
                prompt,
                system,
                GenerationOptions {
                    json_mode: true,
                    ..options
                },
            )
            .await?;

        parse_json_reply(&text).map_err(|err| {
            tracing::error!(
                provider = self.provider.name(),
                reply = %truncate(&text, 500),
                error = %err,
                "Failed to parse JSON response"
            );
            LlmError::InvalidResponseFormat(err.to_string())
        })
    }

    async fn generate_once(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let provider_name = self.provider.name().to_string();
        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.request.json_mode = req.json_mode,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.usage.estimated = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        {
            let mut user_event_attrs =
                vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))];
            if let Some(system) = req.system.as_deref().filter(|s| !s.is_empty()) {
                user_event_attrs.push(KeyValue::new(
                    "gen_ai.system_instructions",
                    truncate(system, 500),
                ));
            }
            span.add_event("gen_ai.user.message", user_event_attrs);
        }

        let call = self.provider.generate(req).instrument(span.clone());
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::generation(
                &provider_name,
                format!("request timed out after {}s", self.timeout.as_secs()),
            )),
        };

        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(resp) => {
                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.usage.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.usage.output_tokens as i64);
                span.record("gen_ai.usage.estimated", resp.usage.estimated);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
                let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name.clone());
                let model_kv = KeyValue::new("gen_ai.request.model", req.model.clone());

                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.usage.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.usage.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(resp)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", err.kind());

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[
                        KeyValue::new("gen_ai.provider.name", provider_name.clone()),
                        KeyValue::new("gen_ai.request.model", req.model.clone()),
                        KeyValue::new("error.type", err.kind()),
                    ],
                );

                tracing::error!(
                    provider = %provider_name,
                    model = %req.model,
                    error = %err,
                    "LLM call failed"
                );

                Err(err)
            }
        }
    }
}

/// Decodes a model reply, unwrapping a markdown fence only when the raw text
/// is not already valid JSON. Prose around a bare object is rejected.
pub(crate) fn parse_json_reply(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text.trim()) {
        Ok(value) => Ok(value),
        Err(err) => {
            let extracted = extract_json(text);
            serde_json::from_str(&extracted).map_err(|_| err)
        }
    }
}

pub(crate) fn extract_json(content: &str) -> String {
    if let Some(start) = content.find("```json")
        && let Some(end) = content[start + 7..].find("```")
    {
        return content[start + 7..start + 7 + end].trim().to_string();
    }
    if let Some(start) = content.find("```")
        && let Some(end) = content[start + 3..].find("```")
    {
        let inner = content[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }
    content.to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TokenUsage;
    use crate::llm::mock::MockProvider;
    use tokio_test::{assert_err, assert_ok};

    fn session(provider: MockProvider) -> (Arc<MockProvider>, ProviderSession) {
        let provider = Arc::new(provider);
        let session = ProviderSession::new(provider.clone(), "test-model", Duration::from_secs(5));
        (provider, session)
    }

    #[tokio::test]
    async fn test_generate_json_rejects_prose() {
        let (_, mut session) = session(MockProvider::replying("not json"));
        let result = session
            .generate_json("prompt", None, GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(LlmError::InvalidResponseFormat(_))));
    }

    #[tokio::test]
    async fn test_generate_json_rejects_object_wrapped_in_prose() {
        let (_, mut session) = session(MockProvider::replying(
            "Sure! Here is your article: {\"title\": \"x\"} Hope this helps.",
        ));
        let result = session
            .generate_json("prompt", None, GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(LlmError::InvalidResponseFormat(_))));
    }

    #[tokio::test]
    async fn test_generate_json_forces_json_mode() {
        let (provider, mut session) = session(MockProvider::replying(r#"{"title": "x"}"#));
        let options = GenerationOptions {
            temperature: 0.3,
            max_tokens: 10,
            json_mode: false,
        };
        let value = assert_ok!(session.generate_json("prompt", Some("sys"), options).await);
        assert_eq!(value["title"], "x");

        let call = provider.last_call().unwrap();
        assert!(call.json_mode);
        assert_eq!(call.model, "test-model");
        assert_eq!(call.system.as_deref(), Some("sys"));
        assert_eq!(call.max_tokens, 10);
    }

    #[tokio::test]
    async fn test_generate_json_keeps_top_level_arrays() {
        let (_, mut session) = session(MockProvider::replying(r#"[{"title": "x"}]"#));
        let value = assert_ok!(
            session
                .generate_json("prompt", None, GenerationOptions::default())
                .await
        );
        assert!(value.is_array());
    }

    #[tokio::test]
    async fn test_generate_json_unwraps_markdown_fence() {
        let (_, mut session) =
            session(MockProvider::replying("Sure!\n```json\n{\"slug\": \"a-b\"}\n```"));
        let value = assert_ok!(
            session
                .generate_json("prompt", None, GenerationOptions::default())
                .await
        );
        assert_eq!(value["slug"], "a-b");
    }

    #[tokio::test]
    async fn test_transport_failure_is_generation_error() {
        let (_, mut session) = session(MockProvider::failing("503 service unavailable"));
        let err = assert_err!(
            session
                .generate("prompt", None, GenerationOptions::default())
                .await
        );
        assert!(matches!(err, LlmError::Generation { .. }));
        assert_eq!(session.last_tokens_used(), 0);
    }

    #[tokio::test]
    async fn test_token_counter_is_overwritten() {
        let (_, mut session) = session(
            MockProvider::replying("{}").with_usage(TokenUsage::reported(10, 5)),
        );
        assert_ok!(session.generate("a", None, GenerationOptions::default()).await);
        assert_eq!(session.last_tokens_used(), 15);
        assert_ok!(session.generate("b", None, GenerationOptions::default()).await);
        assert_eq!(session.last_tokens_used(), 15);
        assert!(!session.last_tokens_estimated());
    }

    #[tokio::test]
    async fn test_timeout_applies_to_every_provider() {
        struct SlowProvider;

        #[async_trait::async_trait]
        impl Provider for SlowProvider {
            async fn generate(
                &self,
                _req: &GenerateRequest,
            ) -> Result<GenerateResponse, LlmError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(LlmError::generation("slow", "unreachable"))
            }

            fn name(&self) -> &str {
                "slow"
            }
        }

        let mut session =
            ProviderSession::new(Arc::new(SlowProvider), "m", Duration::from_millis(20));
        let err = assert_err!(
            session
                .generate("prompt", None, GenerationOptions::default())
                .await
        );
        assert!(err.to_string().contains("timed out"));
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_extract_json_markdown_block() {
        let input = "Here is the result:\n```json\n{\"title\": \"x\"}\n```\nDone.";
        assert_eq!(extract_json(input), "{\"title\": \"x\"}");
    }

    #[test]
    fn test_extract_json_leaves_unfenced_prose() {
        let input = "The result is {\"a\": 1} and that's it.";
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_json_no_json() {
        let input = "No JSON here at all";
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("hé世界!", 3);
        assert!(result.len() <= 3);
        assert!(result.is_char_boundary(result.len()));
    }
}
