use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, JSON_ONLY_SUFFIX, Provider, TokenUsage};
use crate::error::LlmError;

/// Local Ollama server over its `/api/generate` endpoint.
pub struct OllamaProvider {
    client: reqwest::Client,
    host: String,
}

impl OllamaProvider {
    pub fn new(host: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.host)
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    model: Option<String>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
    done_reason: Option<String>,
}

/// `/api/generate` has no system role, so the system message is folded
/// into the prompt. Sampling parameters are only read from `options`.
fn build_request(req: &GenerateRequest) -> OllamaRequest {
    let mut prompt = match req.system.as_deref().filter(|s| !s.is_empty()) {
        Some(system) => format!("{system}\n\n{}", req.prompt),
        None => req.prompt.clone(),
    };
    if req.json_mode {
        prompt.push_str(JSON_ONLY_SUFFIX);
    }

    OllamaRequest {
        model: req.model.clone(),
        prompt,
        stream: false,
        options: OllamaOptions {
            temperature: req.temperature,
            num_predict: req.max_tokens,
        },
    }
}

fn usage_of(resp: &OllamaResponse) -> TokenUsage {
    match (resp.prompt_eval_count, resp.eval_count) {
        (input, Some(output)) => TokenUsage::reported(input.unwrap_or(0), output),
        _ => TokenUsage::estimate_from_output(&resp.response),
    }
}

#[async_trait::async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = build_request(req);

        tracing::debug!(host = %self.host, model = %req.model, "Sending Ollama request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::generation(self.name(), e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::generation(
                self.name(),
                format!("Ollama API error ({status}): {error_body}"),
            ));
        }

        let resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::generation(self.name(), e))?;

        let usage = usage_of(&resp);

        Ok(GenerateResponse {
            model: resp.model.unwrap_or_else(|| req.model.clone()),
            finish_reason: resp.done_reason.unwrap_or_default(),
            content: resp.response,
            usage,
        })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(system: Option<&str>, json_mode: bool) -> GenerateRequest {
        GenerateRequest {
            model: "llama2".to_string(),
            system: system.map(str::to_string),
            prompt: "Write a title".to_string(),
            temperature: 0.7,
            max_tokens: 3000,
            json_mode,
        }
    }

    #[test]
    fn test_system_message_folded_into_prompt() {
        let body = build_request(&request(Some("You are terse."), false));
        assert_eq!(body.prompt, "You are terse.\n\nWrite a title");
    }

    #[test]
    fn test_json_mode_appends_suffix() {
        let body = build_request(&request(None, true));
        assert_eq!(
            body.prompt,
            "Write a title\n\nRespond ONLY with valid JSON. No markdown, no explanations."
        );
    }

    #[test]
    fn test_request_body_shape() {
        let mut req = request(None, false);
        req.temperature = 0.5;
        let body = serde_json::to_value(build_request(&req)).unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 3000);
        assert_eq!(body["options"]["temperature"], 0.5);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["model"], "llama2");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = OllamaProvider::new("http://localhost:11434/");
        assert_eq!(provider.endpoint(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_usage_prefers_eval_counts() {
        let resp: OllamaResponse = serde_json::from_str(
            r#"{"response": "a b c", "prompt_eval_count": 20, "eval_count": 7}"#,
        )
        .unwrap();
        let usage = usage_of(&resp);
        assert_eq!(usage.total(), 27);
        assert!(!usage.estimated);
    }

    #[test]
    fn test_usage_estimated_without_eval_counts() {
        let resp: OllamaResponse =
            serde_json::from_str(r#"{"response": "one two three four five six seven eight nine ten"}"#)
                .unwrap();
        let usage = usage_of(&resp);
        assert_eq!(usage.total(), 13);
        assert!(usage.estimated);
    }
}
