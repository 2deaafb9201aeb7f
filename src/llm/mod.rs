pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod registry;
pub mod session;

pub use registry::{LlmSettings, ProviderKind, check, resolve, resolve_with_model};
pub use session::{GenerationOptions, ProviderSession};

use crate::error::LlmError;

/// Appended to the prompt for backends that have no native JSON output mode.
pub const JSON_ONLY_SUFFIX: &str = "\n\nRespond ONLY with valid JSON. No markdown, no explanations.";

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

/// Token cost of a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// True when the vendor reported nothing and the figure is a word-count
    /// approximation.
    pub estimated: bool,
}

impl TokenUsage {
    pub fn reported(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            estimated: false,
        }
    }

    /// Best-effort approximation: 1.3 tokens per whitespace-separated word
    /// of output. Not suitable for billing.
    pub fn estimate_from_output(text: &str) -> Self {
        let words = text.split_whitespace().count() as f64;
        Self {
            input_tokens: 0,
            output_tokens: (words * 1.3).ceil() as u32,
            estimated: true,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: String,
}

/// One LLM vendor backend.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError>;
    fn name(&self) -> &str;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_from_output_rounds_up() {
        let usage = TokenUsage::estimate_from_output("one two three");
        assert_eq!(usage.output_tokens, 4);
        assert_eq!(usage.total(), 4);
        assert!(usage.estimated);
    }

    #[test]
    fn test_estimate_from_empty_output() {
        let usage = TokenUsage::estimate_from_output("");
        assert_eq!(usage.total(), 0);
    }

    #[test]
    fn test_reported_usage_total() {
        let usage = TokenUsage::reported(120, 80);
        assert_eq!(usage.total(), 200);
        assert!(!usage.estimated);
    }
}
