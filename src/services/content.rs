use super::{GenerationService, Generator};
use crate::error::LlmError;
use crate::llm::{self, LlmSettings, ProviderSession};
use crate::models::{ContentData, ContentRequest};
use crate::parser::parse_content;
use crate::prompts::{self, UseCase};

pub struct ContentService {
    generator: Generator,
}

impl ContentService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::from_session(llm::resolve(settings, None)?))
    }

    pub fn from_session(session: ProviderSession) -> Self {
        Self {
            generator: Generator::new(session, UseCase::Content),
        }
    }

    pub async fn generate(&mut self, request: &ContentRequest) -> Result<ContentData, LlmError> {
        tracing::info!(
            topic = %request.topic,
            language = %request.language,
            "Generating content"
        );
        let pair = prompts::content::build(request);
        let data = self.generator.run(pair, parse_content).await?;
        tracing::debug!(body_chars = data.body_html.len(), "Content generated");
        Ok(data)
    }
}

impl GenerationService for ContentService {
    fn generator(&self) -> &Generator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::session_replying;

    fn request() -> ContentRequest {
        ContentRequest {
            topic: "Composting in small apartments".to_string(),
            keywords: vec!["compost".to_string()],
            tone: "professional".to_string(),
            length: "short".to_string(),
            language: "en".to_string(),
            audience: None,
            brand_profile: None,
        }
    }

    #[tokio::test]
    async fn test_title_only_reply_fills_defaults() {
        let (provider, session) = session_replying(r#"{"title": "x"}"#);
        let mut service = ContentService::from_session(session);

        let data = service.generate(&request()).await.unwrap();
        assert_eq!(data.title, "x");
        assert_eq!(data.body_html, "");

        let call = provider.last_call().unwrap();
        assert_eq!(call.temperature, 0.7);
        assert_eq!(call.max_tokens, 3000);
        assert!(call.prompt.contains("LENGTH: 300-500 words"));

        let metadata = service.metadata();
        assert_eq!(metadata.tokens_used, 150);
        assert_eq!(metadata.model, "mock-model");
        assert!(!metadata.cached);
        assert_eq!(service.last_tokens_used(), 150);
        assert_eq!(service.error_code(), "GENERATION_FAILED");
    }

    #[tokio::test]
    async fn test_prose_reply_is_format_error() {
        let (_, session) = session_replying("not json");
        let mut service = ContentService::from_session(session);
        let err = service.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_array_reply_is_malformed() {
        let (_, session) = session_replying(r#"[{"title": "x"}]"#);
        let mut service = ContentService::from_session(session);
        let err = service.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn test_new_fails_fast_without_credentials() {
        let err = ContentService::new(&LlmSettings::default()).err().unwrap();
        assert!(matches!(err, LlmError::MissingCredential(_)));
    }
}
