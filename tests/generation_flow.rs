use std::sync::{Arc, Mutex};
use std::time::Duration;

use content_gateway::error::LlmError;
use content_gateway::llm::{
    self, GenerateRequest, GenerateResponse, LlmSettings, Provider, ProviderSession, TokenUsage,
};
use content_gateway::models::{BrandSample, BrandTrainRequest, ContentRequest, ImageRequest};
use content_gateway::prompts::brand::MAX_SAMPLES_CHARS;
use content_gateway::services::{
    BrandService, ContentService, GenerationService, ImageService,
};

/// Provider double that replies with canned text and keeps every prompt.
struct StubProvider {
    reply: String,
    usage: TokenUsage,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            usage: TokenUsage::estimate_from_output(reply),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl Provider for StubProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.prompts.lock().unwrap().push(req.prompt.clone());
        Ok(GenerateResponse {
            content: self.reply.clone(),
            model: req.model.clone(),
            usage: self.usage,
            finish_reason: "stop".to_string(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn session(provider: Arc<StubProvider>) -> ProviderSession {
    ProviderSession::new(provider, "stub-model", Duration::from_secs(5))
}

fn content_request() -> ContentRequest {
    serde_json::from_value(serde_json::json!({
        "topic": "Growing tomatoes on a balcony",
        "keywords": ["tomatoes", "balcony garden"],
        "length": "short"
    }))
    .unwrap()
}

#[tokio::test]
async fn content_generation_fills_missing_fields() {
    let provider = StubProvider::new(r#"{"title": "x"}"#);
    let mut service = ContentService::from_session(session(provider.clone()));

    let data = service.generate(&content_request()).await.unwrap();
    assert_eq!(data.title, "x");
    assert_eq!(data.body_html, "");
    assert!(data.outline.is_empty());

    let metadata = service.metadata();
    assert!(metadata.tokens_estimated);
    assert_eq!(metadata.model, "stub-model");
    assert_eq!(service.model_name(), "stub-model");

    let prompts = provider.prompts.lock().unwrap();
    assert!(prompts[0].contains("LENGTH: 300-500 words"));
    assert!(prompts[0].contains("TONE: professional"));
    assert!(!prompts[0].contains("Target audience"));
}

#[tokio::test]
async fn prose_reply_is_a_format_error() {
    let provider = StubProvider::new("not json");
    let mut service = ContentService::from_session(session(provider));

    let err = service.generate(&content_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponseFormat(_)));
}

#[tokio::test]
async fn fenced_reply_is_unwrapped() {
    let provider = StubProvider::new(
        "```json\n{\"description\": \"A red kettle\", \"alt_text\": \"Red kettle\"}\n```",
    );
    let mut service = ImageService::from_session(session(provider));

    let request: ImageRequest = serde_json::from_value(serde_json::json!({
        "image_url": "https://cdn.example.com/kettle.jpg"
    }))
    .unwrap();

    let data = service.analyze(&request).await.unwrap();
    assert_eq!(data.alt_text, "Red kettle");
    assert_eq!(data.confidence, 0.8);
}

#[tokio::test]
async fn brand_training_truncates_samples() {
    let provider = StubProvider::new(
        r#"{"brand_profile": {"tone": "playful"}, "prompt_template": "Be playful.", "analysis": {"avg_sentence_length": 12.0, "common_words": ["fun"]}}"#,
    );
    let mut service = BrandService::from_session(session(provider.clone()));

    let request = BrandTrainRequest {
        samples: (0..10)
            .map(|i| BrandSample {
                title: format!("Sample {i}"),
                excerpt: String::new(),
                body: "x".repeat(2_000),
            })
            .collect(),
        language: "en".to_string(),
    };

    let data = service.train(&request).await.unwrap();
    assert_eq!(data.brand_profile.tone, "playful");
    let analysis = data.analysis.unwrap();
    assert_eq!(analysis.avg_sentence_length, 12.0);
    assert_eq!(analysis.common_words, vec!["fun"]);

    let prompts = provider.prompts.lock().unwrap();
    let prompt = &prompts[0];
    assert!(!prompt.contains(&"x".repeat(501)));
    let start = prompt.find("SAMPLES:\n").unwrap() + "SAMPLES:\n".len();
    let end = prompt.find("\n\nANALYSIS REQUIREMENTS").unwrap();
    assert!(prompt[start..end].chars().count() <= MAX_SAMPLES_CHARS);
}

#[test]
fn registry_rejects_before_network() {
    let settings = LlmSettings::default();

    let err = llm::resolve(&settings, Some("foobar")).err().unwrap();
    assert!(matches!(err, LlmError::UnknownProvider { .. }));

    let err = llm::resolve(&settings, Some("anthropic")).err().unwrap();
    assert!(matches!(err, LlmError::MissingCredential(_)));

    let err = ContentService::new(&settings).err().unwrap();
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}
