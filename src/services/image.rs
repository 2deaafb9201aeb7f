use super::{GenerationService, Generator};
use crate::error::LlmError;
use crate::llm::{self, LlmSettings, ProviderSession};
use crate::models::{ImageData, ImageRequest};
use crate::parser::parse_image;
use crate::prompts::{self, UseCase};

pub struct ImageService {
    generator: Generator,
}

impl ImageService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::from_session(llm::resolve(settings, None)?))
    }

    pub fn from_session(session: ProviderSession) -> Self {
        Self {
            generator: Generator::new(session, UseCase::Image),
        }
    }

    pub async fn analyze(&mut self, request: &ImageRequest) -> Result<ImageData, LlmError> {
        tracing::info!(
            context = %request.context,
            language = %request.language,
            "Analyzing image"
        );
        let pair = prompts::image::build(request);
        self.generator.run(pair, parse_image).await
    }
}

impl GenerationService for ImageService {
    fn generator(&self) -> &Generator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::session_replying;

    #[tokio::test]
    async fn test_image_analysis_clamps_alt_text() {
        let reply = serde_json::json!({
            "description": "A mug",
            "alt_text": "m".repeat(140),
        })
        .to_string();
        let (provider, session) = session_replying(&reply);
        let mut service = ImageService::from_session(session);

        let request = ImageRequest {
            image_url: "https://cdn.example.com/mug.png".to_string(),
            language: "en".to_string(),
            context: "product".to_string(),
        };

        let data = service.analyze(&request).await.unwrap();
        assert_eq!(data.alt_text.chars().count(), 125);
        assert_eq!(data.confidence, 0.8);

        let call = provider.last_call().unwrap();
        assert!(call.prompt.ends_with("IMAGE URL: https://cdn.example.com/mug.png"));
        assert_eq!(call.max_tokens, 1000);
    }
}
