use super::{GenerationService, Generator};
use crate::error::LlmError;
use crate::llm::{self, LlmSettings, ProviderSession};
use crate::models::{SeoData, SeoRequest};
use crate::parser::parse_seo;
use crate::prompts::{self, UseCase};

pub struct SeoService {
    generator: Generator,
}

impl SeoService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::from_session(llm::resolve(settings, None)?))
    }

    pub fn from_session(session: ProviderSession) -> Self {
        Self {
            generator: Generator::new(session, UseCase::Seo),
        }
    }

    pub async fn optimize(&mut self, request: &SeoRequest) -> Result<SeoData, LlmError> {
        tracing::info!(
            post_type = %request.post_type,
            content_chars = request.content_html.chars().count(),
            "Optimizing content for SEO"
        );
        let pair = prompts::seo::build(request);
        self.generator.run(pair, parse_seo).await
    }
}

impl GenerationService for SeoService {
    fn generator(&self) -> &Generator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::session_replying;

    #[tokio::test]
    async fn test_seo_optimization() {
        let (provider, session) = session_replying(
            r#"{"slug": "espresso-guide", "suggested_headings": [{"text": "Grind"}], "readability_score": 70}"#,
        );
        let mut service = SeoService::from_session(session);

        let request = SeoRequest {
            content_html: "<p>Espresso basics</p>".to_string(),
            current_title: None,
            keywords: vec!["espresso".to_string()],
            language: "en".to_string(),
            post_type: "post".to_string(),
        };

        let data = service.optimize(&request).await.unwrap();
        assert_eq!(data.slug, "espresso-guide");
        assert_eq!(data.suggested_headings[0].level, "h2");
        assert_eq!(data.readability_score, Some(70));

        let call = provider.last_call().unwrap();
        assert_eq!(call.temperature, 0.5);
        assert_eq!(call.max_tokens, 1500);
        assert_eq!(service.error_code(), "OPTIMIZATION_FAILED");
    }
}
