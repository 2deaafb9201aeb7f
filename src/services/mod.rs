//! Generation services: prompt, provider call, parse, accounting.
//!
//! One service instance is built per request around a freshly resolved
//! [`ProviderSession`], so token counters are never shared between requests.

pub mod brand;
pub mod content;
pub mod image;
pub mod product;
pub mod seo;

pub use brand::BrandService;
pub use content::ContentService;
pub use image::ImageService;
pub use product::ProductService;
pub use seo::SeoService;

use std::time::Instant;

use opentelemetry::KeyValue;
use serde_json::Value;

use crate::error::LlmError;
use crate::llm::{GenerationOptions, ProviderSession};
use crate::models::ResponseMetadata;
use crate::prompts::{PromptPair, UseCase};
use crate::telemetry::metrics::{CONTENT_GENERATION_DURATION, CONTENT_GENERATION_REQUESTS};

impl UseCase {
    pub fn generation_options(&self) -> GenerationOptions {
        let (temperature, max_tokens) = match self {
            UseCase::Content => (0.7, 3000),
            UseCase::Product => (0.7, 2500),
            UseCase::Seo => (0.5, 1500),
            UseCase::Image => (0.5, 1000),
            UseCase::Brand => (0.3, 2000),
        };
        GenerationOptions {
            temperature,
            max_tokens,
            json_mode: true,
        }
    }

    /// Envelope error code when this use case fails.
    pub fn error_code(&self) -> &'static str {
        match self {
            UseCase::Content | UseCase::Product => "GENERATION_FAILED",
            UseCase::Seo => "OPTIMIZATION_FAILED",
            UseCase::Image => "ANALYSIS_FAILED",
            UseCase::Brand => "TRAINING_FAILED",
        }
    }

    /// Prefix of the envelope error message when this use case fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            UseCase::Content => "Failed to generate content",
            UseCase::Product => "Failed to generate product content",
            UseCase::Seo => "Failed to optimize SEO",
            UseCase::Image => "Failed to analyze image",
            UseCase::Brand => "Failed to train brand voice",
        }
    }
}

/// Shared pipeline behind every service.
pub struct Generator {
    session: ProviderSession,
    use_case: UseCase,
    last_latency_ms: u64,
}

impl Generator {
    pub fn new(session: ProviderSession, use_case: UseCase) -> Self {
        Self {
            session,
            use_case,
            last_latency_ms: 0,
        }
    }

    pub fn use_case(&self) -> UseCase {
        self.use_case
    }

    pub fn session(&self) -> &ProviderSession {
        &self.session
    }

    #[tracing::instrument(
        name = "content_generation",
        skip_all,
        fields(
            use_case = %self.use_case,
            provider = %self.session.provider_name(),
            model = %self.session.model_name(),
            tokens_used = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    )]
    pub async fn run<T>(
        &mut self,
        pair: PromptPair,
        parse: impl FnOnce(&Value) -> Result<T, LlmError>,
    ) -> Result<T, LlmError> {
        let start = Instant::now();

        let result = match self
            .session
            .generate_json(
                &pair.prompt,
                Some(&pair.system),
                self.use_case.generation_options(),
            )
            .await
        {
            Ok(value) => parse(&value),
            Err(err) => Err(err),
        };

        let elapsed = start.elapsed();
        self.last_latency_ms = elapsed.as_millis() as u64;

        let span = tracing::Span::current();
        span.record("tokens_used", self.session.last_tokens_used());
        span.record("latency_ms", self.last_latency_ms);

        let outcome = match &result {
            Ok(_) => "success",
            Err(err) => err.kind(),
        };
        let attrs = [
            KeyValue::new("use_case", self.use_case.as_str()),
            KeyValue::new("outcome", outcome),
            KeyValue::new("gen_ai.provider.name", self.session.provider_name().to_string()),
        ];
        CONTENT_GENERATION_REQUESTS.add(1, &attrs);
        CONTENT_GENERATION_DURATION.record(elapsed.as_secs_f64(), &attrs);

        match &result {
            Ok(_) => tracing::info!(
                use_case = %self.use_case,
                tokens_used = self.session.last_tokens_used(),
                latency_ms = self.last_latency_ms,
                "Generation completed"
            ),
            Err(err) => tracing::error!(
                use_case = %self.use_case,
                error = %err,
                latency_ms = self.last_latency_ms,
                "Generation failed"
            ),
        }

        result
    }

    pub fn last_latency_ms(&self) -> u64 {
        self.last_latency_ms
    }
}

/// Accounting every service exposes after a run.
pub trait GenerationService {
    fn generator(&self) -> &Generator;

    fn model_name(&self) -> &str {
        self.generator().session().model_name()
    }

    fn last_tokens_used(&self) -> u32 {
        self.generator().session().last_tokens_used()
    }

    fn error_code(&self) -> &'static str {
        self.generator().use_case().error_code()
    }

    /// Metadata for the most recent run.
    fn metadata(&self) -> ResponseMetadata {
        let generator = self.generator();
        ResponseMetadata {
            tokens_used: generator.session().last_tokens_used(),
            tokens_estimated: generator.session().last_tokens_estimated(),
            latency_ms: generator.last_latency_ms(),
            model: generator.session().model_name().to_string(),
            cached: false,
        }
    }
}
