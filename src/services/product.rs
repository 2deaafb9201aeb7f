use super::{GenerationService, Generator};
use crate::error::LlmError;
use crate::llm::{self, LlmSettings, ProviderSession};
use crate::models::{ProductData, ProductRequest};
use crate::parser::parse_product;
use crate::prompts::{self, UseCase};

pub struct ProductService {
    generator: Generator,
}

impl ProductService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::from_session(llm::resolve(settings, None)?))
    }

    pub fn from_session(session: ProviderSession) -> Self {
        Self {
            generator: Generator::new(session, UseCase::Product),
        }
    }

    pub async fn generate(&mut self, request: &ProductRequest) -> Result<ProductData, LlmError> {
        tracing::info!(
            product = %request.name,
            category = %request.category,
            language = %request.language,
            "Generating product content"
        );
        let pair = prompts::product::build(request);
        self.generator.run(pair, parse_product).await
    }
}

impl GenerationService for ProductService {
    fn generator(&self) -> &Generator {
        &self.generator
    }
}
