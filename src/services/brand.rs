use super::{GenerationService, Generator};
use crate::error::LlmError;
use crate::llm::{self, LlmSettings, ProviderSession};
use crate::models::{BrandTrainData, BrandTrainRequest};
use crate::parser::parse_brand;
use crate::prompts::{self, UseCase};

pub struct BrandService {
    generator: Generator,
}

impl BrandService {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::from_session(llm::resolve(settings, None)?))
    }

    pub fn from_session(session: ProviderSession) -> Self {
        Self {
            generator: Generator::new(session, UseCase::Brand),
        }
    }

    pub async fn train(&mut self, request: &BrandTrainRequest) -> Result<BrandTrainData, LlmError> {
        tracing::info!(
            samples = request.samples.len(),
            language = %request.language,
            "Training brand voice"
        );
        let pair = prompts::brand::build(request);
        self.generator.run(pair, parse_brand).await
    }
}

impl GenerationService for BrandService {
    fn generator(&self) -> &Generator {
        &self.generator
    }
}
