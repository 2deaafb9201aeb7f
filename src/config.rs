use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::llm::LlmSettings;
use crate::llm::registry::{DEFAULT_LLM_TIMEOUT, DEFAULT_OLLAMA_HOST, DEFAULT_PROVIDER};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub app_secret: Option<String>,
    pub allowed_origins: Vec<String>,
    pub llm: LlmSettings,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .context("APP_PORT must be a number")?;

        let timeout_secs: u64 = match optional("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_LLM_TIMEOUT.as_secs(),
        };

        let llm = LlmSettings {
            provider: optional("PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            model_name: optional("MODEL_NAME"),
            openai_api_key: optional("OPENAI_API_KEY"),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            ollama_host: optional("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            custom_api_url: optional("CUSTOM_API_URL"),
            custom_api_key: optional("CUSTOM_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            port,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            app_secret: optional("APP_SECRET"),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            llm,
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "content-gateway".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}
