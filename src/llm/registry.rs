use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::anthropic::AnthropicProvider;
use super::ollama::OllamaProvider;
use super::openai::OpenAIProvider;
use super::{Provider, ProviderSession};
use crate::error::LlmError;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
    Custom,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Ollama,
        ProviderKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Custom => "custom",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-20241022",
            ProviderKind::Ollama => "llama2",
            ProviderKind::Custom => "custom-model",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| LlmError::UnknownProvider {
                name,
                supported: ProviderKind::ALL
                    .iter()
                    .map(ProviderKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Everything the registry needs to build a provider. Read once from the
/// environment by [`crate::config::Config`]; providers never read it directly.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: String,
    pub model_name: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub ollama_host: String,
    pub custom_api_url: Option<String>,
    pub custom_api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model_name: None,
            openai_api_key: None,
            anthropic_api_key: None,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            custom_api_url: None,
            custom_api_key: None,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, LlmError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LlmError::MissingCredential(format!("{key} environment variable not set")))
}

/// Validated connection details for one provider kind.
enum Credentials<'a> {
    OpenAi { api_key: &'a str },
    Anthropic { api_key: &'a str },
    Ollama { host: &'a str },
    Custom { url: &'a str, api_key: Option<&'a str> },
}

impl<'a> Credentials<'a> {
    fn for_kind(kind: ProviderKind, settings: &'a LlmSettings) -> Result<Self, LlmError> {
        Ok(match kind {
            ProviderKind::OpenAi => Credentials::OpenAi {
                api_key: required(settings.openai_api_key.as_deref(), "OPENAI_API_KEY")?,
            },
            ProviderKind::Anthropic => Credentials::Anthropic {
                api_key: required(settings.anthropic_api_key.as_deref(), "ANTHROPIC_API_KEY")?,
            },
            ProviderKind::Ollama => Credentials::Ollama {
                host: required(Some(settings.ollama_host.as_str()), "OLLAMA_HOST")?,
            },
            ProviderKind::Custom => Credentials::Custom {
                url: required(settings.custom_api_url.as_deref(), "CUSTOM_API_URL")?,
                api_key: settings.custom_api_key.as_deref().filter(|k| !k.is_empty()),
            },
        })
    }

    fn into_provider(self) -> Arc<dyn Provider> {
        match self {
            Credentials::OpenAi { api_key } => Arc::new(OpenAIProvider::new(api_key)),
            Credentials::Anthropic { api_key } => Arc::new(AnthropicProvider::new(api_key)),
            Credentials::Ollama { host } => Arc::new(OllamaProvider::new(host)),
            Credentials::Custom { url, api_key } => {
                Arc::new(OpenAIProvider::new_custom(url, api_key))
            }
        }
    }
}

fn kind_of(settings: &LlmSettings, name: Option<&str>) -> Result<ProviderKind, LlmError> {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or(settings.provider.as_str())
        .parse()
}

/// Checks that `name` (or the configured provider) is known and has its
/// credentials, without building an HTTP client.
pub fn check(settings: &LlmSettings, name: Option<&str>) -> Result<ProviderKind, LlmError> {
    let kind = kind_of(settings, name)?;
    Credentials::for_kind(kind, settings)?;
    Ok(kind)
}

/// Resolves `name` (or the configured provider) to a ready session.
pub fn resolve(settings: &LlmSettings, name: Option<&str>) -> Result<ProviderSession, LlmError> {
    resolve_with_model(settings, name, None)
}

/// Like [`resolve`], with an explicit model that beats `MODEL_NAME` and the
/// vendor default.
///
/// Credentials are checked here, so misconfiguration surfaces before any
/// network call.
pub fn resolve_with_model(
    settings: &LlmSettings,
    name: Option<&str>,
    model: Option<&str>,
) -> Result<ProviderSession, LlmError> {
    let kind = kind_of(settings, name)?;

    tracing::info!(provider = %kind, "Initializing LLM provider");

    let provider = Credentials::for_kind(kind, settings)?.into_provider();

    let model = model
        .filter(|m| !m.trim().is_empty())
        .or(settings.model_name.as_deref().filter(|m| !m.trim().is_empty()))
        .unwrap_or(kind.default_model());

    Ok(ProviderSession::new(provider, model, settings.timeout))
}
