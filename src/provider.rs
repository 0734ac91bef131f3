use std::time::Duration;

pub mod detect;
pub mod hosted;
pub mod local;
pub mod model_map;
pub mod prompt;
pub mod rules;

pub use detect::{build_provider, detect_available_provider, ProviderKind, PROVIDER_PRIORITY};
pub use hosted::{HostedApi, HostedApiProvider};
pub use local::LocalEndpointProvider;
pub use model_map::{recommended_local_models, suggest_model_for_task, RecommendedModel};
pub use prompt::{estimate_token_count, format_prompt_for_sv_domain, SV_SYSTEM_PREAMBLE};
pub use rules::RuleBasedProvider;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown provider `{0}`")]
    UnknownProvider(String),
    #[error("provider {provider} is not available: {reason}")]
    Unavailable { provider: String, reason: String },
    #[error("{provider} rejected the request with HTTP 401 (unauthorized): {message}")]
    Unauthorized { provider: String, message: String },
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("{provider} request timed out after {timeout_ms}ms: {message}")]
    Timeout {
        provider: String,
        timeout_ms: u64,
        message: String,
    },
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },
    #[error("{provider} response parse failure: {reason}")]
    Parse { provider: String, reason: String },
}

impl ProviderError {
    pub fn is_auth_failure(&self) -> bool {
        if matches!(self, Self::Unauthorized { .. }) {
            return true;
        }
        let text = self.to_string();
        text.contains("401") || text.contains("Invalid username")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

pub trait LlmProvider {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, ProviderError>;
}

#[derive(Debug)]
pub enum Provider {
    Local(LocalEndpointProvider),
    Hosted(HostedApiProvider),
    Rules(RuleBasedProvider),
}

impl LlmProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Self::Local(provider) => provider.name(),
            Self::Hosted(provider) => provider.name(),
            Self::Rules(provider) => provider.name(),
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Local(provider) => provider.is_available(),
            Self::Hosted(provider) => provider.is_available(),
            Self::Rules(provider) => provider.is_available(),
        }
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, ProviderError> {
        match self {
            Self::Local(provider) => provider.generate(prompt, options),
            Self::Hosted(provider) => provider.generate(prompt, options),
            Self::Rules(provider) => provider.generate(prompt, options),
        }
    }
}

pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

pub(crate) fn map_http_error(provider: &str, timeout: Duration, err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::Status(401, response) => ProviderError::Unauthorized {
            provider: provider.to_string(),
            message: response_body(response),
        },
        ureq::Error::Status(status, response) => ProviderError::Status {
            provider: provider.to_string(),
            status,
            message: response_body(response),
        },
        ureq::Error::Transport(transport) => {
            let message = transport.to_string();
            if message.to_ascii_lowercase().contains("timed out") {
                ProviderError::Timeout {
                    provider: provider.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                    message,
                }
            } else {
                ProviderError::Transport {
                    provider: provider.to_string(),
                    message,
                }
            }
        }
    }
}

fn response_body(response: ureq::Response) -> String {
    let body = response.into_string().unwrap_or_default();
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.chars().take(500).collect()
    }
}

pub(crate) fn parse_error(provider: &str, reason: impl Into<String>) -> ProviderError {
    ProviderError::Parse {
        provider: provider.to_string(),
        reason: reason.into(),
    }
}
