use super::prompt::SV_SYSTEM_PREAMBLE;
use super::{http_agent, map_http_error, parse_error, GenerateOptions, LlmProvider, ProviderError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::OnceCell;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedApi {
    OpenAi,
    Anthropic,
    HuggingFace,
}

impl HostedApi {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::HuggingFace => "huggingface",
        }
    }

    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::HuggingFace => "HF_TOKEN",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::HuggingFace => "https://api-inference.huggingface.co",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-3-sonnet-20240229",
            Self::HuggingFace => "mistralai/Mixtral-8x7B-Instruct-v0.1",
        }
    }
}

#[derive(Debug)]
pub struct HostedApiProvider {
    api: HostedApi,
    api_key: Option<String>,
    model: String,
    base_url: String,
    request_timeout: Duration,
    available: OnceCell<bool>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

impl HostedApiProvider {
    pub fn new(
        api: HostedApi,
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            api,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.unwrap_or_else(|| api.default_model().to_string()),
            base_url: base_url
                .unwrap_or_else(|| api.default_base_url().to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout,
            available: OnceCell::new(),
        }
    }

    pub fn api(&self) -> HostedApi {
        self.api
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn send(&self, request: ureq::Request, body: Value) -> Result<ureq::Response, ProviderError> {
        request
            .send_json(body)
            .map_err(|e| map_http_error(self.name(), self.request_timeout, e))
    }

    fn generate_openai(
        &self,
        key: &str,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, ProviderError> {
        let request = http_agent(self.request_timeout)
            .post(&format!("{}/chat/completions", self.base_url))
            .set("Authorization", &format!("Bearer {key}"));
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SV_SYSTEM_PREAMBLE},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
        });
        let parsed = self
            .send(request, body)?
            .into_json::<OpenAiResponse>()
            .map_err(|e| parse_error(self.name(), e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| parse_error(self.name(), "response contained no choices"))
    }

    fn generate_anthropic(
        &self,
        key: &str,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, ProviderError> {
        let request = http_agent(self.request_timeout)
            .post(&format!("{}/messages", self.base_url))
            .set("x-api-key", key)
            .set("anthropic-version", ANTHROPIC_VERSION);
        let body = json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });
        let parsed = self
            .send(request, body)?
            .into_json::<AnthropicResponse>()
            .map_err(|e| parse_error(self.name(), e.to_string()))?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| parse_error(self.name(), "response contained no text blocks"))
    }

    fn generate_huggingface(
        &self,
        key: &str,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, ProviderError> {
        let request = http_agent(self.request_timeout)
            .post(&format!("{}/models/{}", self.base_url, self.model))
            .set("Authorization", &format!("Bearer {key}"));
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": options.max_tokens,
                "temperature": options.temperature,
                "return_full_text": false,
            },
        });
        let value = self
            .send(request, body)?
            .into_json::<Value>()
            .map_err(|e| parse_error(self.name(), e.to_string()))?;
        extract_generated_text(&value)
            .ok_or_else(|| parse_error(self.name(), "missing `generated_text` field"))
    }
}

fn extract_generated_text(value: &Value) -> Option<String> {
    let item = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    item.get("generated_text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
}

impl LlmProvider for HostedApiProvider {
    fn name(&self) -> &'static str {
        self.api.name()
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.api_key.is_some())
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, ProviderError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(ProviderError::Unavailable {
                provider: self.name().to_string(),
                reason: format!("no API key configured (set {})", self.api.key_env_var()),
            });
        };
        match self.api {
            HostedApi::OpenAi => self.generate_openai(key, prompt, options),
            HostedApi::Anthropic => self.generate_anthropic(key, prompt, options),
            HostedApi::HuggingFace => self.generate_huggingface(key, prompt, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_make_the_provider_unavailable() {
        let provider = HostedApiProvider::new(
            HostedApi::OpenAi,
            Some("   ".to_string()),
            None,
            None,
            Duration::from_secs(1),
        );
        assert!(!provider.is_available());
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        let err = provider
            .generate("hello", &GenerateOptions::default())
            .expect_err("no key");
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[test]
    fn generated_text_is_read_from_list_or_object() {
        let list = json!([{"generated_text": " 30x coverage "}]);
        assert_eq!(extract_generated_text(&list).as_deref(), Some("30x coverage"));
        let object = json!({"generated_text": "ok"});
        assert_eq!(extract_generated_text(&object).as_deref(), Some("ok"));
        assert_eq!(extract_generated_text(&json!({"error": "x"})), None);
    }
}
