use super::{http_agent, map_http_error, parse_error, GenerateOptions, LlmProvider, ProviderError};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::time::Duration;

pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_LOCAL_MODEL: &str = "llama2";

#[derive(Debug)]
pub struct LocalEndpointProvider {
    base_url: String,
    model: String,
    probe_timeout: Duration,
    request_timeout: Duration,
    available: OnceCell<bool>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateRequestOptions,
}

#[derive(Debug, Serialize)]
struct GenerateRequestOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

impl LocalEndpointProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        probe_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            probe_timeout,
            request_timeout,
            available: OnceCell::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn probe(&self) -> bool {
        match http_agent(self.probe_timeout)
            .get(&self.endpoint("api/tags"))
            .call()
        {
            Ok(response) => response.status() == 200,
            Err(_) => false,
        }
    }

    pub fn list_models(&self) -> Vec<String> {
        let Ok(response) = http_agent(self.probe_timeout)
            .get(&self.endpoint("api/tags"))
            .call()
        else {
            return Vec::new();
        };
        response
            .into_json::<TagsResponse>()
            .map(|tags| tags.models.into_iter().map(|m| m.name).collect())
            .unwrap_or_default()
    }
}

impl LlmProvider for LocalEndpointProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.probe())
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateRequestOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };
        let payload =
            serde_json::to_value(&body).map_err(|e| parse_error(self.name(), e.to_string()))?;
        let response = http_agent(self.request_timeout)
            .post(&self.endpoint("api/generate"))
            .send_json(payload)
            .map_err(|e| map_http_error(self.name(), self.request_timeout, e))?;

        let parsed = response
            .into_json::<GenerateResponse>()
            .map_err(|e| parse_error(self.name(), e.to_string()))?;
        parsed
            .response
            .ok_or_else(|| parse_error(self.name(), "missing `response` field"))
    }
}
