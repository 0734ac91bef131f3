use super::{default_state_root_path, ConfigError};
use crate::provider::local::{DEFAULT_LOCAL_BASE_URL, DEFAULT_LOCAL_MODEL};
use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PREFERRED_PROVIDER_ENV: &str = "SV_AGENT_PROVIDER";
pub const LOCAL_HOST_ENV: &str = "OLLAMA_HOST";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub state_root: Option<PathBuf>,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub preferred: Option<String>,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub local: LocalEndpointSettings,
    #[serde(default)]
    pub openai: HostedApiSettings,
    #[serde(default)]
    pub anthropic: HostedApiSettings,
    #[serde(default)]
    pub huggingface: HostedApiSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            preferred: None,
            probe_timeout_secs: default_probe_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            local: LocalEndpointSettings::default(),
            openai: HostedApiSettings::default(),
            anthropic: HostedApiSettings::default(),
            huggingface: HostedApiSettings::default(),
        }
    }
}

impl ProviderSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocalEndpointSettings {
    #[serde(default = "default_local_base_url")]
    pub base_url: String,
    #[serde(default = "default_local_model")]
    pub model: String,
}

impl Default for LocalEndpointSettings {
    fn default() -> Self {
        Self {
            base_url: default_local_base_url(),
            model: default_local_model(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HostedApiSettings {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl HostedApiSettings {
    pub fn resolve_api_key(&self, env_var: &str) -> Option<String> {
        match &self.api_key {
            Some(key) => Some(key.clone()).filter(|k| !k.trim().is_empty()),
            None => std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatSettings {
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            context_turns: default_context_turns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkflowSettings {
    #[serde(default = "default_gatksv_root")]
    pub gatksv_root: PathBuf,
    #[serde(default = "default_cwl_dir")]
    pub cwl_dir: PathBuf,
    #[serde(default = "default_converter_binary")]
    pub converter_binary: String,
    #[serde(default = "default_engine_binary")]
    pub engine_binary: String,
    #[serde(default = "default_workflow_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            gatksv_root: default_gatksv_root(),
            cwl_dir: default_cwl_dir(),
            converter_binary: default_converter_binary(),
            engine_binary: default_engine_binary(),
            timeout_secs: default_workflow_timeout_secs(),
        }
    }
}

impl WorkflowSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_probe_timeout_secs() -> u64 {
    2
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_local_base_url() -> String {
    DEFAULT_LOCAL_BASE_URL.to_string()
}

fn default_local_model() -> String {
    DEFAULT_LOCAL_MODEL.to_string()
}

fn default_max_turns() -> usize {
    10
}

fn default_context_turns() -> usize {
    3
}

fn default_gatksv_root() -> PathBuf {
    PathBuf::from("gatk-sv")
}

fn default_cwl_dir() -> PathBuf {
    PathBuf::from("cwl")
}

fn default_converter_binary() -> String {
    "awlkit".to_string()
}

fn default_engine_binary() -> String {
    "cwltool".to_string()
}

fn default_workflow_timeout_secs() -> u64 {
    6 * 60 * 60
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn to_yaml(&self, path: &Path) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|source| ConfigError::Encode {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(preferred) = std::env::var(PREFERRED_PROVIDER_ENV) {
            if !preferred.trim().is_empty() {
                self.provider.preferred = Some(preferred.trim().to_string());
            }
        }
        if let Ok(host) = std::env::var(LOCAL_HOST_ENV) {
            let host = host.trim();
            if !host.is_empty() {
                self.provider.local.base_url = if host.starts_with("http://")
                    || host.starts_with("https://")
                {
                    host.to_string()
                } else {
                    format!("http://{host}")
                };
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(preferred) = self.provider.preferred.as_deref() {
            ProviderKind::parse(preferred)
                .map_err(|err| ConfigError::Settings(format!("`provider.preferred`: {err}")))?;
        }
        if self.provider.probe_timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "`provider.probe_timeout_secs` must be greater than zero".to_string(),
            ));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "`provider.request_timeout_secs` must be greater than zero".to_string(),
            ));
        }
        if self.provider.local.base_url.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`provider.local.base_url` must be non-empty".to_string(),
            ));
        }
        if self.chat.max_turns == 0 {
            return Err(ConfigError::Settings(
                "`chat.max_turns` must be greater than zero".to_string(),
            ));
        }
        if self.chat.context_turns == 0 {
            return Err(ConfigError::Settings(
                "`chat.context_turns` must be greater than zero".to_string(),
            ));
        }
        if self.workflow.timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "`workflow.timeout_secs` must be greater than zero".to_string(),
            ));
        }
        if self.workflow.converter_binary.trim().is_empty()
            || self.workflow.engine_binary.trim().is_empty()
        {
            return Err(ConfigError::Settings(
                "`workflow.converter_binary` and `workflow.engine_binary` must be non-empty"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve_state_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_root {
            Some(root) => Ok(root.clone()),
            None => default_state_root_path(),
        }
    }
}
