use super::{
    HostedApi, HostedApiProvider, LlmProvider, LocalEndpointProvider, Provider, ProviderError,
    RuleBasedProvider,
};
use crate::config::ProviderSettings;
use crate::shared::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Local,
    OpenAi,
    Anthropic,
    HuggingFace,
    Rules,
}

pub const PROVIDER_PRIORITY: [ProviderKind; 5] = [
    ProviderKind::Local,
    ProviderKind::OpenAi,
    ProviderKind::Anthropic,
    ProviderKind::HuggingFace,
    ProviderKind::Rules,
];

impl ProviderKind {
    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(Self::Local),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "rules" | "rule-based" => Ok(Self::Rules),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::HuggingFace => "huggingface",
            Self::Rules => "rules",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn hosted(api: HostedApi, settings: &ProviderSettings) -> Provider {
    let hosted = match api {
        HostedApi::OpenAi => &settings.openai,
        HostedApi::Anthropic => &settings.anthropic,
        HostedApi::HuggingFace => &settings.huggingface,
    };
    Provider::Hosted(HostedApiProvider::new(
        api,
        hosted.resolve_api_key(api.key_env_var()),
        hosted.model.clone(),
        hosted.base_url.clone(),
        settings.request_timeout(),
    ))
}

pub fn build_provider(kind: ProviderKind, settings: &ProviderSettings) -> Provider {
    match kind {
        ProviderKind::Local => Provider::Local(LocalEndpointProvider::new(
            settings.local.base_url.clone(),
            settings.local.model.clone(),
            settings.probe_timeout(),
            settings.request_timeout(),
        )),
        ProviderKind::OpenAi => hosted(HostedApi::OpenAi, settings),
        ProviderKind::Anthropic => hosted(HostedApi::Anthropic, settings),
        ProviderKind::HuggingFace => hosted(HostedApi::HuggingFace, settings),
        ProviderKind::Rules => Provider::Rules(RuleBasedProvider),
    }
}

pub fn detect_available_provider(
    preferred: Option<&str>,
    settings: &ProviderSettings,
    logger: &Logger,
) -> Provider {
    let mut tried = None;
    if let Some(name) = preferred.map(str::trim).filter(|name| !name.is_empty()) {
        match ProviderKind::parse(name) {
            Ok(kind) => {
                tried = Some(kind);
                let provider = build_provider(kind, settings);
                if provider.is_available() {
                    logger.info(
                        "provider.selected",
                        &format!("using preferred provider {kind}"),
                    );
                    return provider;
                }
                logger.warn(
                    "provider.fallback",
                    &format!("preferred provider {kind} is unavailable; probing fallbacks"),
                );
            }
            Err(err) => logger.warn("provider.fallback", &err.to_string()),
        }
    }

    for kind in PROVIDER_PRIORITY {
        if tried == Some(kind) {
            continue;
        }
        let provider = build_provider(kind, settings);
        if provider.is_available() {
            logger.info("provider.selected", &format!("using provider {kind}"));
            return provider;
        }
    }
    Provider::Rules(RuleBasedProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostedApiSettings;

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(ProviderKind::parse("Ollama").unwrap(), ProviderKind::Local);
        assert_eq!(ProviderKind::parse("hf").unwrap(), ProviderKind::HuggingFace);
        assert_eq!(ProviderKind::parse(" rules ").unwrap(), ProviderKind::Rules);
        assert!(matches!(
            ProviderKind::parse("bard"),
            Err(ProviderError::UnknownProvider(name)) if name == "bard"
        ));
    }

    #[test]
    fn rules_is_last_in_priority() {
        assert_eq!(PROVIDER_PRIORITY.last(), Some(&ProviderKind::Rules));
        assert_eq!(PROVIDER_PRIORITY[0], ProviderKind::Local);
    }

    #[test]
    fn hosted_provider_with_configured_key_is_available() {
        let settings = ProviderSettings {
            anthropic: HostedApiSettings {
                api_key: Some("test-key".to_string()),
                ..HostedApiSettings::default()
            },
            ..ProviderSettings::default()
        };
        let provider = build_provider(ProviderKind::Anthropic, &settings);
        assert_eq!(provider.name(), "anthropic");
        assert!(provider.is_available());
    }
}
