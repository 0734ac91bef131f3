use crate::chat::ChatOrchestrator;
use crate::config::{load_global_settings, ConfigError, Settings};
use crate::knowledge::KnowledgeBase;
use crate::provider::{detect_available_provider, ProviderKind};
use crate::shared::Logger;
use std::sync::Arc;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn load_settings() -> Result<Settings, String> {
    load_global_settings().map_err(map_config_err)
}

pub fn logger_for(settings: &Settings) -> Logger {
    match settings.resolve_state_root() {
        Ok(root) => Logger::new(root),
        Err(_) => Logger::disabled(),
    }
}

pub fn take_option(args: &mut Vec<String>, names: &[&str]) -> Result<Option<String>, String> {
    let Some(index) = args.iter().position(|arg| names.contains(&arg.as_str())) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(format!("missing value for `{}`", args[index]));
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}

pub fn reject_unknown_flags(args: &[String]) -> Result<(), String> {
    match args.iter().find(|arg| arg.starts_with('-')) {
        Some(flag) => Err(format!("unknown option `{flag}`")),
        None => Ok(()),
    }
}

pub fn build_orchestrator(
    settings: &Settings,
    provider_override: Option<&str>,
    logger: &Logger,
) -> Result<ChatOrchestrator, String> {
    if let Some(name) = provider_override {
        ProviderKind::parse(name).map_err(|err| err.to_string())?;
    }
    let preferred = provider_override.or(settings.provider.preferred.as_deref());
    let provider = detect_available_provider(preferred, &settings.provider, logger);
    Ok(ChatOrchestrator::with_settings(
        Arc::new(KnowledgeBase::gatk_sv()),
        Box::new(provider),
        &settings.chat,
        logger.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn take_option_removes_flag_and_value() {
        let mut values = args(&["a.wdl", "-o", "out", "b.wdl"]);
        let out = take_option(&mut values, &["--output", "-o"]).expect("parse");
        assert_eq!(out.as_deref(), Some("out"));
        assert_eq!(values, args(&["a.wdl", "b.wdl"]));
    }

    #[test]
    fn take_option_requires_a_value() {
        let mut values = args(&["--provider"]);
        assert!(take_option(&mut values, &["--provider"]).is_err());
    }

    #[test]
    fn unknown_provider_override_is_rejected() {
        let settings = Settings::default();
        let err = build_orchestrator(&settings, Some("bogus"), &Logger::disabled())
            .err()
            .expect("unknown provider");
        assert!(err.contains("unknown provider `bogus`"));
        let orchestrator = build_orchestrator(&settings, Some("rules"), &Logger::disabled())
            .expect("rules provider");
        assert_eq!(orchestrator.provider_name(), "rules");
    }

    #[test]
    fn leftover_flags_are_rejected() {
        assert!(reject_unknown_flags(&args(&["question", "--verbose"])).is_err());
        assert!(reject_unknown_flags(&args(&["question"])).is_ok());
    }
}
