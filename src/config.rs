pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::{load_global_settings, load_settings_from, save_settings};
pub use paths::{
    default_global_config_path, default_state_root_path, CONFIG_PATH_ENV, GLOBAL_SETTINGS_FILE_NAME,
    GLOBAL_STATE_DIR,
};
pub use settings::{
    ChatSettings, HostedApiSettings, LocalEndpointSettings, ProviderSettings, Settings,
    WorkflowSettings,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings = serde_yaml::from_str(
            r#"
provider:
  preferred: rules
  local:
    model: mistral
chat:
  max_turns: 4
"#,
        )
        .expect("parse settings");

        assert_eq!(settings.provider.preferred.as_deref(), Some("rules"));
        assert_eq!(settings.provider.local.model, "mistral");
        assert_eq!(settings.provider.local.base_url, "http://localhost:11434");
        assert_eq!(settings.provider.probe_timeout_secs, 2);
        assert_eq!(settings.chat.max_turns, 4);
        assert_eq!(settings.chat.context_turns, 3);
        assert_eq!(settings.workflow.engine_binary, "cwltool");
        settings.validate().expect("valid");
    }

    #[test]
    fn unknown_preferred_provider_fails_validation() {
        let mut settings = Settings::default();
        settings.provider.preferred = Some("gpt-9000".to_string());
        let err = settings.validate().expect_err("invalid provider");
        assert!(err.to_string().contains("provider.preferred"));
    }

    #[test]
    fn zero_limits_fail_validation() {
        let mut settings = Settings::default();
        settings.chat.max_turns = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn saved_settings_load_back() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested/config.yaml");
        let mut settings = Settings::default();
        settings.provider.preferred = Some("rules".to_string());
        settings.chat.max_turns = 6;
        save_settings(&settings, &path).expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("max_turns: 6"));
        let loaded = Settings::from_path(&path).expect("load");
        assert_eq!(loaded.chat.max_turns, 6);
        assert_eq!(loaded.provider.preferred.as_deref(), Some("rules"));
    }

    #[test]
    fn explicit_empty_key_disables_env_lookup() {
        let hosted = HostedApiSettings {
            api_key: Some(String::new()),
            ..HostedApiSettings::default()
        };
        assert_eq!(hosted.resolve_api_key("PATH"), None);
        let explicit = HostedApiSettings {
            api_key: Some("sk-test".to_string()),
            ..HostedApiSettings::default()
        };
        assert_eq!(explicit.resolve_api_key("PATH").as_deref(), Some("sk-test"));
    }
}
