use crate::app::command_support::{load_settings, logger_for, reject_unknown_flags, take_option};
use crate::provider::{
    build_provider, detect_available_provider, recommended_local_models, suggest_model_for_task,
    LlmProvider, Provider, ProviderKind, PROVIDER_PRIORITY,
};

pub fn cmd_providers(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let task = take_option(&mut args, &["--task", "-t"])?;
    reject_unknown_flags(&args)?;
    if !args.is_empty() {
        return Err("usage: providers [--task TEXT]".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let mut lines = vec!["Providers (in fallback order):".to_string()];
    for kind in PROVIDER_PRIORITY {
        let provider = build_provider(kind, &settings.provider);
        let available = provider.is_available();
        let state = if available {
            "available"
        } else {
            "unavailable"
        };
        lines.push(format!("  {:<12} {state}", kind.as_str()));
        if let (true, ProviderKind::Local, Provider::Local(local)) = (available, kind, &provider) {
            let pulled = local.list_models();
            if !pulled.is_empty() {
                lines.push(format!("  {:<12} models: {}", "", pulled.join(", ")));
            }
        }
    }

    let selected =
        detect_available_provider(settings.provider.preferred.as_deref(), &settings.provider, &logger);
    lines.push(format!("selected={}", selected.name()));
    lines.push(String::new());
    lines.push("Recommended local models:".to_string());
    lines.extend(recommended_local_models().iter().map(|model| {
        format!(
            "  {:<14} {:>6}  {} ({})",
            model.name, model.size, model.description, model.use_case
        )
    }));
    if let Some(task) = task {
        lines.push(format!("suggested={}", suggest_model_for_task(&task)));
    }
    Ok(lines.join("\n"))
}
