use crate::app::command_support::{
    build_orchestrator, load_settings, logger_for, reject_unknown_flags, take_option,
};
use crate::chat::run_chat_session_stdio;

const PROVIDER_FLAGS: &[&str] = &["--provider", "-p"];

pub fn cmd_chat(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let provider = take_option(&mut args, PROVIDER_FLAGS)?;
    reject_unknown_flags(&args)?;
    if !args.is_empty() {
        return Err("usage: chat [--provider NAME]".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let mut orchestrator = build_orchestrator(&settings, provider.as_deref(), &logger)?;
    run_chat_session_stdio(&mut orchestrator)
}

pub fn cmd_ask(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let provider = take_option(&mut args, PROVIDER_FLAGS)?;
    reject_unknown_flags(&args)?;
    let question = args.join(" ");
    if question.trim().is_empty() {
        return Err("usage: ask [--provider NAME] <question>".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let mut orchestrator = build_orchestrator(&settings, provider.as_deref(), &logger)?;
    Ok(orchestrator.respond(question.trim()))
}
