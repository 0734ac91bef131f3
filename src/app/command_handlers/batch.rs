use crate::agent::{BatchConfig, SvAgent};
use crate::app::command_support::{load_settings, logger_for, reject_unknown_flags, take_option};
use crate::workflow::CwltoolEngine;
use std::fs;
use std::path::{Path, PathBuf};

pub fn cmd_batch(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let output = take_option(&mut args, &["--output", "-o"])?;
    reject_unknown_flags(&args)?;
    if args.len() != 1 {
        return Err("usage: batch <batch.json> [-o DIR]".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let config = BatchConfig::from_path(Path::new(&args[0])).map_err(|e| e.to_string())?;
    let engine = CwltoolEngine::new(
        settings.workflow.engine_binary.clone(),
        settings.workflow.timeout(),
        logger.clone(),
    );
    let agent = SvAgent::new(Box::new(engine), settings.workflow.cwl_dir.clone(), logger);
    let result = agent.process_batch(&config).map_err(|e| e.to_string())?;

    let results_dir = output.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("results"));
    fs::create_dir_all(&results_dir)
        .map_err(|e| format!("failed to create {}: {e}", results_dir.display()))?;
    let results_path = results_dir.join("results.json");
    let body = serde_json::to_string_pretty(&result)
        .map_err(|e| format!("failed to encode batch result: {e}"))?;
    fs::write(&results_path, body)
        .map_err(|e| format!("failed to write {}: {e}", results_path.display()))?;

    Ok(format!(
        "status={:?}\nsamples={}\nresults={}",
        result.execution.status,
        result.samples_requested,
        results_path.display()
    ))
}
