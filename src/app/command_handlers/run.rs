use crate::app::command_support::{load_settings, logger_for, reject_unknown_flags, take_option};
use crate::workflow::{CwltoolEngine, ExecutionEngine};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn load_inputs(path: &Path) -> Result<Value, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    } else {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&raw)
            .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
        serde_json::to_value(yaml).map_err(|e| format!("failed to convert {}: {e}", path.display()))
    }
}

pub fn cmd_run(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let output = take_option(&mut args, &["--output", "-o"])?;
    reject_unknown_flags(&args)?;
    if args.len() != 2 {
        return Err("usage: run <workflow.cwl> <inputs.yaml|inputs.json> [-o DIR]".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let inputs = load_inputs(Path::new(&args[1]))?;
    let engine = CwltoolEngine::new(
        settings.workflow.engine_binary.clone(),
        settings.workflow.timeout(),
        logger,
    );
    if !engine.is_available() {
        return Err(format!(
            "`{}` is not installed or not on PATH; install it with `pip install cwltool`",
            engine.name()
        ));
    }
    let out_dir = output.map(PathBuf::from);
    let result = engine
        .execute(Path::new(&args[0]), &inputs, out_dir.as_deref())
        .map_err(|e| e.to_string())?;
    let body = serde_json::to_string_pretty(&result)
        .map_err(|e| format!("failed to encode execution result: {e}"))?;
    if result.success {
        Ok(body)
    } else {
        Err(body)
    }
}
