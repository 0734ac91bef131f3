use crate::app::command_support::{load_settings, logger_for, reject_unknown_flags, take_option};
use crate::workflow::{convert_modules, convert_workflows, AwlkitConverter};
use std::path::PathBuf;

pub fn cmd_convert(args: &[String]) -> Result<String, String> {
    let mut args = args.to_vec();
    let output = take_option(&mut args, &["--output", "-o"])?;
    let modules = take_option(&mut args, &["--modules", "-m"])?;
    reject_unknown_flags(&args)?;
    if modules.is_some() && !args.is_empty() {
        return Err("usage: convert [files...] [-o DIR] | convert [-m MODULES] [-o DIR]".to_string());
    }

    let settings = load_settings()?;
    let logger = logger_for(&settings);
    let converter = AwlkitConverter::new(
        settings.workflow.converter_binary.clone(),
        settings.workflow.timeout(),
    );
    let out_dir = output
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.workflow.cwl_dir.clone());

    let report = if args.is_empty() {
        let modules: Vec<String> = modules
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|module| !module.is_empty())
            .map(str::to_string)
            .collect();
        convert_modules(
            &converter,
            &settings.workflow.gatksv_root,
            &out_dir,
            &modules,
            &logger,
        )
    } else {
        let inputs: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
        convert_workflows(&converter, &inputs, &out_dir, &logger)
    }
    .map_err(|e| e.to_string())?;

    let summary = format!("output={}\n{}", out_dir.display(), report.summary());
    if report.is_success() {
        Ok(summary)
    } else {
        Err(summary)
    }
}
