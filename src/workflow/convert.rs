use super::process::run_with_timeout;
use super::{io_error, WorkflowError};
use crate::shared::Logger;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MODULE_WORKFLOWS: [(&str, &str); 9] = [
    ("Module00a", "GatherSampleEvidence"),
    ("Module00b", "EvidenceQC"),
    ("Module00c", "GatherBatchEvidence"),
    ("Module01", "ClusterBatch"),
    ("Module02", "GenerateBatchMetrics"),
    ("Module03", "FilterBatch"),
    ("Module04", "GenotypeBatch"),
    ("Module05", "MakeCohortVcf"),
    ("Module06", "AnnotateVcf"),
];

pub fn module_workflow(module: &str) -> Option<&'static str> {
    MODULE_WORKFLOWS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(module))
        .map(|(_, workflow)| *workflow)
}

pub trait WorkflowConverter {
    fn name(&self) -> &str;
    fn convert_file(&self, input: &Path, output: &Path) -> Result<(), WorkflowError>;
}

#[derive(Debug, Clone)]
pub struct AwlkitConverter {
    binary: String,
    timeout: Duration,
}

impl AwlkitConverter {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl WorkflowConverter for AwlkitConverter {
    fn name(&self) -> &str {
        &self.binary
    }

    fn convert_file(&self, input: &Path, output: &Path) -> Result<(), WorkflowError> {
        if !input.is_file() {
            return Err(WorkflowError::NotFound {
                path: input.display().to_string(),
            });
        }
        let args = vec![
            "convert".to_string(),
            input.display().to_string(),
            output.display().to_string(),
        ];
        let result = run_with_timeout(&self.binary, &args, None, self.timeout)?;
        if !result.success() {
            return Err(WorkflowError::NonZeroExit {
                binary: self.binary.clone(),
                exit_code: result.exit_code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            });
        }
        if !output.is_file() {
            return Err(WorkflowError::Parse {
                path: input.display().to_string(),
                reason: format!("`{}` produced no output at {}", self.binary, output.display()),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionFailure {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub converted: Vec<String>,
    pub failed: Vec<ConversionFailure>,
}

impl ConversionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("converted={}", self.converted.len()),
            format!("failed={}", self.failed.len()),
        ];
        lines.extend(self.converted.iter().map(|file| format!("ok {file}")));
        lines.extend(
            self.failed
                .iter()
                .map(|failure| format!("failed {}: {}", failure.file, failure.error)),
        );
        lines.join("\n")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn convert_workflows(
    converter: &dyn WorkflowConverter,
    inputs: &[PathBuf],
    out_dir: &Path,
    logger: &Logger,
) -> Result<ConversionReport, WorkflowError> {
    fs::create_dir_all(out_dir).map_err(|e| io_error(out_dir, e))?;
    let mut report = ConversionReport::default();
    for input in inputs {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workflow".to_string());
        let output = out_dir.join(format!("{stem}.cwl"));
        match converter.convert_file(input, &output) {
            Ok(()) => report.converted.push(file_name(input)),
            Err(err) => {
                logger.warn(
                    "workflow.convert_failed",
                    &format!("{}: {err}", input.display()),
                );
                report.failed.push(ConversionFailure {
                    file: file_name(input),
                    error: err.to_string(),
                });
            }
        }
    }
    logger.info(
        "workflow.convert_finished",
        &format!(
            "converted={} failed={}",
            report.converted.len(),
            report.failed.len()
        ),
    );
    Ok(report)
}

fn all_module_wdls(gatksv_root: &Path) -> Result<Vec<PathBuf>, WorkflowError> {
    let wdl_dir = gatksv_root.join("wdl");
    if !wdl_dir.is_dir() {
        return Err(WorkflowError::NotFound {
            path: wdl_dir.display().to_string(),
        });
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(&wdl_dir).map_err(|e| io_error(&wdl_dir, e))? {
        let path = entry.map_err(|e| io_error(&wdl_dir, e))?.path();
        if path.extension().is_some_and(|ext| ext == "wdl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn convert_modules(
    converter: &dyn WorkflowConverter,
    gatksv_root: &Path,
    out_dir: &Path,
    modules: &[String],
    logger: &Logger,
) -> Result<ConversionReport, WorkflowError> {
    if modules.is_empty() {
        let inputs = all_module_wdls(gatksv_root)?;
        return convert_workflows(converter, &inputs, out_dir, logger);
    }

    let mut inputs = Vec::new();
    let mut unresolved = Vec::new();
    for module in modules {
        match module_workflow(module) {
            Some(workflow) => inputs.push(gatksv_root.join("wdl").join(format!("{workflow}.wdl"))),
            None => unresolved.push(ConversionFailure {
                file: module.clone(),
                error: WorkflowError::UnknownModule(module.clone()).to_string(),
            }),
        }
    }
    let mut report = convert_workflows(converter, &inputs, out_dir, logger)?;
    report.failed.extend(unresolved);
    Ok(report)
}
