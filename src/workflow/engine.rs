use super::process::run_with_timeout;
use super::{io_error, WorkflowError};
use crate::shared::{generate_execution_id, now_secs, Logger};
use serde::Serialize;
use serde_json::Value;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub execution_id: String,
    pub status: ExecutionStatus,
    pub success: bool,
    pub outputs: Value,
    pub errors: Vec<String>,
    pub duration_secs: f64,
    pub logs: String,
}

pub trait ExecutionEngine {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    fn execute(
        &self,
        workflow: &Path,
        inputs: &Value,
        output_dir: Option<&Path>,
    ) -> Result<ExecutionResult, WorkflowError>;
}

#[derive(Debug)]
pub struct CwltoolEngine {
    binary: String,
    timeout: Duration,
    logger: Logger,
    available: OnceCell<bool>,
}

impl CwltoolEngine {
    pub fn new(binary: impl Into<String>, timeout: Duration, logger: Logger) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            logger,
            available: OnceCell::new(),
        }
    }

    fn write_inputs(&self, dir: &Path, id: &str, inputs: &Value) -> Result<PathBuf, WorkflowError> {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        let path = dir.join(format!("{id}-inputs.json"));
        let body = serde_json::to_string_pretty(inputs).map_err(|source| {
            WorkflowError::EncodeInputs {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(&path, body).map_err(|e| io_error(&path, e))?;
        Ok(path)
    }
}

impl ExecutionEngine for CwltoolEngine {
    fn name(&self) -> &str {
        &self.binary
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            run_with_timeout(
                &self.binary,
                &["--version".to_string()],
                None,
                Duration::from_secs(10),
            )
            .map(|output| output.success())
            .unwrap_or(false)
        })
    }

    fn execute(
        &self,
        workflow: &Path,
        inputs: &Value,
        output_dir: Option<&Path>,
    ) -> Result<ExecutionResult, WorkflowError> {
        if !workflow.is_file() {
            return Err(WorkflowError::NotFound {
                path: workflow.display().to_string(),
            });
        }
        let execution_id =
            generate_execution_id(now_secs()).map_err(|reason| WorkflowError::Parse {
                path: workflow.display().to_string(),
                reason,
            })?;
        let out_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("cwl-output").join(&execution_id));
        let inputs_path = self.write_inputs(&out_dir, &execution_id, inputs)?;
        let args = vec![
            "--outdir".to_string(),
            out_dir.display().to_string(),
            workflow.display().to_string(),
            inputs_path.display().to_string(),
        ];
        self.logger.info(
            "engine.started",
            &format!("id={execution_id} workflow={}", workflow.display()),
        );

        let output = match run_with_timeout(&self.binary, &args, None, self.timeout) {
            Ok(output) => output,
            Err(WorkflowError::Timeout { timeout_ms, .. }) => {
                self.logger.warn("engine.timed_out", &format!("id={execution_id}"));
                return Ok(ExecutionResult {
                    execution_id,
                    status: ExecutionStatus::TimedOut,
                    success: false,
                    outputs: Value::Object(Default::default()),
                    errors: vec![format!("execution exceeded {timeout_ms}ms")],
                    duration_secs: self.timeout.as_secs_f64(),
                    logs: String::new(),
                });
            }
            Err(err) => return Err(err),
        };

        let success = output.success();
        let outputs = serde_json::from_str::<Value>(output.stdout.trim())
            .unwrap_or_else(|_| Value::Object(Default::default()));
        let errors = if success {
            Vec::new()
        } else {
            output
                .stderr
                .lines()
                .filter(|line| line.contains("ERROR") || line.contains("error"))
                .map(|line| line.trim().to_string())
                .collect::<Vec<_>>()
        };
        let errors = if !success && errors.is_empty() {
            vec![format!(
                "`{}` exited with code {}",
                self.binary,
                output.exit_code.unwrap_or(-1)
            )]
        } else {
            errors
        };
        let status = if success {
            ExecutionStatus::Completed
        } else {
            ExecutionStatus::Failed
        };
        self.logger.info(
            "engine.finished",
            &format!("id={execution_id} success={success}"),
        );
        Ok(ExecutionResult {
            execution_id,
            status,
            success,
            outputs,
            errors,
            duration_secs: output.duration.as_secs_f64(),
            logs: output.stderr,
        })
    }
}
