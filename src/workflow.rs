use std::path::Path;

pub mod analyze;
pub mod convert;
pub mod engine;
pub mod process;

pub use analyze::{CallSite, WdlOutlineAnalyzer, WorkflowAnalyzer, WorkflowStatistics, WorkflowSummary};
pub use convert::{
    convert_modules, convert_workflows, module_workflow, AwlkitConverter, ConversionFailure,
    ConversionReport, WorkflowConverter, MODULE_WORKFLOWS,
};
pub use engine::{CwltoolEngine, ExecutionEngine, ExecutionResult, ExecutionStatus};
pub use process::{run_with_timeout, ProcessOutput};

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("workflow file not found: {path}")]
    NotFound { path: String },
    #[error("`{binary}` is not installed or not on PATH")]
    MissingBinary { binary: String },
    #[error("`{binary}` timed out after {timeout_ms}ms")]
    Timeout { binary: String, timeout_ms: u64 },
    #[error("`{binary}` exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        binary: String,
        exit_code: i32,
        stderr: String,
    },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("unknown GATK-SV module `{0}`")]
    UnknownModule(String),
    #[error("failed to encode workflow inputs for {path}: {source}")]
    EncodeInputs {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> WorkflowError {
    WorkflowError::Io {
        path: path.display().to_string(),
        source,
    }
}
