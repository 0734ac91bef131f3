use crate::shared::Logger;
use crate::workflow::{ExecutionEngine, ExecutionResult, WorkflowError, MODULE_WORKFLOWS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const PIPELINE_NAME: &str = "GATK-SV";
pub const BATCH_WORKFLOW_FILE: &str = "GATKSVPipelineBatch.cwl";
pub const MIN_SAMPLE_COVERAGE: f64 = 15.0;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid batch configuration: {0}")]
    Configuration(String),
    #[error("failed to read batch config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse batch config {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("execution engine `{engine}` is not available")]
    EngineUnavailable { engine: String },
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchSample {
    Id(String),
    Detailed(SampleSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

impl BatchSample {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Detailed(spec) => &spec.id,
        }
    }

    pub fn coverage(&self) -> Option<f64> {
        match self {
            Self::Id(_) => None,
            Self::Detailed(spec) => spec.coverage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub samples: Option<Vec<BatchSample>>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl BatchConfig {
    pub fn from_path(path: &Path) -> Result<Self, AgentError> {
        let raw = fs::read_to_string(path).map_err(|source| AgentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let parsed = if is_yaml {
            serde_yaml::from_str(&raw).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&raw).map_err(|e| e.to_string())
        };
        parsed.map_err(|reason| AgentError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }
}

pub fn validate_batch_config(config: &BatchConfig) -> Result<(), AgentError> {
    let missing = |field: &str| AgentError::Configuration(format!("Missing required field: {field}"));
    let samples = config.samples.as_ref().ok_or_else(|| missing("samples"))?;
    if config.reference.is_none() {
        return Err(missing("reference"));
    }
    if config.output_dir.is_none() {
        return Err(missing("output_dir"));
    }
    if samples.is_empty() {
        return Err(AgentError::Configuration(
            "batch must contain at least one sample".to_string(),
        ));
    }
    for sample in samples {
        if sample.id().trim().is_empty() {
            return Err(AgentError::Configuration(
                "every sample needs a non-empty id".to_string(),
            ));
        }
        if let Some(coverage) = sample.coverage() {
            if coverage < MIN_SAMPLE_COVERAGE {
                return Err(AgentError::Configuration(format!(
                    "sample {} has insufficient coverage ({coverage}x, minimum {MIN_SAMPLE_COVERAGE}x)",
                    sample.id()
                )));
            }
        }
    }
    Ok(())
}

pub fn prepare_workflow_inputs(config: &BatchConfig) -> Value {
    json!({
        "samples": config.samples.clone().unwrap_or_default(),
        "reference": config.reference,
        "output_directory": config.output_dir,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub pipeline: &'static str,
    pub samples_requested: usize,
    pub modules_executed: Vec<&'static str>,
    pub execution: ExecutionResult,
}

pub struct SvAgent {
    engine: Box<dyn ExecutionEngine>,
    cwl_dir: PathBuf,
    logger: Logger,
}

impl SvAgent {
    pub fn new(engine: Box<dyn ExecutionEngine>, cwl_dir: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            engine,
            cwl_dir: cwl_dir.into(),
            logger,
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn batch_workflow(&self) -> PathBuf {
        self.cwl_dir.join(BATCH_WORKFLOW_FILE)
    }

    pub fn process_batch(&self, config: &BatchConfig) -> Result<BatchResult, AgentError> {
        validate_batch_config(config)?;
        if !self.engine.is_available() {
            return Err(AgentError::EngineUnavailable {
                engine: self.engine.name().to_string(),
            });
        }
        let inputs = prepare_workflow_inputs(config);
        let samples_requested = config.samples.as_ref().map_or(0, Vec::len);
        self.logger.info(
            "agent.batch_started",
            &format!("samples={samples_requested} engine={}", self.engine.name()),
        );
        let output_dir = config.output_dir.as_deref().map(Path::new);
        let execution = self
            .engine
            .execute(&self.batch_workflow(), &inputs, output_dir)?;
        let modules_executed = if execution.success {
            MODULE_WORKFLOWS.iter().map(|(id, _)| *id).collect()
        } else {
            Vec::new()
        };
        self.logger.info(
            "agent.batch_finished",
            &format!(
                "id={} status={:?}",
                execution.execution_id, execution.status
            ),
        );
        Ok(BatchResult {
            pipeline: PIPELINE_NAME,
            samples_requested,
            modules_executed,
            execution,
        })
    }
}
