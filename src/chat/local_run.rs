use super::plan::{extract_files, module_reference, without_file_mentions};
use crate::knowledge::KnowledgeBase;
use crate::workflow::module_workflow;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

const EXECUTION_VERBS: &[&str] = &["run", "execute", "process", "analyze", "perform"];
const DATA_EXTENSIONS: &[&str] = &[".bam", ".cram", ".vcf", ".bed"];
const MODULE_WORDS: &[&str] = &["qc", "evidence", "module", "clustering", "genotyping"];

const MODULE_PATTERNS: &[(&str, &str)] = &[
    ("batch qc", "Module00c"),
    ("batch_qc", "Module00c"),
    ("qc", "Module00a"),
    ("evidence", "Module00b"),
    ("clustering", "Module01"),
    ("filtering", "Module03"),
    ("genotyping", "Module04"),
    ("annotation", "AnnotateVcf"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOperation {
    Execute,
    Validate,
    Convert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalRunPlan {
    pub module: Option<String>,
    pub operation: RunOperation,
    pub files: Vec<String>,
    pub parameters: Vec<(String, String)>,
}

struct Patterns {
    output_dir: Regex,
    sample_id: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        output_dir: Regex::new(r#"(?i)\boutput\s+(?:to\s+|in\s+|directory\s+)?["']?([^\s"']+)"#)
            .expect("output pattern"),
        sample_id: Regex::new(r#"(?i)\bsample\s+(?:name\s+|id\s+)?["']?(\w+)"#)
            .expect("sample pattern"),
    })
}

impl LocalRunPlan {
    pub fn from_request(message: &str) -> Option<Self> {
        let lowered = message.to_lowercase();
        let has_verb = EXECUTION_VERBS.iter().any(|verb| lowered.contains(verb));
        let has_files = DATA_EXTENSIONS.iter().any(|ext| lowered.contains(ext));
        let has_module = MODULE_WORDS.iter().any(|word| lowered.contains(word));
        if !has_verb || !(has_files || has_module) {
            return None;
        }

        Some(Self {
            module: identify_module(&without_file_mentions(message).to_lowercase()),
            operation: determine_operation(&lowered),
            files: extract_files(message),
            parameters: extract_parameters(message),
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn commands(&self) -> Vec<String> {
        let Some(module) = self.module.as_deref() else {
            return Vec::new();
        };
        match self.operation {
            RunOperation::Convert => vec![format!("sv-agent convert --modules {module}")],
            RunOperation::Validate => Vec::new(),
            RunOperation::Execute => {
                let workflow = module_workflow(module).unwrap_or(module);
                vec![format!("sv-agent run cwl/{workflow}.cwl {module}_inputs.yaml")]
            }
        }
    }

    pub fn module_inputs(&self) -> Value {
        let file_entry = |path: &str| json!({"class": "File", "path": path});
        match self.module.as_deref() {
            Some("Module00a") => json!({
                "bam_or_cram_file": self.files.first().map(|f| file_entry(f)).unwrap_or(Value::Null),
                "sample_id": self.parameter("sample_id").unwrap_or("sample1"),
                "reference_fasta": file_entry(&format!(
                    "/references/{}.fa",
                    self.parameter("reference").unwrap_or("hg38")
                )),
            }),
            Some("Module00b") => json!({
                "evidence_files": self.files.iter().map(|f| file_entry(f)).collect::<Vec<_>>(),
                "batch_id": "batch1",
            }),
            _ => {
                let mut doc = Map::new();
                doc.insert(
                    "input_files".to_string(),
                    Value::Array(self.files.iter().map(|f| file_entry(f)).collect()),
                );
                for (key, value) in &self.parameters {
                    doc.insert(key.clone(), Value::String(value.clone()));
                }
                Value::Object(doc)
            }
        }
    }

    pub fn render(&self, kb: &KnowledgeBase) -> String {
        let Some(module) = self.module.as_deref() else {
            return "I could not tell which GATK-SV module to run from your request. Name a module (for example Module00a) or a stage such as QC, clustering or genotyping.".to_string();
        };
        let mut out = format!("**Execution Plan for: {module}**\n\n");
        if let Some(info) = kb.get_module_info(module) {
            out.push_str(&format!("Module: {}\nPurpose: {}\n\n", info.name, info.purpose));
        }

        out.push_str("**Detected Inputs:**\n");
        if self.files.is_empty() {
            out.push_str("- (none detected)\n");
        }
        for file in &self.files {
            out.push_str(&format!("- {file}\n"));
        }

        if !self.parameters.is_empty() {
            out.push_str("\n**Parameters:**\n");
            for (key, value) in &self.parameters {
                out.push_str(&format!("- {key}: {value}\n"));
            }
        }

        if let Ok(inputs) = serde_yaml::to_string(&self.module_inputs()) {
            out.push_str(&format!(
                "\n**{module}_inputs.yaml:**\n```yaml\n{}\n```\n",
                inputs.trim_end()
            ));
        }

        let commands = self.commands();
        if !commands.is_empty() {
            out.push_str("\n**Commands to execute:**\n```bash\n");
            out.push_str(&commands.join("\n"));
            out.push_str("\n```\n");
        }
        out.push_str("\nThis is a dry run; nothing has been executed. Run the commands above to start the analysis.");
        out
    }
}

fn identify_module(lowered: &str) -> Option<String> {
    if let Some((_, module)) = MODULE_PATTERNS
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
    {
        return Some(module.to_string());
    }
    if let Some(module) = module_reference(lowered) {
        return Some(module);
    }
    let compact = lowered.replace(' ', "");
    if compact.contains("gathersampleevidence") {
        Some("Module00a".to_string())
    } else if compact.contains("evidenceqc") {
        Some("Module00b".to_string())
    } else {
        None
    }
}

fn determine_operation(lowered: &str) -> RunOperation {
    if ["run", "execute", "process", "analyze"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        RunOperation::Execute
    } else if ["check", "validate", "verify"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        RunOperation::Validate
    } else if ["convert", "transform"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        RunOperation::Convert
    } else {
        RunOperation::Execute
    }
}

fn extract_parameters(message: &str) -> Vec<(String, String)> {
    let lowered = message.to_lowercase();
    let mut params = Vec::new();
    if lowered.contains("hg38") {
        params.push(("reference".to_string(), "hg38".to_string()));
    } else if lowered.contains("hg19") || lowered.contains("grch37") {
        params.push(("reference".to_string(), "hg19".to_string()));
    }
    let p = patterns();
    if let Some(dir) = p.output_dir.captures(message).and_then(|caps| caps.get(1)) {
        params.push(("output_dir".to_string(), dir.as_str().to_string()));
    }
    if let Some(id) = p.sample_id.captures(message).and_then(|caps| caps.get(1)) {
        params.push(("sample_id".to_string(), id.as_str().to_string()));
    }
    params
}
