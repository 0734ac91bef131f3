use super::intent::words;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Cgc,
    Cavatica,
    Aws,
    Gcp,
    Azure,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Cgc,
        Platform::Cavatica,
        Platform::Aws,
        Platform::Gcp,
        Platform::Azure,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Cgc => "cgc",
            Self::Cavatica => "cavatica",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cgc => "Cancer Genomics Cloud",
            Self::Cavatica => "CAVATICA",
            Self::Aws => "Seven Bridges Platform (AWS)",
            Self::Gcp => "Seven Bridges Platform (GCP)",
            Self::Azure => "Seven Bridges Platform (Azure)",
        }
    }

    pub fn api_url(self) -> &'static str {
        match self {
            Self::Cgc => "https://cgc-api.sbgenomics.com/v2",
            Self::Cavatica => "https://cavatica-api.sbgenomics.com/v2",
            Self::Aws => "https://api.sbgenomics.com/v2",
            Self::Gcp => "https://gcp-api.sbgenomics.com/v2",
            Self::Azure => "https://eu-api.sbgenomics.com/v2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Cgc => "NIH Cancer Genomics Cloud for cancer research",
            Self::Cavatica => "Kids First Data Resource Center platform for pediatric research",
            Self::Aws => "Commercial platform on AWS infrastructure",
            Self::Gcp => "Commercial platform on Google Cloud infrastructure",
            Self::Azure => "Commercial platform on Azure infrastructure",
        }
    }

    pub fn pricing(self) -> &'static str {
        match self {
            Self::Cgc => "Free tier available with TCGA/TARGET data access",
            Self::Cavatica => "Free tier available with Kids First data access",
            Self::Aws | Self::Gcp | Self::Azure => "Pay-per-use pricing",
        }
    }

    fn find_in(lowered: &str) -> Option<Self> {
        let tokens: Vec<&str> = words(lowered).collect();
        Self::ALL
            .into_iter()
            .find(|platform| {
                tokens.contains(&platform.key()) || lowered.contains(&platform.name().to_lowercase())
            })
            .or_else(|| lowered.contains("seven bridges").then_some(Self::Aws))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSize {
    Small,
    Medium,
    Large,
    Memory,
}

impl InstanceSize {
    pub const ALL: [InstanceSize; 4] = [
        InstanceSize::Small,
        InstanceSize::Medium,
        InstanceSize::Large,
        InstanceSize::Memory,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Memory => "memory",
        }
    }

    pub fn instance_type(self) -> &'static str {
        match self {
            Self::Small => "c5.xlarge",
            Self::Medium => "c5.4xlarge",
            Self::Large => "c5.9xlarge",
            Self::Memory => "r5.4xlarge",
        }
    }

    pub fn cpus(self) -> u32 {
        match self {
            Self::Small => 4,
            Self::Medium | Self::Memory => 16,
            Self::Large => 36,
        }
    }

    pub fn memory_gb(self) -> u32 {
        match self {
            Self::Small => 8,
            Self::Medium => 32,
            Self::Large => 72,
            Self::Memory => 128,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Small => "Small workloads, single sample QC",
            Self::Medium => "Medium workloads, batch processing",
            Self::Large => "Large workloads, cohort analysis",
            Self::Memory => "Memory-intensive tasks, large references",
        }
    }

    pub fn hourly_rate(self) -> f64 {
        match self {
            Self::Small => 0.20,
            Self::Medium => 0.80,
            Self::Large => 1.80,
            Self::Memory => 1.20,
        }
    }

    fn find_in(lowered: &str) -> Option<Self> {
        let tokens: Vec<&str> = words(lowered).collect();
        let has = |candidates: &[&str]| candidates.iter().any(|word| tokens.contains(word));
        if lowered.contains("high memory") || has(&["large", "big", "intensive"]) {
            Some(Self::Large)
        } else if has(&["small", "quick", "test"]) {
            Some(Self::Small)
        } else if has(&["medium", "batch"]) {
            Some(Self::Medium)
        } else if has(&["memory", "ram"]) {
            Some(Self::Memory)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanField {
    Platform,
    Module,
    Files,
    Project,
    InstanceSize,
}

impl PlanField {
    pub const ALL: [PlanField; 5] = [
        PlanField::Platform,
        PlanField::Module,
        PlanField::Files,
        PlanField::Project,
        PlanField::InstanceSize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Module => "module",
            Self::Files => "files",
            Self::Project => "project",
            Self::InstanceSize => "instance_size",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Platform => "Seven Bridges platform",
            Self::Module => "GATK-SV module",
            Self::Files => "list of input files",
            Self::Project => "project id",
            Self::InstanceSize => "instance size",
        }
    }
}

pub const DIALOG_MODULES: [(&str, &str); 6] = [
    ("Module00a", "Sample QC (GatherSampleEvidence)"),
    ("Module00b", "Evidence Collection"),
    ("Module00c", "Batch QC"),
    ("Module01", "Clustering"),
    ("Module03", "Filtering"),
    ("Module04", "Genotyping"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub field: PlanField,
    pub prompt: &'static str,
    pub options: Vec<String>,
}

impl Question {
    pub fn for_field(field: PlanField) -> Self {
        match field {
            PlanField::Platform => Self {
                field,
                prompt: "Which Seven Bridges platform would you like to use?",
                options: Platform::ALL
                    .iter()
                    .map(|p| format!("{}: {} - {}", p.key(), p.name(), p.description()))
                    .collect(),
            },
            PlanField::Module => Self {
                field,
                prompt: "Which GATK-SV module would you like to run?",
                options: DIALOG_MODULES
                    .iter()
                    .map(|(id, label)| format!("{id}: {label}"))
                    .collect(),
            },
            PlanField::Files => Self {
                field,
                prompt: "What input files would you like to process? (Provide Seven Bridges file paths like sbg://project/file.bam or describe the files)",
                options: Vec::new(),
            },
            PlanField::Project => Self {
                field,
                prompt: "What Seven Bridges project should I use? (Format: username/project-name)",
                options: Vec::new(),
            },
            PlanField::InstanceSize => Self {
                field,
                prompt: "What instance size would you like to use?",
                options: InstanceSize::ALL
                    .iter()
                    .map(|size| {
                        format!(
                            "{}: {} ({} CPU, {} GB RAM) - {}",
                            size.key(),
                            size.instance_type(),
                            size.cpus(),
                            size.memory_gb(),
                            size.description()
                        )
                    })
                    .collect(),
            },
        }
    }

    pub fn is_choice(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn body(&self) -> String {
        let mut out = String::new();
        if self.is_choice() {
            for (index, option) in self.options.iter().enumerate() {
                out.push_str(&format!("{}. {option}\n", index + 1));
            }
            out.push_str("\nPlease respond with a number or keyword.");
        } else {
            out.push_str("Please provide your answer.");
        }
        out
    }

    pub(crate) fn unrecognized_notice(&self, answer: &str) -> String {
        format!(
            "I did not recognise \"{}\" as a {}.",
            answer.trim(),
            self.field.label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Accepted,
    Unrecognized,
}

struct Patterns {
    module_ref: Regex,
    sbg_uri: Regex,
    quoted_file: Regex,
    bare_file: Regex,
    project_keyword: Regex,
    project_token: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        module_ref: Regex::new(r"(?i)module\s*(\d+[a-c]?)").expect("module pattern"),
        sbg_uri: Regex::new(r"sbg://[\w\-/\.]+").expect("sbg pattern"),
        quoted_file: Regex::new(r#"(?i)["']([^"']+\.(?:bam|cram|vcf|bed|fa|fasta))["']"#)
            .expect("quoted file pattern"),
        bare_file: Regex::new(r"(?i)[\w/\-\.]+\.(?:bam|cram|vcf|bed|fa|fasta)\b")
            .expect("bare file pattern"),
        project_keyword: Regex::new(r"(?i)\bproject\s+([A-Za-z0-9_\-]+/[A-Za-z0-9_\-]+)")
            .expect("project pattern"),
        project_token: Regex::new(r"^[A-Za-z0-9_\-]+/[A-Za-z0-9_\-]+$")
            .expect("project token pattern"),
    })
}

pub fn module_reference(text: &str) -> Option<String> {
    patterns()
        .module_ref
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("Module{:0>2}", number.as_str().to_lowercase()))
}

pub fn extract_module(text: &str) -> Option<String> {
    if let Some(module) = module_reference(text) {
        return Some(module);
    }
    let lowered = text.to_lowercase();
    if lowered.replace(' ', "").contains("gathersampleevidence") {
        return Some("Module00a".to_string());
    }
    const PHRASES: [(&str, &str); 6] = [
        ("sample qc", "Module00a"),
        ("batch qc", "Module00c"),
        ("evidence", "Module00b"),
        ("clustering", "Module01"),
        ("filtering", "Module03"),
        ("genotyping", "Module04"),
    ];
    if let Some((_, module)) = PHRASES.iter().find(|(phrase, _)| lowered.contains(phrase)) {
        return Some(module.to_string());
    }
    let has_qc = words(&lowered).any(|word| word == "qc");
    has_qc.then(|| "Module00a".to_string())
}

pub fn extract_files(text: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for (_, _, value) in file_mentions(text) {
        if !files.iter().any(|existing| existing == value) {
            files.push(value.to_string());
        }
    }
    files
}

// File names such as test_sample.bam must not answer platform, module or size.
pub fn without_file_mentions(text: &str) -> String {
    let mut out = text.to_string();
    for (start, end, _) in file_mentions(text) {
        out.replace_range(start..end, &" ".repeat(end - start));
    }
    out
}

fn file_mentions(text: &str) -> Vec<(usize, usize, &str)> {
    let p = patterns();
    let mut candidates: Vec<(usize, usize, &str)> = Vec::new();
    candidates.extend(
        p.sbg_uri
            .find_iter(text)
            .map(|found| (found.start(), found.end(), found.as_str())),
    );
    candidates.extend(p.quoted_file.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let path = caps.get(1)?;
        Some((whole.start(), whole.end(), path.as_str()))
    }));
    candidates.extend(
        p.bare_file
            .find_iter(text)
            .map(|found| (found.start(), found.end(), found.as_str())),
    );

    let mut mentions: Vec<(usize, usize, &str)> = Vec::new();
    for (start, end, value) in candidates {
        if mentions.iter().any(|(s, e, _)| start < *e && *s < end) {
            continue;
        }
        mentions.push((start, end, value));
    }
    mentions
}

pub fn extract_project(text: &str) -> Option<String> {
    let p = patterns();
    if let Some(project) = p
        .project_keyword
        .captures(text)
        .and_then(|caps| caps.get(1))
        .filter(|project| !is_word_pair(project.as_str()))
    {
        return Some(project.as_str().to_string());
    }
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| ",;:()'\"`!?".contains(c) || c == '.'))
        .find(|token| p.project_token.is_match(token) && !is_word_pair(token))
        .map(str::to_string)
}

const WORD_PAIRS: &[&str] = &[
    "and/or",
    "either/or",
    "yes/no",
    "on/off",
    "true/false",
    "input/output",
    "read/write",
    "he/she",
    "his/her",
    "him/her",
    "i/o",
];

fn is_word_pair(token: &str) -> bool {
    WORD_PAIRS
        .iter()
        .any(|pair| pair.eq_ignore_ascii_case(token))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionPlan {
    pub platform: Option<Platform>,
    pub module: Option<String>,
    pub files: Vec<String>,
    pub project: Option<String>,
    pub instance_size: Option<InstanceSize>,
    pub original_prompt: String,
}

impl ExecutionPlan {
    pub fn from_request(text: &str) -> Self {
        let keywords = without_file_mentions(text);
        let lowered = keywords.to_lowercase();
        Self {
            platform: Platform::find_in(&lowered),
            module: extract_module(&keywords),
            files: extract_files(text),
            project: extract_project(&keywords),
            instance_size: InstanceSize::find_in(&lowered),
            original_prompt: text.to_string(),
        }
    }

    pub fn has(&self, field: PlanField) -> bool {
        match field {
            PlanField::Platform => self.platform.is_some(),
            PlanField::Module => self.module.is_some(),
            PlanField::Files => !self.files.is_empty(),
            PlanField::Project => self.project.is_some(),
            PlanField::InstanceSize => self.instance_size.is_some(),
        }
    }

    pub fn missing_fields(&self) -> Vec<PlanField> {
        PlanField::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn apply_answer(&mut self, field: PlanField, answer: &str) -> AnswerOutcome {
        let trimmed = answer.trim();
        let choice = trimmed
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1));
        let lowered = trimmed.to_lowercase();

        let accepted = match field {
            PlanField::Platform => {
                let picked = match choice {
                    Some(index) => Platform::ALL.get(index).copied(),
                    None => Platform::find_in(&lowered),
                };
                picked.map(|platform| self.platform = Some(platform)).is_some()
            }
            PlanField::Module => {
                let picked = match choice {
                    Some(index) => DIALOG_MODULES.get(index).map(|(id, _)| id.to_string()),
                    None => extract_module(trimmed).or_else(|| {
                        DIALOG_MODULES
                            .iter()
                            .find(|(_, label)| lowered.contains(&label.to_lowercase()))
                            .map(|(id, _)| id.to_string())
                    }),
                };
                picked.map(|module| self.module = Some(module)).is_some()
            }
            PlanField::Files => {
                let files = extract_files(trimmed);
                if files.is_empty() {
                    false
                } else {
                    self.files = files;
                    true
                }
            }
            PlanField::Project => extract_project(trimmed)
                .map(|project| self.project = Some(project))
                .is_some(),
            PlanField::InstanceSize => {
                let picked = match choice {
                    Some(index) => InstanceSize::ALL.get(index).copied(),
                    None => InstanceSize::ALL
                        .into_iter()
                        .find(|size| lowered.contains(size.instance_type()))
                        .or_else(|| InstanceSize::find_in(&lowered)),
                };
                picked.map(|size| self.instance_size = Some(size)).is_some()
            }
        };

        if accepted {
            AnswerOutcome::Accepted
        } else {
            AnswerOutcome::Unrecognized
        }
    }

    pub fn ready(&self) -> Option<ReadyPlan> {
        Some(ReadyPlan {
            platform: self.platform?,
            module: self.module.clone()?,
            files: (!self.files.is_empty()).then(|| self.files.clone())?,
            project: self.project.clone()?,
            instance_size: self.instance_size?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub estimated_hours: u32,
    pub hourly_rate: f64,
    pub estimated_cost_usd: f64,
    pub note: &'static str,
}

pub const EXECUTION_STEPS: [&str; 6] = [
    "Upload CWL workflow to Seven Bridges platform",
    "Configure workflow inputs and parameters",
    "Set compute instance requirements",
    "Submit workflow execution",
    "Monitor execution progress",
    "Download results when complete",
];

const DEFAULT_MODULE_HOURS: u32 = 4;

pub fn estimated_module_hours(module: &str) -> u32 {
    match module {
        "Module00a" => 2,
        "Module00b" => 4,
        "Module00c" => 1,
        "Module01" => 6,
        "Module03" => 3,
        "Module04" => 8,
        _ => DEFAULT_MODULE_HOURS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyPlan {
    platform: Platform,
    module: String,
    files: Vec<String>,
    project: String,
    instance_size: InstanceSize,
}

impl ReadyPlan {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn instance_size(&self) -> InstanceSize {
        self.instance_size
    }

    pub fn app_id(&self) -> String {
        format!("gatk-sv/{}", self.module.to_lowercase())
    }

    pub fn cost_estimate(&self) -> CostEstimate {
        let hours = estimated_module_hours(&self.module);
        let rate = self.instance_size.hourly_rate();
        CostEstimate {
            estimated_hours: hours,
            hourly_rate: rate,
            estimated_cost_usd: (f64::from(hours) * rate * 100.0).round() / 100.0,
            note: "Estimates are approximate and exclude storage costs",
        }
    }

    fn sample_id(&self) -> String {
        self.files
            .first()
            .and_then(|file| file.rsplit('/').next())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("sample1")
            .to_string()
    }

    pub fn task_inputs(&self) -> serde_json::Value {
        json!({
            "bam_or_cram_file": self.files[0],
            "sample_id": self.sample_id(),
        })
    }

    pub fn cli_commands(&self) -> Vec<String> {
        let module = &self.module;
        let project = &self.project;
        vec![
            "# Set Seven Bridges profile".to_string(),
            format!("sb config set endpoint {}", self.platform.api_url()),
            "sb config set token YOUR_AUTH_TOKEN".to_string(),
            String::new(),
            "# Upload CWL workflow".to_string(),
            format!("sb apps install-workflow cwl/{module}.cwl {project}"),
            String::new(),
            "# Create and submit task".to_string(),
            "sb tasks create \\".to_string(),
            format!("  --project {project} \\"),
            format!("  --app {project}/{} \\", module.to_lowercase()),
            format!("  --name '{module}-execution' \\"),
            format!("  --inputs '{}' \\", self.task_inputs()),
            format!("  --instance-type {}", self.instance_size.instance_type()),
            String::new(),
            "# Monitor execution".to_string(),
            format!("sb tasks list --project {project} --status RUNNING"),
        ]
    }

    pub fn render(&self) -> String {
        let cost = self.cost_estimate();
        let mut out = String::from("**Seven Bridges Execution Plan**\n\n");
        out.push_str(&format!("**Platform:** {}\n", self.platform.name()));
        out.push_str(&format!("**API endpoint:** {}\n", self.platform.api_url()));
        out.push_str(&format!("**Pricing:** {}\n", self.platform.pricing()));
        out.push_str(&format!("**Project:** {}\n", self.project));
        out.push_str(&format!("**Module:** {} ({})\n\n", self.module, self.app_id()));

        out.push_str("**Input Files:**\n");
        for file in &self.files {
            out.push_str(&format!("- {file}\n"));
        }
        out.push('\n');

        out.push_str("**Cost Estimate:**\n");
        out.push_str(&format!(
            "- Instance: {} ({} CPU, {} GB RAM)\n",
            self.instance_size.instance_type(),
            self.instance_size.cpus(),
            self.instance_size.memory_gb()
        ));
        out.push_str(&format!("- Estimated time: {} hours\n", cost.estimated_hours));
        out.push_str(&format!("- Hourly rate: ${:.2}\n", cost.hourly_rate));
        out.push_str(&format!("- Estimated cost: ${:.2}\n", cost.estimated_cost_usd));
        out.push_str(&format!("- Note: {}\n\n", cost.note));

        out.push_str("**Execution Steps:**\n");
        for (index, step) in EXECUTION_STEPS.iter().enumerate() {
            out.push_str(&format!("{}. {step}\n", index + 1));
        }
        out.push('\n');

        out.push_str("**Seven Bridges CLI Commands:**\n```bash\n");
        out.push_str(&self.cli_commands().join("\n"));
        out.push_str("\n```\n\n");

        out.push_str("**Next Steps:**\n");
        out.push_str(
            "1. Ensure you have the Seven Bridges CLI installed: `pip install sevenbridges-python`\n",
        );
        out.push_str("2. Set up your authentication token\n");
        out.push_str("3. Run the commands above");
        out
    }
}
