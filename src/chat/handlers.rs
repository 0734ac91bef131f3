//! Templated responses for every non-general intent. Handlers are pure
//! functions of the message and the knowledge base.

use super::local_run::LocalRunPlan;
use super::plan::{module_reference, DIALOG_MODULES};
use crate::knowledge::{KnowledgeBase, ModuleInfo, SvTypeInfo, SV_TYPE_CODES};
use regex::Regex;
use std::sync::OnceLock;

const CAPABILITY_WORDS: &[&str] = &["can", "run", "execute", "tool", "what", "do", "capability"];
const MAX_CONTEXT_HITS: usize = 3;

pub fn help_text() -> String {
    "I'm SV-Agent, your domain-specific agent for structural variant analysis using GATK-SV.

Here's what I can help you with:

**Analysis Tasks:**
- Run GATK-SV modules locally or plan Seven Bridges executions
- Convert WDL workflows to CWL format
- Analyze workflow structure and dependencies
- Check sample quality metrics

**Knowledge & Guidance:**
- Explain SV types (DEL, DUP, INV, INS, BND)
- Describe GATK-SV modules and their purposes
- Recommend best practices for your analysis
- Troubleshoot common issues

**Practical Examples:**
- \"Explain Module00a\"
- \"Convert Module00b to CWL\"
- \"What coverage do I need for SV detection?\"
- \"Run QC on Seven Bridges with sample1.bam\"
- \"Troubleshoot low calls\"

Type your question or command, and I'll help you with your SV analysis!"
        .to_string()
}

pub fn format_module_explanation(module_id: &str, info: &ModuleInfo) -> String {
    let mut out = format!(
        "**{module_id}: {}**\n\n**Purpose:** {}\n\n",
        info.name, info.purpose
    );
    if !info.inputs.is_empty() {
        out.push_str(&format!("**Inputs:** {}\n", info.inputs.join(", ")));
    }
    if !info.outputs.is_empty() {
        out.push_str(&format!("**Outputs:** {}\n", info.outputs.join(", ")));
    }
    if !info.algorithms.is_empty() {
        out.push_str(&format!(
            "\n**Algorithms used:** {}\n",
            info.algorithms.join(", ")
        ));
    }
    if !info.key_metrics.is_empty() {
        out.push_str(&format!(
            "\n**Key metrics:** {}\n",
            info.key_metrics.join(", ")
        ));
    }
    for (label, values) in info.details {
        out.push_str(&format!("\n**{}:** {}\n", capitalize(label), values.join(", ")));
    }
    out
}

pub fn format_sv_explanation(code: &str, info: &SvTypeInfo) -> String {
    format!(
        "**{code}: {}**\n\n{}\n\n**Minimum size:** {}bp\n**Detection methods:** {}\n**Potential impact:** {}\n",
        info.name,
        info.description,
        info.min_size,
        info.detection_methods.join(", "),
        info.impact
    )
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sv_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\b(del|dup|inv|ins|bnd)\b").expect("sv code pattern"))
}

pub fn explain(kb: &KnowledgeBase, message: &str) -> String {
    if let Some(module_id) = module_reference(message) {
        if let Some(info) = kb.get_module_info(&module_id) {
            return format_module_explanation(&module_id, info);
        }
    }
    if let Some(code) = sv_code_pattern()
        .captures(message)
        .and_then(|caps| caps.get(1))
    {
        if let Some(info) = kb.get_sv_type_info(code.as_str()) {
            return format_sv_explanation(&code.as_str().to_ascii_uppercase(), info);
        }
    }
    let lowered = message.to_lowercase();
    if lowered.contains("pipeline") || lowered.contains("overview") {
        return kb.pipeline_overview().to_string();
    }
    knowledge_search(kb, message)
}

pub fn convert(message: &str) -> String {
    let modules: Vec<String> = module_references(message);
    if modules.is_empty() {
        return "To convert GATK-SV workflows to CWL, specify which modules you want to convert.

**Examples:**
- \"Convert Module00a to CWL\"
- \"Convert all modules to CWL\"
- \"Convert Module01 and Module02\"

**Command line:**
```bash
sv-agent convert --output cwl_output
```"
            .to_string();
    }
    let listed = modules.join(", ");
    let args = modules.join(",");
    format!(
        "I'll convert the following GATK-SV modules to CWL format: {listed}

**Command line:**
```bash
sv-agent convert --output cwl_output --modules {args}
```

Each module is converted independently; a failure in one does not stop the others. The converted CWL files are compatible with standard CWL runners like cwltool or Toil."
    )
}

fn module_references(message: &str) -> Vec<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"(?i)module\s*(\d+[a-c]?)").expect("module list pattern"));
    let mut modules: Vec<String> = Vec::new();
    for caps in pattern.captures_iter(message) {
        if let Some(number) = caps.get(1) {
            let module = format!("Module{:0>2}", number.as_str().to_lowercase());
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
    }
    modules
}

pub fn analyze(message: &str) -> String {
    let lowered = message.to_lowercase();
    if lowered.contains("workflow") {
        return "To analyze a GATK-SV workflow structure:

```bash
sv-agent analyze gatk-sv/wdl/GATKSVPipelineBatch.wdl
```

This will show you:
- Input/output requirements
- Task and call counts
- Imported sub-workflows
- Parallelization opportunities and dependency cycles"
            .to_string();
    }
    if ["sample", "data", "bam", "vcf"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        return "To analyze your samples before running GATK-SV:

**1. Check BAM/CRAM files:**
```bash
samtools stats input.bam | grep \"average length\"
samtools flagstat input.bam
```

**2. Prepare sample metadata:**
```json
{
  \"samples\": [
    {\"id\": \"SAMPLE001\", \"bam\": \"/path/to/sample001.bam\", \"sex\": \"female\", \"batch\": \"batch1\"}
  ]
}
```

**3. Run preliminary QC:**
- Minimum 30x coverage recommended
- Check for proper pair alignment
- Verify reference genome match"
            .to_string();
    }
    "What would you like to analyze? Please specify workflows, samples, or results.".to_string()
}

pub fn run(kb: &KnowledgeBase, message: &str) -> String {
    if let Some(plan) = LocalRunPlan::from_request(message) {
        return plan.render(kb);
    }
    let modules = DIALOG_MODULES
        .iter()
        .map(|(id, label)| format!("- {id}: {label}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "sv-agent can execute CWL workflows to run GATK-SV analysis.

**Local Execution:**
Try commands like:
- \"Run QC on sample1.bam\"
- \"Execute Module00a with these files: file1.bam, file2.bam\"
- \"Show me how to run genotyping on these samples\"

**Seven Bridges Platform Execution:**
Try commands like:
- \"Run QC on Seven Bridges with sample1.bam\"
- \"Execute Module00a on CGC platform\"
- \"Process this on CAVATICA: sbg://project/sample.bam\"

**Manual Execution:**
```bash
sv-agent convert --output cwl_output --modules Module00a
sv-agent run cwl_output/GatherSampleEvidence.cwl inputs.yaml
```

**Supported Platforms:**
- Cancer Genomics Cloud (CGC): free for cancer research
- CAVATICA: free for pediatric research
- Seven Bridges AWS/GCP/Azure: commercial platforms

**Supported Modules:**
{modules}

{}",
        kb.capabilities().run_command
    )
}

pub fn status(last_activity: Option<&str>) -> String {
    match last_activity {
        Some(activity) => format!("Current status:\n\nLast operation: {activity}\n\nReady for next command."),
        None => "No active operations.

I'm ready to help with:
- Converting WDL workflows to CWL
- Analyzing workflow structure
- Answering questions about GATK-SV
- Providing best practices for SV analysis

What would you like to do?"
            .to_string(),
    }
}

pub fn recommend(kb: &KnowledgeBase, message: &str) -> String {
    let lowered = message.to_lowercase();
    if lowered.contains("coverage") {
        return "**Coverage Recommendations for SV Detection:**

**Optimal:** 30-50x mean coverage
- Detects full range of SV sizes (50bp - 1Mb+)
- High sensitivity for all SV types

**Acceptable:** 15-30x coverage
- Good for SVs >500bp
- May miss smaller events

**Limited:** <15x coverage
- Only large SVs (>5kb) reliably detected
- Not recommended for comprehensive analysis

**Check your actual coverage with:**
```bash
samtools depth -a input.bam | awk '{sum+=$3} END {print sum/NR}'
```"
            .to_string();
    }
    if lowered.contains("samples") || lowered.contains("cohort") {
        return "**Sample/Cohort Recommendations:**

**Cohort Size:**
- Minimum: 30 samples (for reliable frequency estimates)
- Optimal: 100-500 samples

**Sample Selection:**
- Balance male/female for sex chromosome analysis
- Match sequencing platform and chemistry
- Consider ancestry/population structure

**Family Studies:**
- Include complete trios when possible to improve de novo SV detection

**Batch Effects:**
- Process samples from the same sequencing run together
- Document batch information in metadata"
            .to_string();
    }
    if lowered.contains("filter") || lowered.contains("threshold") {
        return "**Filtering Recommendations:**

**Quality Thresholds:**
```
High confidence: FILTER == \"PASS\" && GQ >= 20
Research use:    FILTER == \"PASS\" && GQ >= 10
Exploratory:     FILTER != \"FAIL\" && GQ >= 5
```

**Frequency Filters:**
- Rare variants: AF < 0.01
- Low frequency: AF < 0.05

**Size Filters:**
- 50bp - 1kb: higher false-positive rate
- 1kb - 100kb: most reliable
- >100kb: check for artifacts

Start with stringent filters, then relax based on validation results."
            .to_string();
    }
    best_practices(kb, &lowered)
}

fn best_practices(kb: &KnowledgeBase, lowered: &str) -> String {
    let matching: Vec<_> = kb
        .best_practices()
        .iter()
        .filter(|list| lowered.contains(&list.category.replace('_', " ")))
        .collect();
    let lists: Vec<_> = if matching.is_empty() {
        kb.best_practices().iter().collect()
    } else {
        matching
    };

    let mut out = String::from("**Best Practices:**\n\n");
    for list in lists {
        out.push_str(&format!("**{}:**\n", list.title()));
        for practice in list.practices {
            out.push_str(&format!("- {practice}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

const TROUBLESHOOTING: &[(&str, &str)] = &[
    (
        "low calls",
        "**Troubleshooting Low SV Calls:**

1. **Check Coverage:** `samtools depth input.bam | awk '{sum+=$3} END {print sum/NR}'` (need >=30x for good sensitivity)
2. **Verify Insert Size:** `samtools stats input.bam | grep \"insert size\"` (300-500bp for standard libraries)
3. **Check Alignment Quality:** high proportion of properly paired reads, low chimeric read rate (<5%)
4. **Module00c Output:** look for samples flagged as outliers and batch effects
5. **Common Fixes:** re-align with BWA-MEM, include unmapped reads, use the correct reference genome version",
    ),
    (
        "memory",
        "**Troubleshooting Memory Issues:**

1. **Reduce Parallelization:** process fewer samples simultaneously, reduce scatter count
2. **Adjust Java Memory:** `-Xmx100G` for large cohorts, `-XX:+UseG1GC` for better GC
3. **Module-Specific Settings:** limit MELT memory in Module00b, reduce genotyping batch size
4. **Infrastructure:** use high-memory instances (the `memory` instance size on Seven Bridges)",
    ),
    (
        "failed",
        "**Troubleshooting Failed Jobs:**

1. **Check Logs:** workflow engine logs, individual tool stderr, system logs (OOM killer)
2. **Common Failures:** missing index files (.bai/.crai), reference mismatch, insufficient disk space, container pull failures
3. **Recovery:** most modules can resume; check for partial outputs and increase resource allocations",
    ),
];

pub fn troubleshoot(message: &str) -> String {
    let lowered = message.to_lowercase();
    TROUBLESHOOTING
        .iter()
        .find(|(issue, _)| lowered.contains(issue))
        .map(|(_, solution)| solution.to_string())
        .unwrap_or_else(|| {
            "What issue are you experiencing? Common problems include:

- Low SV call counts
- Memory/resource errors
- Failed jobs or modules
- Long runtime
- Quality concerns

Please describe your specific issue for targeted troubleshooting."
                .to_string()
        })
}

pub fn knowledge_search(kb: &KnowledgeBase, query: &str) -> String {
    let hits = kb.search_knowledge(query);
    if hits.is_empty() {
        if let Some(entry) = kb.faq_by_word_overlap(query) {
            return format!("**{}**\n\n{}", entry.question, entry.answer);
        }
        return format!(
            "I don't have specific information about '{}'. Try asking about:\n- GATK-SV modules (Module00a-Module06)\n- SV types (deletions, duplications, inversions)\n- Best practices for SV analysis\n- Troubleshooting common issues",
            query.trim()
        );
    }
    let blocks = hits
        .iter()
        .take(MAX_CONTEXT_HITS)
        .map(|hit| hit.answer_block())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Here's what I found about '{}':\n\n{blocks}", query.trim())
}

pub fn knowledge_context(kb: &KnowledgeBase, query: &str) -> String {
    let lowered = query.to_lowercase();
    let mut parts: Vec<String> = Vec::new();
    let tokens: Vec<&str> = super::intent::words(&lowered).collect();
    if CAPABILITY_WORDS.iter().any(|word| tokens.contains(word)) {
        let caps = kb.capabilities();
        parts.push("SV-AGENT CAPABILITIES:".to_string());
        parts.push("Main function: Execute CWL workflows to run GATK-SV analysis".to_string());
        parts.push(format!(
            "Can do: {}",
            caps.can_do.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ));
        parts.push(format!(
            "Cannot do: {}",
            caps.cannot_do.iter().take(2).copied().collect::<Vec<_>>().join(", ")
        ));
        parts.push(format!("Run command: {}", caps.run_command));
        parts.push(format!("Convert command: {}", caps.convert_command));
        parts.push(String::new());
    }
    parts.extend(
        kb.search_knowledge(query)
            .iter()
            .take(MAX_CONTEXT_HITS)
            .map(|hit| hit.context_line()),
    );
    // SV type codes mentioned anywhere in the question.
    for code in SV_TYPE_CODES {
        if tokens.contains(&code.to_lowercase().as_str()) {
            if let Some(info) = kb.get_sv_type_info(code) {
                parts.push(format!("{code}: {} - {}", info.name, info.description));
            }
        }
    }
    parts.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_lists_each_module_once() {
        let reply = convert("convert module 1 and Module00a and module01");
        assert!(reply.contains("Module01, Module00a"));
        assert!(reply.contains("--modules Module01,Module00a"));
    }

    #[test]
    fn explain_prefers_modules_then_sv_codes() {
        let kb = KnowledgeBase::gatk_sv();
        assert!(explain(&kb, "explain module 00a").starts_with("**Module00a:"));
        assert!(explain(&kb, "explain an INV please").starts_with("**INV:"));
    }

    #[test]
    fn explain_without_a_target_gives_the_pipeline_overview() {
        let kb = KnowledgeBase::gatk_sv();
        let reply = explain(&kb, "describe module layout of the pipeline");
        assert!(reply.starts_with("GATK-SV Pipeline Overview:"));
        assert!(reply.contains("**Final QC** (Module06)"));
    }

    #[test]
    fn capability_block_only_for_tool_questions() {
        let kb = KnowledgeBase::gatk_sv();
        assert!(knowledge_context(&kb, "what can this tool do").contains("SV-AGENT CAPABILITIES"));
        assert!(!knowledge_context(&kb, "manta").contains("SV-AGENT CAPABILITIES"));
    }
}
