use super::prompt::user_question_segment;
use super::{GenerateOptions, LlmProvider, ProviderError};

struct CannedRule {
    groups: &'static [&'static [&'static str]],
    reply: &'static str,
}

const RULES: &[CannedRule] = &[
    CannedRule {
        groups: &[&["coverage"], &["sv"]],
        reply: "For reliable SV detection with GATK-SV, we recommend:\n- Minimum 30x coverage for short-read WGS\n- Higher coverage (40-50x) improves sensitivity for smaller SVs\n- At least 10x coverage for population-scale studies",
    },
    CannedRule {
        groups: &[&["manta", "melt"]],
        reply: "GATK-SV integrates multiple SV callers:\n- Manta: Detects all SV types using PE/SR evidence\n- MELT: Specializes in mobile element insertions\n- Wham: Multiple signal SV detection\n- cn.MOPS & gCNV: Copy number variation detection",
    },
    CannedRule {
        groups: &[&["module"], &["00a", "gather"]],
        reply: "Module00a (GatherSampleEvidence) collects SV evidence from individual samples:\n- Runs SV callers (Manta, MELT, Scramble, Wham)\n- Extracts read depth, paired-end, and split-read signals\n- Outputs: PE, SR, RD, BAF evidence files per sample",
    },
    CannedRule {
        groups: &[&["convert", "cwl"]],
        reply: "To convert GATK-SV workflows to CWL:\n1. Use: sv-agent convert -o output_dir\n2. Specific modules: sv-agent convert -m Module00a\n3. Specific files: sv-agent convert path/to/Workflow.wdl -o output_dir",
    },
];

const DEFAULT_REPLY: &str = "I can help with GATK-SV pipeline questions. Try asking about:\n- Specific modules (Module00a-06)\n- SV callers (Manta, MELT, etc.)\n- Coverage requirements\n- Workflow conversion to CWL\n- Pipeline execution steps";

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedProvider;

impl RuleBasedProvider {
    pub fn reply_for(&self, text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        RULES
            .iter()
            .find(|rule| {
                rule.groups
                    .iter()
                    .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
            })
            .map(|rule| rule.reply)
            .unwrap_or(DEFAULT_REPLY)
    }
}

impl LlmProvider for RuleBasedProvider {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String, ProviderError> {
        // The domain preamble names every keyword, so match the question alone.
        Ok(self.reply_for(user_question_segment(prompt)).to_string())
    }
}
