pub const SV_SYSTEM_PREAMBLE: &str = "You are an expert in structural variant (SV) analysis and the GATK-SV pipeline.
You have deep knowledge of:
- WDL and CWL workflow languages
- SV calling algorithms (Manta, MELT, Wham, etc.)
- Genomic data formats (VCF, BAM, CRAM)
- Best practices for SV discovery and genotyping
- GATK-SV module architecture and dependencies";

const QUESTION_MARKER: &str = "User Question:";

pub fn format_prompt_for_sv_domain(question: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "{SV_SYSTEM_PREAMBLE}\n\nAdditional Context:\n{context}\n\n{QUESTION_MARKER} {question}"
        ),
        None => format!("{SV_SYSTEM_PREAMBLE}\n\n{QUESTION_MARKER} {question}"),
    }
}

// The preamble names every rule keyword, so rule matching reads only the question.
pub fn user_question_segment(prompt: &str) -> &str {
    match prompt.rfind(QUESTION_MARKER) {
        Some(idx) => prompt[idx + QUESTION_MARKER.len()..].trim(),
        None => prompt,
    }
}

pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_places_context_before_question() {
        let prompt = format_prompt_for_sv_domain("What is DEL?", Some("User: hi\nAssistant: hello"));
        let context_at = prompt.find("Additional Context:").expect("context");
        let question_at = prompt.find("User Question: What is DEL?").expect("question");
        assert!(prompt.starts_with(SV_SYSTEM_PREAMBLE));
        assert!(context_at < question_at);
        assert_eq!(user_question_segment(&prompt), "What is DEL?");
    }

    #[test]
    fn blank_context_is_omitted() {
        let prompt = format_prompt_for_sv_domain("q", Some("  \n"));
        assert!(!prompt.contains("Additional Context"));
        assert_eq!(estimate_token_count("abcdefgh"), 2);
    }
}
