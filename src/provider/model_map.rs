#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedModel {
    pub name: &'static str,
    pub size: &'static str,
    pub description: &'static str,
    pub use_case: &'static str,
}

const RECOMMENDED: &[RecommendedModel] = &[
    RecommendedModel {
        name: "codellama:13b",
        size: "7.4GB",
        description: "Best for code generation and CWL writing",
        use_case: "workflow_conversion",
    },
    RecommendedModel {
        name: "mixtral:8x7b",
        size: "26GB",
        description: "Best overall performance for complex analysis",
        use_case: "comprehensive_analysis",
    },
    RecommendedModel {
        name: "llama2:13b",
        size: "7.4GB",
        description: "Good general purpose model",
        use_case: "general_qa",
    },
    RecommendedModel {
        name: "phi-2",
        size: "1.7GB",
        description: "Lightweight, fast responses",
        use_case: "quick_responses",
    },
    RecommendedModel {
        name: "biomistral",
        size: "4.1GB",
        description: "Fine-tuned for biomedical text",
        use_case: "biomedical_qa",
    },
];

pub fn recommended_local_models() -> &'static [RecommendedModel] {
    RECOMMENDED
}

pub fn suggest_model_for_task(task: &str) -> &'static str {
    let lowered = task.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

    if has_any(&["convert", "cwl", "wdl", "code"]) {
        "codellama:13b"
    } else if has_any(&["biomedical", "variant", "clinical"]) {
        "biomistral"
    } else if has_any(&["quick", "fast", "simple"]) {
        "phi-2"
    } else {
        "llama2:13b"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_keywords_pick_models() {
        assert_eq!(suggest_model_for_task("Convert WDL"), "codellama:13b");
        assert_eq!(suggest_model_for_task("clinical review"), "biomistral");
        assert_eq!(suggest_model_for_task("quick answers"), "phi-2");
        assert_eq!(suggest_model_for_task("chat"), "llama2:13b");
        assert!(recommended_local_models()
            .iter()
            .any(|model| model.name == "biomistral"));
    }
}
