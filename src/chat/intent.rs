#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    General,
    Explain,
    Convert,
    Analyze,
    Run,
    Recommend,
    Troubleshoot,
    Help,
    Status,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Explain => "explain",
            Self::Convert => "convert",
            Self::Analyze => "analyze",
            Self::Run => "run",
            Self::Recommend => "recommend",
            Self::Troubleshoot => "troubleshoot",
            Self::Help => "help",
            Self::Status => "status",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const QUESTION_STEMS: &[&str] = &[
    "what is",
    "what are",
    "how do",
    "why",
    "when",
    "who",
    "define",
    "explain what",
];

const KEYWORD_RULES: &[(&[&str], Intent)] = &[
    (&["explain module", "describe module"], Intent::Explain),
    (&["convert", "transform"], Intent::Convert),
    (&["analyze", "analysis"], Intent::Analyze),
    (&["run", "execute"], Intent::Run),
    (&["recommend", "best practice", "should i"], Intent::Recommend),
    (
        &["error", "failed", "problem", "troubleshoot"],
        Intent::Troubleshoot,
    ),
    (&["help", "what can you"], Intent::Help),
    (&["status", "progress"], Intent::Status),
];

pub fn classify_intent(text: &str) -> Intent {
    let lowered = text.trim().to_lowercase();
    if QUESTION_STEMS.iter().any(|stem| lowered.starts_with(stem)) {
        return Intent::General;
    }
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::General)
}

const CLOUD_PHRASES: &[&str] = &["seven bridges", "platform", "cloud", "cavatica"];
const CLOUD_ABBREVIATIONS: &[&str] = &["sb", "sbg", "cgc"];
const EXECUTION_VERBS: &[&str] = &["run", "execute", "process"];

pub(crate) fn words(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

pub fn is_cloud_execution_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    let names_platform = CLOUD_PHRASES.iter().any(|phrase| lowered.contains(phrase))
        || words(&lowered).any(|word| CLOUD_ABBREVIATIONS.contains(&word));
    names_platform && EXECUTION_VERBS.iter().any(|verb| lowered.contains(verb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_only_match_whole_words() {
        assert!(is_cloud_execution_request("run it on sb please"));
        assert!(is_cloud_execution_request("Execute Module00a on CGC"));
        assert!(!is_cloud_execution_request("run the absorb step"));
    }

    #[test]
    fn status_is_checked_after_help() {
        assert_eq!(classify_intent("show progress"), Intent::Status);
        assert_eq!(classify_intent("help with status"), Intent::Help);
    }
}
