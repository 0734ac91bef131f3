#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Convert,
    Analyze,
    Chat,
    Ask,
    List,
    Run,
    Batch,
    Providers,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "convert" => CliVerb::Convert,
        "analyze" => CliVerb::Analyze,
        "chat" => CliVerb::Chat,
        "ask" => CliVerb::Ask,
        "list" => CliVerb::List,
        "run" => CliVerb::Run,
        "batch" => CliVerb::Batch,
        "providers" => CliVerb::Providers,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  convert [files...] [-o DIR] [-m MODULES]   Convert GATK-SV WDL workflows to CWL"
            .to_string(),
        "  analyze <workflow.wdl>                     Show workflow structure and statistics"
            .to_string(),
        "  chat [--provider NAME]                     Interactive SV analysis assistant"
            .to_string(),
        "  ask [--provider NAME] <question>           Ask the assistant a single question"
            .to_string(),
        "  list [modules|sv-types]                    List pipeline modules or SV types"
            .to_string(),
        "  run <workflow.cwl> <inputs> [-o DIR]       Execute a CWL workflow with cwltool"
            .to_string(),
        "  batch <batch.json> [-o DIR]                Run a sample batch through GATK-SV"
            .to_string(),
        "  providers [--task TEXT]                   Show detected LLM providers and model picks".to_string(),
        "  help                                       Show this help".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    let mut lines = vec![
        "sv-agent: GATK-SV structural variant assistant and workflow wrapper".to_string(),
        String::new(),
    ];
    lines.extend(cli_help_lines());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_map_to_commands() {
        assert_eq!(parse_cli_verb("ask"), CliVerb::Ask);
        assert_eq!(parse_cli_verb("--help"), CliVerb::Help);
        assert_eq!(parse_cli_verb("setup"), CliVerb::Unknown);
    }

    #[test]
    fn help_lists_every_verb() {
        let help = help_text();
        for verb in ["convert", "analyze", "chat", "ask", "list", "run", "batch", "providers"] {
            assert!(help.contains(&format!("  {verb}")), "missing {verb}");
        }
    }
}
