use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod analyze;
pub mod batch;
pub mod chat;
pub mod convert;
pub mod list;
pub mod providers;
pub mod run;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Convert => convert::cmd_convert(&args[1..]),
        CliVerb::Analyze => analyze::cmd_analyze(&args[1..]),
        CliVerb::Chat => chat::cmd_chat(&args[1..]),
        CliVerb::Ask => chat::cmd_ask(&args[1..]),
        CliVerb::List => list::cmd_list(&args[1..]),
        CliVerb::Run => run::cmd_run(&args[1..]),
        CliVerb::Batch => batch::cmd_batch(&args[1..]),
        CliVerb::Providers => providers::cmd_providers(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
