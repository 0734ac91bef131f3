use super::orchestrator::ChatOrchestrator;
use std::io::{self, BufRead, Write};

const CHAT_EXIT_COMMANDS: &[&str] = &["/exit", "exit", "quit"];
const CHAT_RESET_COMMANDS: &[&str] = &["/reset", "/clear"];

pub fn run_chat_session_stdio(orchestrator: &mut ChatOrchestrator) -> Result<String, String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_chat_session(orchestrator, &mut input, &mut output)
}

pub fn run_chat_session<R: BufRead, W: Write>(
    orchestrator: &mut ChatOrchestrator,
    input: &mut R,
    output: &mut W,
) -> Result<String, String> {
    let mut exchanges = 0usize;
    writeln!(output, "sv-agent chat provider={}", orchestrator.provider_name())
        .map_err(|e| format!("failed to write chat output: {e}"))?;
    writeln!(output, "type `/exit` to quit, `/reset` to clear the conversation")
        .map_err(|e| format!("failed to write chat output: {e}"))?;

    loop {
        write!(output, "you> ").map_err(|e| format!("failed to write chat prompt: {e}"))?;
        output
            .flush()
            .map_err(|e| format!("failed to flush chat prompt: {e}"))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| format!("failed to read chat input: {e}"))?;
        if read == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if is_command(CHAT_EXIT_COMMANDS, message) {
            break;
        }
        if is_command(CHAT_RESET_COMMANDS, message) {
            orchestrator.reset();
            writeln!(output, "assistant> conversation cleared")
                .map_err(|e| format!("failed to write chat output: {e}"))?;
            continue;
        }

        let reply = orchestrator.respond(message);
        exchanges += 1;
        writeln!(output, "assistant> {reply}")
            .map_err(|e| format!("failed to write chat output: {e}"))?;
        output
            .flush()
            .map_err(|e| format!("failed to flush chat output: {e}"))?;
    }

    Ok(format!("chat ended\nexchanges={exchanges}"))
}

fn is_command(commands: &[&str], message: &str) -> bool {
    commands
        .iter()
        .any(|command| message.eq_ignore_ascii_case(command))
}
