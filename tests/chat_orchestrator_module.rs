use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;
use sv_agent::chat::{run_chat_session, ChatOrchestrator, PlanField, API_TOKEN_TIP};
use sv_agent::knowledge::KnowledgeBase;
use sv_agent::provider::{GenerateOptions, LlmProvider, ProviderError, RuleBasedProvider};
use sv_agent::shared::Logger;

/// Returns a fixed result and records every prompt it receives.
struct ScriptedProvider {
    outcome: Result<String, (u16, String)>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String, ProviderError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err((401, message)) => Err(ProviderError::Unauthorized {
                provider: "scripted".to_string(),
                message: message.clone(),
            }),
            Err((status, message)) => Err(ProviderError::Status {
                provider: "scripted".to_string(),
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

fn orchestrator_with(
    outcome: Result<String, (u16, String)>,
) -> (ChatOrchestrator, Rc<RefCell<Vec<String>>>) {
    let prompts = Rc::new(RefCell::new(Vec::new()));
    let provider = ScriptedProvider {
        outcome,
        prompts: Rc::clone(&prompts),
    };
    let orchestrator = ChatOrchestrator::new(
        Arc::new(KnowledgeBase::gatk_sv()),
        Box::new(provider),
        Logger::disabled(),
    );
    (orchestrator, prompts)
}

#[test]
fn coverage_question_is_answered_by_rule_provider() {
    let mut orchestrator = ChatOrchestrator::new(
        Arc::new(KnowledgeBase::gatk_sv()),
        Box::new(RuleBasedProvider),
        Logger::disabled(),
    );
    let reply = orchestrator.respond("What coverage do I need for SV detection?");
    assert!(reply.contains("30x") || reply.contains("coverage"));
    assert_eq!(orchestrator.memory().len(), 1);
}

#[test]
fn auth_failures_fall_back_to_knowledge_with_token_tip() {
    let (mut orchestrator, prompts) =
        orchestrator_with(Err((401, "Invalid username or password".to_string())));
    let reply = orchestrator.respond("deletion");
    assert!(reply.contains("Here's what I found about 'deletion'"));
    assert!(reply.ends_with(API_TOKEN_TIP));
    assert!(reply.contains("API token"));
    assert_eq!(prompts.borrow().len(), 1);
    assert!(orchestrator.memory().is_empty());
}

#[test]
fn other_generation_failures_report_the_error() {
    let (mut orchestrator, _) = orchestrator_with(Err((500, "overloaded".to_string())));
    let reply = orchestrator.respond("deletions in cancer genomes");
    assert!(reply.starts_with("**Error: Cannot generate response**"));
    assert!(reply.contains("overloaded"));
    assert!(orchestrator.memory().is_empty());
}

#[test]
fn general_prompts_carry_history_and_knowledge() {
    let (mut orchestrator, prompts) = orchestrator_with(Ok("noted".to_string()));
    orchestrator.respond("help");
    orchestrator.respond("tell me about Module00a");
    let prompts = prompts.borrow();
    let prompt = prompts.last().expect("prompt sent");
    assert!(prompt.contains("User: help"));
    assert!(prompt.contains("User Question: tell me about Module00a"));
    assert_eq!(orchestrator.memory().len(), 2);
}

#[test]
fn dialog_consumes_answers_before_intent_routing() {
    let (mut orchestrator, prompts) = orchestrator_with(Ok("llm".to_string()));
    let first = orchestrator.respond("Run QC on Seven Bridges with sample1.bam");
    assert!(first.contains("Seven Bridges Execution Setup"));
    assert_eq!(orchestrator.dialog().awaiting_field(), Some(PlanField::Project));

    let second = orchestrator.respond("alice/sv-study");
    assert!(second.starts_with("**Step 2**"));
    let plan = orchestrator.respond("small");
    assert!(plan.starts_with("**Seven Bridges Execution Plan**"));
    assert!(!orchestrator.dialog().is_active());
    assert!(prompts.borrow().is_empty());
    assert_eq!(orchestrator.memory().len(), 3);

    let status = orchestrator.respond("show status");
    assert!(status.contains("Module00a"));
}

#[test]
fn reset_returns_to_idle_and_routes_next_message() {
    let (mut orchestrator, prompts) = orchestrator_with(Ok("llm says hi".to_string()));
    orchestrator.respond("Please process this on the cloud");
    assert!(orchestrator.dialog().is_active());
    orchestrator.reset();
    assert!(!orchestrator.dialog().is_active());
    assert_eq!(orchestrator.dialog().awaiting_field(), None);
    assert!(orchestrator.memory().is_empty());

    let reply = orchestrator.respond("1");
    assert_eq!(reply, "llm says hi");
    assert_eq!(prompts.borrow().len(), 1);
}

#[test]
fn chat_session_counts_exchanges_and_handles_commands() {
    let (mut orchestrator, _) = orchestrator_with(Ok("answer".to_string()));
    let mut input = Cursor::new("hello\n\n/reset\nhello again\n/exit\nignored\n");
    let mut output = Vec::new();
    let summary = run_chat_session(&mut orchestrator, &mut input, &mut output).expect("session");
    assert_eq!(summary, "chat ended\nexchanges=2");
    let transcript = String::from_utf8(output).expect("utf8");
    assert!(transcript.starts_with("sv-agent chat provider=scripted"));
    assert!(transcript.contains("assistant> conversation cleared"));
    assert_eq!(transcript.matches("assistant> answer").count(), 2);
    assert_eq!(orchestrator.memory().len(), 1);
}
