use super::dialog::{DialogReply, ExecutionDialog};
use super::handlers;
use super::intent::{classify_intent, is_cloud_execution_request, Intent};
use super::memory::ConversationMemory;
use crate::config::ChatSettings;
use crate::knowledge::KnowledgeBase;
use crate::provider::{
    estimate_token_count, format_prompt_for_sv_domain, GenerateOptions, LlmProvider, ProviderError,
};
use crate::shared::Logger;
use std::sync::Arc;

pub const API_TOKEN_TIP: &str = "**Tip:** For faster AI-powered responses, get a free API token:
1. Visit https://huggingface.co/settings/tokens
2. Create a token with 'read' permissions
3. Run: export HF_TOKEN='your_token_here'
4. Use: sv-agent ask --provider huggingface 'your question'";

pub struct ChatOrchestrator {
    knowledge: Arc<KnowledgeBase>,
    provider: Box<dyn LlmProvider>,
    memory: ConversationMemory,
    dialog: ExecutionDialog,
    context_turns: usize,
    options: GenerateOptions,
    logger: Logger,
    last_activity: Option<String>,
}

impl ChatOrchestrator {
    pub fn new(knowledge: Arc<KnowledgeBase>, provider: Box<dyn LlmProvider>, logger: Logger) -> Self {
        Self::with_settings(knowledge, provider, &ChatSettings::default(), logger)
    }

    pub fn with_settings(
        knowledge: Arc<KnowledgeBase>,
        provider: Box<dyn LlmProvider>,
        settings: &ChatSettings,
        logger: Logger,
    ) -> Self {
        Self {
            knowledge,
            provider,
            memory: ConversationMemory::new(settings.max_turns),
            dialog: ExecutionDialog::new(),
            context_turns: settings.context_turns,
            options: GenerateOptions::default(),
            logger,
            last_activity: None,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn dialog(&self) -> &ExecutionDialog {
        &self.dialog
    }

    pub fn reset(&mut self) {
        self.memory.clear();
        self.dialog.cancel();
        self.last_activity = None;
    }

    pub fn respond(&mut self, message: &str) -> String {
        if let Some(reply) = self.dialog.answer(message) {
            self.note_dialog(&reply);
            return self.record(message, reply.into_message());
        }

        if is_cloud_execution_request(message) {
            self.logger.info("dialog.started", message);
            let reply = self.dialog.start(message);
            self.note_dialog(&reply);
            return self.record(message, reply.into_message());
        }

        let intent = classify_intent(message);
        let reply = match intent {
            Intent::General => match self.generate(message) {
                Ok(text) => text,
                Err(reply) => return reply,
            },
            Intent::Explain => handlers::explain(&self.knowledge, message),
            Intent::Convert => handlers::convert(message),
            Intent::Analyze => handlers::analyze(message),
            Intent::Run => handlers::run(&self.knowledge, message),
            Intent::Recommend => handlers::recommend(&self.knowledge, message),
            Intent::Troubleshoot => handlers::troubleshoot(message),
            Intent::Help => handlers::help_text(),
            Intent::Status => handlers::status(self.last_activity.as_deref()),
        };
        self.record(message, reply)
    }

    fn record(&mut self, message: &str, reply: String) -> String {
        self.memory.add_turn(message, reply.clone());
        reply
    }

    fn note_dialog(&mut self, reply: &DialogReply) {
        match reply {
            DialogReply::Ready { plan, .. } => {
                let summary = format!(
                    "Seven Bridges execution plan for {} on {} (project {})",
                    plan.module(),
                    plan.platform().name(),
                    plan.project()
                );
                self.logger.info("dialog.completed", &summary);
                self.last_activity = Some(summary);
            }
            DialogReply::Cancelled { .. } => {
                self.logger.info("dialog.cancelled", "execution setup abandoned");
            }
            DialogReply::Unrecognized { field, .. } => {
                self.logger
                    .warn("dialog.unrecognized", &format!("no match for {}", field.as_str()));
            }
            DialogReply::Question { .. } => {}
        }
    }

    fn build_prompt(&self, message: &str) -> String {
        let history = self.memory.get_context(self.context_turns);
        let knowledge = handlers::knowledge_context(&self.knowledge, message);
        let context = match (history.is_empty(), knowledge.is_empty()) {
            (true, true) => String::new(),
            (true, false) => format!("Relevant Knowledge:\n{knowledge}"),
            (false, true) => history,
            (false, false) => format!("{history}\n\nRelevant Knowledge:\n{knowledge}"),
        };
        format_prompt_for_sv_domain(message, Some(&context))
    }

    fn generate(&self, message: &str) -> Result<String, String> {
        let prompt = self.build_prompt(message);
        self.logger.info(
            "provider.generate",
            &format!(
                "provider={} prompt_tokens={}",
                self.provider.name(),
                estimate_token_count(&prompt)
            ),
        );
        self.provider
            .generate(&prompt, &self.options)
            .map_err(|err| self.generation_failure(message, &err))
    }

    fn generation_failure(&self, message: &str, err: &ProviderError) -> String {
        self.logger.error("provider.generate_failed", &err.to_string());
        if err.is_auth_failure() {
            let answer = handlers::knowledge_search(&self.knowledge, message);
            return format!("{answer}\n\n{API_TOKEN_TIP}");
        }
        format!(
            "**Error: Cannot generate response**\n\nThe {} provider failed to generate a response.\n\nError: {err}\n\nPlease check that the provider is reachable and configured. You can:\n1. Start a local model server (for example `ollama serve`)\n2. Set an API key such as OPENAI_API_KEY, ANTHROPIC_API_KEY or HF_TOKEN\n3. Use the offline rule-based provider with --provider rules",
            self.provider.name()
        )
    }
}
