use super::plan::{AnswerOutcome, ExecutionPlan, PlanField, Question, ReadyPlan};

const CANCEL_WORDS: &[&str] = &["cancel", "abort", "nevermind", "never mind"];

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogState {
    #[default]
    Idle,
    Awaiting {
        plan: ExecutionPlan,
        step: usize,
        field: PlanField,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogReply {
    Question {
        field: PlanField,
        step: usize,
        message: String,
    },
    Unrecognized {
        field: PlanField,
        message: String,
    },
    Ready {
        plan: ReadyPlan,
        message: String,
    },
    Cancelled {
        message: String,
    },
}

impl DialogReply {
    pub fn message(&self) -> &str {
        match self {
            Self::Question { message, .. }
            | Self::Unrecognized { message, .. }
            | Self::Ready { message, .. }
            | Self::Cancelled { message } => message,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Question { message, .. }
            | Self::Unrecognized { message, .. }
            | Self::Ready { message, .. }
            | Self::Cancelled { message } => message,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionDialog {
    state: DialogState,
}

impl ExecutionDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DialogState::Awaiting { .. })
    }

    pub fn awaiting_field(&self) -> Option<PlanField> {
        match &self.state {
            DialogState::Idle => None,
            DialogState::Awaiting { field, .. } => Some(*field),
        }
    }

    pub fn step(&self) -> usize {
        match &self.state {
            DialogState::Idle => 0,
            DialogState::Awaiting { step, .. } => *step,
        }
    }

    pub fn start(&mut self, request: &str) -> DialogReply {
        let plan = ExecutionPlan::from_request(request);
        if let Some(ready) = plan.ready() {
            self.state = DialogState::Idle;
            return ready_reply(ready);
        }

        let field = first_missing(&plan);
        let question = Question::for_field(field);
        let message = format!(
            "**Seven Bridges Execution Setup**\n\nI need some additional information to execute on Seven Bridges platform.\n\n**{}**\n\n{}",
            question.prompt,
            question.body()
        );
        self.state = DialogState::Awaiting {
            plan,
            step: 0,
            field,
        };
        DialogReply::Question {
            field,
            step: 0,
            message,
        }
    }

    // Unrecognized answers re-ask the same field; the step counter stays put.
    pub fn answer(&mut self, message: &str) -> Option<DialogReply> {
        let DialogState::Awaiting {
            mut plan,
            step,
            field,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        if is_cancel(message) {
            return Some(DialogReply::Cancelled {
                message: "Seven Bridges execution setup cancelled. Nothing was submitted."
                    .to_string(),
            });
        }

        if plan.apply_answer(field, message) == AnswerOutcome::Unrecognized {
            let question = Question::for_field(field);
            let reply = format!(
                "{}\n\n**Step {}**: {}\n\n{}",
                question.unrecognized_notice(message),
                step + 1,
                question.prompt,
                question.body()
            );
            self.state = DialogState::Awaiting { plan, step, field };
            return Some(DialogReply::Unrecognized {
                field,
                message: reply,
            });
        }

        let step = step + 1;
        if let Some(ready) = plan.ready() {
            return Some(ready_reply(ready));
        }

        let next = first_missing(&plan);
        let question = Question::for_field(next);
        let reply = format!(
            "**Step {}**: {}\n\n{}",
            step + 1,
            question.prompt,
            question.body()
        );
        self.state = DialogState::Awaiting {
            plan,
            step,
            field: next,
        };
        Some(DialogReply::Question {
            field: next,
            step,
            message: reply,
        })
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Idle;
    }
}

fn first_missing(plan: &ExecutionPlan) -> PlanField {
    plan.missing_fields()
        .first()
        .copied()
        .unwrap_or(PlanField::Platform)
}

fn ready_reply(plan: ReadyPlan) -> DialogReply {
    let message = plan.render();
    DialogReply::Ready { plan, message }
}

fn is_cancel(message: &str) -> bool {
    let lowered = message.trim().to_lowercase();
    CANCEL_WORDS.iter().any(|word| lowered == *word)
}
