pub mod dialog;
pub mod handlers;
pub mod intent;
pub mod local_run;
pub mod memory;
pub mod orchestrator;
pub mod plan;
pub mod session;

pub use dialog::{DialogReply, DialogState, ExecutionDialog};
pub use intent::{classify_intent, is_cloud_execution_request, Intent};
pub use local_run::{LocalRunPlan, RunOperation};
pub use memory::{ConversationMemory, ConversationTurn};
pub use orchestrator::{ChatOrchestrator, API_TOKEN_TIP};
pub use plan::{
    AnswerOutcome, CostEstimate, ExecutionPlan, InstanceSize, PlanField, Platform, Question,
    ReadyPlan,
};
pub use session::{run_chat_session, run_chat_session_stdio};
