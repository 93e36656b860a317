//! Conversation sessions and the message-handling pipeline
//!
//! The [`AssistPipeline`] is the single entry point: raw message in,
//! [`TurnResponse`](sales_assist_core::TurnResponse) out. Sessions are
//! held in memory by the [`SessionManager`] and evicted by a periodic
//! sweep task.

pub mod context;
pub mod pipeline;
pub mod responder;
pub mod submission;

pub use context::{ConversationContext, Session, SessionManager};
pub use pipeline::{AssistPipeline, CaseEvaluation};
pub use responder::IntentResponder;
pub use submission::CaseSubmitter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Submission error: {0}")]
    Submission(String),
}
