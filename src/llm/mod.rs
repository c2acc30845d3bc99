//! Gemini client, agent session and model fallback.

pub mod agent;
pub mod gemini;
pub mod retry;
pub mod router;
pub mod sse;

pub use agent::{
    DEFAULT_MAX_STEPS, DEFAULT_PROMPT, GeminiRunner, SYSTEM_PROMPT, SessionSummary, run_session,
};
pub use gemini::{GeminiClient, GenerateContentRequest, GenerateContentResponse, model_path};
pub use retry::{RetryPolicy, RetrySchedule, is_overloaded};
pub use router::{FallbackOrchestrator, ModelRunner, RunOutcome, Strategy, orchestrator_for};
