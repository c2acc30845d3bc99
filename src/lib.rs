//! crit - an AI code review agent.
//!
//! # Overview
//!
//! crit sends a review prompt to Gemini and lets the model call three local
//! tools: one reads the working-tree diff, one drafts a commit message from
//! it, and one saves the finished review as markdown. Model output streams
//! to the console, and an ordered list of models is tried until one
//! completes.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod output;
pub mod report;
pub mod tools;

// Re-export commonly used types
pub use commit::{CommitMessageResult, CommitStyle, CommitType, FileClassification};
pub use config::Settings;
pub use error::{AgentError, ConfigError, GitError, ModelError, ReportError, ToolError};
pub use git::{DiffSummary, FileDiff};
pub use output::{MemorySink, OutputSink, StdoutSink};
pub use report::MarkdownWriteResult;
pub use tools::{Tool, ToolRegistry};
