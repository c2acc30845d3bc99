//! Heuristic commit message generation from working-tree changes.

pub mod classify;
pub mod message;

pub use classify::{CommitType, FileClassification, classify, determine_commit_type};
pub use message::{
    CommitMessageResult, CommitStyle, compose_commit_message, generate_commit_message,
};
