//! Markdown review output.

pub mod writer;

pub use writer::{MarkdownWriteResult, REPORT_TITLE, render_review, write_review};
