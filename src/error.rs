//! Error types for crit modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at '{path}': {source}")]
    OpenRepository {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to resolve HEAD: {0}")]
    HeadUnresolved(#[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to render diff for '{path}': {source}")]
    PatchFailed {
        path: String,
        #[source]
        source: git2::Error,
    },
}

/// Errors from writing the markdown review.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write review to '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while executing a local tool on behalf of the model.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Invalid input for {tool}: {reason}")]
    InvalidInput { tool: String, reason: String },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to serialize tool output: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Errors from a single model attempt.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Request to Gemini failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini stream failed: {0}")]
    Stream(String),

    #[error("Gemini returned an unparseable event: {0}")]
    InvalidEvent(String),

    #[error("Model requested unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Tool {tool} failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Failed to write model output: {0}")]
    Output(#[source] std::io::Error),
}

impl ModelError {
    /// HTTP status attached to the failure, if the provider sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ModelError::Api { status, .. } => Some(*status),
            ModelError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether retrying or switching models cannot help.
    ///
    /// Tool failures come from local input, git or the filesystem, and
    /// output failures from the console itself.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ModelError::Tool { .. } | ModelError::Output(_))
    }
}

/// Errors from the fallback orchestrator.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("No models configured")]
    NoModels,

    #[error("All {models} models failed after {attempts} attempt(s). Last error: {last_error}")]
    AllModelsFailed {
        models: usize,
        attempts: u32,
        #[source]
        last_error: ModelError,
    },

    #[error("Model {model} hit an unrecoverable error: {source}")]
    Fatal {
        model: String,
        #[source]
        source: ModelError,
    },
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Gemini API key not found. Set GOOGLE_GENERATIVE_AI_API_KEY in the environment or a .env file"
    )]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_exposes_status() {
        let err = ModelError::Api {
            status: 503,
            message: "The model is overloaded.".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_tool_failure_is_fatal() {
        let err = ModelError::Tool {
            tool: "writeReviewToMarkdownTool".to_string(),
            source: ToolError::InvalidInput {
                tool: "writeReviewToMarkdownTool".to_string(),
                reason: "outputPath must not be empty".to_string(),
            },
        };
        assert!(err.is_fatal());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_all_models_failed_message_includes_last_error() {
        let err = AgentError::AllModelsFailed {
            models: 3,
            attempts: 3,
            last_error: ModelError::Stream("connection reset".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("All 3 models failed"));
        assert!(msg.contains("connection reset"));
    }
}
