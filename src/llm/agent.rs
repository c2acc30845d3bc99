//! Multi-step tool-calling session against one model.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::output::OutputSink;
use crate::tools::ToolRegistry;

use super::gemini::{
    Content, FunctionCall, FunctionResponse, GeminiClient, GenerateContentRequest, Part,
};
use super::router::ModelRunner;

/// Model responses allowed per session.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Prompt sent when the user gives none.
pub const DEFAULT_PROMPT: &str = "Review the code changes in the current directory, generate a commit message, and save the review to a markdown file called 'code-review-report.md'";

pub const SYSTEM_PROMPT: &str = r#"You are an expert code reviewer with years of experience in software engineering, clean code practices, and collaborative development. Your role is to provide **clear, constructive, and actionable feedback** on code changes. You value clarity, correctness, maintainability, and alignment with team or industry best practices.

## Your Personality & Review Approach:
- Professional, respectful, and collaborative.
- Empathetic to the author's intent and level of experience.
- Prioritizes teaching moments when appropriate.

## Review Focus Areas:
1. **Correctness** - Ensure the code does what it's intended to do. Watch for bugs, logic errors, edge cases, and regressions.
2. **Clarity** - Is the code easy to read, understand, and reason about? Could it benefit from clearer naming, structure, or comments?
3. **Maintainability** - Will this be easy to extend or debug later? Watch for over-complexity, code duplication, or tight coupling.
4. **Consistency** - Ensure adherence to existing conventions, patterns, and formatting in the codebase.
5. **Performance** - Identify unnecessary inefficiencies or performance bottlenecks.
6. **Security** - Watch for vulnerabilities, injection risks, or unsafe operations, especially around input/output, authentication, or external APIs.
7. **Testing** - Confirm that the code has sufficient test coverage and that tests are meaningful and reliable.
8. **Scalability & Robustness** - Consider how the code behaves under stress or scale, including error handling and edge conditions.

## How to Respond:
- Use clear language and avoid jargon unless necessary.
- When identifying an issue, explain **why** it matters and **suggest an improvement**.
- Use bullet points or code blocks when useful.
- Avoid nitpicks unless they impact readability or violate conventions. If making a nit-level suggestion, mark it clearly (e.g. "Nit: ...").
- When something is done well, acknowledge it.

## Tone & Style:
- Be calm, concise, and supportive.
- Use phrases like:
  - "Consider refactoring this to improve clarity."
  - "Would it make sense to extract this logic into a helper function?"
  - "Is there a reason we avoided using X here?"
  - "Nice use of Y pattern here, it makes the logic very clear."

You are reviewing with the intent to **help the author succeed**, **improve the quality of the codebase**, and **maintain team velocity**. Your feedback should make both the code and the coder better.

## Available Tools:
You have access to the following tools to enhance your code review process:

1. **getFileChangesInDirectoryTool**: Analyzes git changes in a directory to understand what files have been modified, added, or deleted.

2. **generateCommitMessageTool**: Generates appropriate commit messages based on the changes made. Supports three styles:
   - **conventional**: Follows conventional commit format (feat:, fix:, refactor:, etc.)
   - **simple**: Basic summary of changes made
   - **detailed**: Comprehensive message with file counts and statistics

3. **writeReviewToMarkdownTool**: Writes your code review findings to a markdown file with optional metadata including timestamps and file information.

## Workflow Recommendations:
- Use getFileChangesInDirectoryTool to understand the scope of changes
- Perform your code review analysis
- Optionally use generateCommitMessageTool to suggest appropriate commit messages
- Use writeReviewToMarkdownTool to save your review to a file for documentation or sharing

When using these tools, be specific about the directory path and provide clear, actionable feedback that the development team can easily follow."#;

/// What happened during one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Streamed model responses.
    pub steps: usize,
    /// Tool names in call order.
    pub tool_calls: Vec<String>,
    /// True when the session stopped at the step ceiling.
    pub hit_step_limit: bool,
}

/// Run `prompt` against `model`, executing tool calls until the model
/// answers without one or `max_steps` responses have been streamed.
///
/// Text parts are written to `sink` as they arrive. Tool calls of the final
/// step still execute before the session ends.
pub async fn run_session(
    client: &GeminiClient,
    model: &str,
    tools: &ToolRegistry,
    prompt: &str,
    max_steps: usize,
    sink: &mut dyn OutputSink,
) -> Result<SessionSummary, ModelError> {
    let max_steps = max_steps.max(1);
    let specs = tools.specs();
    let mut contents = vec![Content::user_text(prompt)];
    let mut summary = SessionSummary::default();

    for step in 1..=max_steps {
        debug!("Step {step}/{max_steps} on {model}");
        let request = GenerateContentRequest::new(SYSTEM_PROMPT, contents.clone(), specs.clone());
        let mut stream = client.stream_generate(model, &request).await?;

        let mut parts: Vec<Part> = Vec::new();
        let mut calls: Vec<FunctionCall> = Vec::new();

        while let Some(event) = stream.next_event().await {
            for part in event?.parts() {
                if let Some(text) = &part.text
                    && !part.is_thought()
                    && !text.is_empty()
                {
                    sink.write_chunk(text).map_err(ModelError::Output)?;
                }
                if let Some(call) = &part.function_call {
                    calls.push(call.clone());
                }
                parts.push(part.clone());
            }
        }
        summary.steps = step;

        if !parts.is_empty() {
            contents.push(Content::model(parts));
        }
        if calls.is_empty() {
            return Ok(summary);
        }

        let mut responses = Vec::with_capacity(calls.len());
        for call in calls {
            responses.push(execute_call(tools, call).await?);
        }
        summary
            .tool_calls
            .extend(responses.iter().map(|r| r.name.clone()));
        contents.push(Content::function_responses(responses));
    }

    warn!("Session on {model} stopped after {max_steps} steps");
    summary.hit_step_limit = true;
    Ok(summary)
}

async fn execute_call(
    tools: &ToolRegistry,
    call: FunctionCall,
) -> Result<FunctionResponse, ModelError> {
    if tools.get(&call.name).is_none() {
        return Err(ModelError::UnknownTool(call.name));
    }

    let input = if call.args.is_null() {
        json!({})
    } else {
        call.args
    };
    info!("Model called {}", call.name);

    let output = tools
        .invoke(&call.name, input)
        .await
        .map_err(|source| ModelError::Tool {
            tool: call.name.clone(),
            source,
        })?;

    Ok(FunctionResponse {
        name: call.name,
        response: into_response(output),
    })
}

/// Function responses must be JSON objects.
fn into_response(output: Value) -> Value {
    match output {
        Value::Object(_) => output,
        other => json!({ "result": other }),
    }
}

/// Runs the review agent on Gemini.
pub struct GeminiRunner {
    client: GeminiClient,
    tools: ToolRegistry,
    prompt: String,
    max_steps: usize,
}

impl GeminiRunner {
    pub fn new(client: GeminiClient, tools: ToolRegistry, prompt: &str, max_steps: usize) -> Self {
        Self {
            client,
            tools,
            prompt: prompt.to_string(),
            max_steps,
        }
    }
}

#[async_trait]
impl ModelRunner for GeminiRunner {
    async fn run(&self, model: &str, sink: &mut dyn OutputSink) -> Result<(), ModelError> {
        let summary = run_session(
            &self.client,
            model,
            &self.tools,
            &self.prompt,
            self.max_steps,
            sink,
        )
        .await?;
        debug!(
            "Session on {model} finished in {} step(s), tools: {:?}",
            summary.steps, summary.tool_calls
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_wraps_non_objects() {
        assert_eq!(into_response(json!({"a": 1})), json!({"a": 1}));
        assert_eq!(
            into_response(json!([{"path": "a.rs"}])),
            json!({"result": [{"path": "a.rs"}]})
        );
        assert_eq!(into_response(json!("ok")), json!({"result": "ok"}));
    }

    #[test]
    fn test_system_prompt_lists_every_tool() {
        for name in ToolRegistry::with_defaults().names() {
            assert!(SYSTEM_PROMPT.contains(name), "{name}");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_fatal() {
        let call = FunctionCall {
            name: "deleteEverything".to_string(),
            args: Value::Null,
        };
        let err = execute_call(&ToolRegistry::with_defaults(), call)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownTool(ref name) if name == "deleteEverything"));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_tool_failure_is_fatal() {
        let call = FunctionCall {
            name: "writeReviewToMarkdownTool".to_string(),
            args: json!({"reviewContent": "x", "outputPath": ""}),
        };
        let err = execute_call(&ToolRegistry::with_defaults(), call)
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
