//! Local tools the model can call during a review.

pub mod commit_message;
pub mod file_changes;
pub mod review_markdown;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ToolError;

pub use commit_message::GenerateCommitMessageTool;
pub use file_changes::FileChangesTool;
pub use review_markdown::WriteReviewTool;

/// A capability exposed to the model.
///
/// Implementations declare a JSON schema for their input and turn a JSON
/// value into a JSON result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema (OpenAPI subset) of the input object.
    fn input_schema(&self) -> Value;

    async fn execute(&self, input: Value) -> Result<Value, ToolError>;
}

/// Declaration of a tool as sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Ordered set of tools, looked up by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the three review tools.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FileChangesTool));
        registry.register(Box::new(GenerateCommitMessageTool));
        registry.register(Box::new(WriteReviewTool));
        registry
    }

    /// Add a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.input_schema(),
            })
            .collect()
    }

    /// Run the named tool with `input`.
    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        info!("Running tool {name}");
        debug!("Tool input: {input}");
        let output = tool.execute(input).await?;
        debug!("Tool {name} returned {} bytes", output.to_string().len());
        Ok(output)
    }
}

/// Deserialize tool input, reporting schema mismatches as `InvalidInput`.
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Reject empty or whitespace-only string fields.
pub(crate) fn require_non_empty(tool: &str, field: &str, value: &str) -> Result<(), ToolError> {
    if value.is_empty() {
        return Err(ToolError::InvalidInput {
            tool: tool.to_string(),
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

pub(crate) fn to_output<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(ToolError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_tool(name: &'static str) -> MockTool {
        let mut tool = MockTool::new();
        tool.expect_name().return_const(name);
        tool.expect_description().return_const("mock tool");
        tool.expect_input_schema()
            .returning(|| json!({"type": "object", "properties": {}}));
        tool
    }

    #[test]
    fn test_default_registry_has_three_tools_in_order() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "getFileChangesInDirectoryTool",
                "generateCommitMessageTool",
                "writeReviewToMarkdownTool",
            ]
        );
    }

    #[test]
    fn test_specs_carry_object_schemas() {
        let registry = ToolRegistry::with_defaults();
        for spec in registry.specs() {
            assert_eq!(spec.parameters["type"], "object", "{}", spec.name);
            assert!(spec.parameters["required"].is_array(), "{}", spec.name);
            assert!(!spec.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_invoke_dispatches_by_name() {
        let mut tool = mock_tool("echo");
        tool.expect_execute()
            .times(1)
            .returning(|input| Ok(json!({"echo": input})));

        let mut registry = ToolRegistry::new();
        registry.register(Box::new(tool));

        let output = registry.invoke("echo", json!({"a": 1})).await.unwrap();
        assert_eq!(output, json!({"echo": {"a": 1}}));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry.invoke("missing", json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "missing"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(mock_tool("dup")));
        registry.register(Box::new(mock_tool("dup")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("t", "rootDir", ".").is_ok());
        assert!(require_non_empty("t", "rootDir", "  ").is_ok());
        let err = require_non_empty("t", "rootDir", "").unwrap_err();
        assert!(err.to_string().contains("rootDir must not be empty"));
    }
}
