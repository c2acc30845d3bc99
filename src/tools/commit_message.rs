//! Tool: commit message suggestion for a working directory.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::commit::{CommitStyle, generate_commit_message};
use crate::error::ToolError;

use super::{Tool, parse_input, require_non_empty, to_output};

const NAME: &str = "generateCommitMessageTool";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitMessageInput {
    root_dir: String,
    #[serde(default)]
    style: Option<CommitStyle>,
}

pub struct GenerateCommitMessageTool;

#[async_trait]
impl Tool for GenerateCommitMessageTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Generates an appropriate commit message based on the changes in the given directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "rootDir": {
                    "type": "string",
                    "description": "The root directory to analyze for commit message"
                },
                "style": {
                    "type": "string",
                    "enum": ["conventional", "simple", "detailed"],
                    "description": "The style of commit message to generate (default: conventional)"
                }
            },
            "required": ["rootDir"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let input: CommitMessageInput = parse_input(NAME, input)?;
        require_non_empty(NAME, "rootDir", &input.root_dir)?;

        let result =
            generate_commit_message(Path::new(&input.root_dir), input.style.unwrap_or_default())?;
        to_output(&result)
    }
}
