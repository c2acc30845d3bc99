//! Tool: save the review as a markdown file.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ToolError;
use crate::report::write_review;

use super::{Tool, parse_input, require_non_empty, to_output};

const NAME: &str = "writeReviewToMarkdownTool";

fn default_include_metadata() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteReviewInput {
    review_content: String,
    output_path: String,
    #[serde(default = "default_include_metadata")]
    include_metadata: bool,
}

pub struct WriteReviewTool;

#[async_trait]
impl Tool for WriteReviewTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Writes the code review content to a markdown file with optional metadata"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reviewContent": {
                    "type": "string",
                    "description": "The code review content to write to markdown"
                },
                "outputPath": {
                    "type": "string",
                    "description": "The path where the markdown file should be saved"
                },
                "includeMetadata": {
                    "type": "boolean",
                    "description": "Whether to include metadata like timestamp and file info (default: true)"
                }
            },
            "required": ["reviewContent", "outputPath"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let input: WriteReviewInput = parse_input(NAME, input)?;
        require_non_empty(NAME, "reviewContent", &input.review_content)?;
        require_non_empty(NAME, "outputPath", &input.output_path)?;

        let result = write_review(
            &input.review_content,
            Path::new(&input.output_path),
            input.include_metadata,
        )?;
        to_output(&result)
    }
}
