//! Tool: per-file diffs for a working directory.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ToolError;
use crate::git::collect_file_changes;

use super::{Tool, parse_input, require_non_empty, to_output};

const NAME: &str = "getFileChangesInDirectoryTool";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileChangesInput {
    root_dir: String,
}

/// Returns `[{path, diffText}]` for every changed file.
pub struct FileChangesTool;

#[async_trait]
impl Tool for FileChangesTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Gets the code changes made in given directory"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "rootDir": {
                    "type": "string",
                    "description": "The root directory"
                }
            },
            "required": ["rootDir"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let input: FileChangesInput = parse_input(NAME, input)?;
        require_non_empty(NAME, "rootDir", &input.root_dir)?;

        let changes = collect_file_changes(Path::new(&input.root_dir))?;
        to_output(&changes)
    }
}
