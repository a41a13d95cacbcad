//! File read tool: return the contents of a file.

use async_trait::async_trait;
use serde::Deserialize;
use steward_core::error::ToolError;
use steward_core::tool::Tool;

use crate::parse_input;

pub struct ReadFileTool;

#[derive(Deserialize)]
struct ReadFileInput {
    #[serde(default)]
    path: String,
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see what's inside a file. Do not use this with directory names."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path of a file in the working directory."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let input: ReadFileInput = parse_input(self.name(), arguments)?;
        if input.path.is_empty() {
            return Err(ToolError::InvalidInput(
                "path cannot be empty for read_file".into(),
            ));
        }

        tokio::fs::read_to_string(&input.path)
            .await
            .map_err(|e| ToolError::io(format!("failed to read file '{}'", input.path), e))
    }
}
