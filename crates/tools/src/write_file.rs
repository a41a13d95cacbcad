//! File write tool. Overwrites, creating parent directories as needed.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use steward_core::error::ToolError;
use steward_core::tool::Tool;
use tracing::debug;

use crate::parse_input;

pub struct WriteFileTool;

#[derive(Deserialize)]
struct WriteFileInput {
    #[serde(default)]
    path: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file at the given relative path, replacing anything already there. Parent directories are created if needed."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The relative path of the file to write."
                },
                "content": {
                    "type": "string",
                    "description": "The full content to write to the file."
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let input: WriteFileInput = parse_input(self.name(), arguments)?;
        if input.path.is_empty() {
            return Err(ToolError::InvalidInput(
                "path cannot be empty for write_file".into(),
            ));
        }

        let path = Path::new(&input.path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ToolError::io(
                    format!("failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        tokio::fs::write(path, input.content.as_bytes())
            .await
            .map_err(|e| ToolError::io(format!("failed to write file '{}'", input.path), e))?;

        debug!(path = %input.path, bytes = input.content.len(), "Wrote file");
        Ok(format!(
            "Successfully wrote {} bytes to {}",
            input.content.len(),
            input.path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a").join("b").join("out.txt");

        let out = WriteFileTool
            .execute(serde_json::json!({
                "path": file.to_str().unwrap(),
                "content": "hello",
            }))
            .await
            .unwrap();
        assert_eq!(
            out,
            format!("Successfully wrote 5 bytes to {}", file.to_str().unwrap())
        );
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.txt");
        std::fs::write(&file, "old content that is longer").unwrap();

        WriteFileTool
            .execute(serde_json::json!({
                "path": file.to_str().unwrap(),
                "content": "new",
            }))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }

    #[tokio::test]
    async fn empty_path_rejected() {
        let err = WriteFileTool
            .execute(serde_json::json!({ "content": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "path cannot be empty for write_file");
    }
}
