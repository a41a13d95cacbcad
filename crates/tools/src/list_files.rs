//! Directory listing tool. Walks recursively and returns a JSON array.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use steward_core::error::ToolError;
use steward_core::tool::Tool;

pub struct ListFilesTool;

#[derive(Default, Deserialize)]
struct ListFilesInput {
    #[serde(default)]
    path: String,
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. If no path is provided, lists files in the current directory."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Optional relative path to list files from. Defaults to current directory if not provided."
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        // Every field is optional, so a malformed object just means "list cwd".
        let input: ListFilesInput = serde_json::from_value(arguments).unwrap_or_default();
        let root = if input.path.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&input.path)
        };

        let entries = walk(&root).await.map_err(|e| {
            ToolError::io(format!("failed to list files in '{}'", root.display()), e)
        })?;

        serde_json::to_string(&entries)
            .map_err(|e| ToolError::InvalidInput(format!("failed to encode file list: {e}")))
    }
}

/// Every path under `root`, relative to it, sorted. Directories end in `/`.
async fn walk(root: &Path) -> std::io::Result<Vec<String>> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut reader = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            let rel = path.strip_prefix(root).unwrap_or(&path);
            let rel = rel.to_string_lossy().replace('\\', "/");

            if entry.file_type().await?.is_dir() {
                out.push(format!("{rel}/"));
                pending.push(path);
            } else {
                out.push(rel);
            }
        }
    }

    out.sort();
    Ok(out)
}
