//! Text replacement tool. Also creates new files when `old_str` is empty.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use steward_core::error::ToolError;
use steward_core::tool::Tool;
use tracing::debug;

use crate::parse_input;

pub struct EditFileTool;

#[derive(Deserialize)]
struct EditFileInput {
    #[serde(default)]
    path: String,
    #[serde(default)]
    old_str: String,
    #[serde(default)]
    new_str: String,
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Make edits to a text file. Replaces all occurrences of 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be different from each other. If the file specified with path doesn't exist, it will be created when 'old_str' is empty."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file"
                },
                "old_str": {
                    "type": "string",
                    "description": "Text to search for - must match exactly"
                },
                "new_str": {
                    "type": "string",
                    "description": "Text to replace old_str with"
                }
            },
            "required": ["path", "old_str", "new_str"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let input: EditFileInput = parse_input(self.name(), arguments)?;
        if input.path.is_empty() {
            return Err(ToolError::InvalidInput(
                "path cannot be empty for edit_file".into(),
            ));
        }
        if !input.old_str.is_empty() && input.old_str == input.new_str {
            return Err(ToolError::InvalidInput(
                "old_str and new_str must be different".into(),
            ));
        }

        let path = Path::new(&input.path);
        let existing = match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ToolError::io(
                    format!("failed to read file '{}'", input.path),
                    e,
                ));
            }
        };

        match existing {
            None if input.old_str.is_empty() => {
                create_file(path, &input.new_str).await?;
                debug!(path = %input.path, "Created file");
                Ok(format!("Successfully created file {}", input.path))
            }
            None => Err(ToolError::InvalidInput(format!(
                "file '{}' does not exist",
                input.path
            ))),
            Some(content) => {
                let edited = if input.old_str.is_empty() {
                    if !content.is_empty() {
                        return Err(ToolError::InvalidInput(format!(
                            "old_str cannot be empty when '{}' already has content",
                            input.path
                        )));
                    }
                    input.new_str.clone()
                } else {
                    if !content.contains(&input.old_str) {
                        return Err(ToolError::InvalidInput(format!(
                            "old_str not found in file '{}'",
                            input.path
                        )));
                    }
                    content.replace(&input.old_str, &input.new_str)
                };

                tokio::fs::write(path, edited).await.map_err(|e| {
                    ToolError::io(format!("failed to write file '{}'", input.path), e)
                })?;
                debug!(path = %input.path, "Edited file");
                Ok(format!("Successfully edited file {}", input.path))
            }
        }
    }
}

async fn create_file(path: &Path, content: &str) -> Result<(), ToolError> {
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
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::io(format!("failed to create file '{}'", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn edit(path: &Path, old: &str, new: &str) -> Result<String, ToolError> {
        EditFileTool
            .execute(serde_json::json!({
                "path": path.to_str().unwrap(),
                "old_str": old,
                "new_str": new,
            }))
            .await
    }

    #[tokio::test]
    async fn replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "foo bar foo").unwrap();

        let out = edit(&file, "foo", "baz").await.unwrap();
        assert!(out.starts_with("Successfully edited file"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "baz bar baz");
    }

    #[tokio::test]
    async fn creates_missing_file_with_empty_old_str() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("new.txt");

        let out = edit(&file, "", "fresh").await.unwrap();
        assert!(out.starts_with("Successfully created file"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "fresh");
    }

    #[tokio::test]
    async fn creates_empty_file_when_both_strings_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.txt");

        let out = edit(&file, "", "").await.unwrap();
        assert!(out.starts_with("Successfully created file"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "");
    }

    #[tokio::test]
    async fn empty_old_str_refused_on_non_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("keep.txt");
        std::fs::write(&file, "important").unwrap();

        let err = edit(&file, "", "clobber").await.unwrap_err();
        assert!(err.to_string().contains("already has content"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "important");
    }

    #[tokio::test]
    async fn identical_strings_refused() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("same.txt");
        std::fs::write(&file, "abc").unwrap();

        let err = edit(&file, "abc", "abc").await.unwrap_err();
        assert_eq!(err.to_string(), "old_str and new_str must be different");
    }

    #[tokio::test]
    async fn no_match_refused() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("text.txt");
        std::fs::write(&file, "hello").unwrap();

        let err = edit(&file, "absent", "x").await.unwrap_err();
        assert!(err.to_string().starts_with("old_str not found"));
    }

    #[tokio::test]
    async fn missing_file_with_old_str_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = edit(&dir.path().join("ghost.txt"), "a", "b")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
