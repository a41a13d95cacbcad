//! Built-in tool implementations for Steward.
//!
//! Tools give the agent the ability to work with files relative to the
//! current working directory: read them, list them, edit them, and write
//! them. Each tool deserializes its own input and reports domain failures
//! as `ToolError`s, which the dispatcher turns into conversation text.

pub mod edit_file;
pub mod list_files;
pub mod read_file;
pub mod write_file;

use serde::de::DeserializeOwned;
use steward_core::error::ToolError;
use steward_core::tool::ToolRegistry;

/// Create the default tool registry with all built-in tools.
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    Ok(ToolRegistry::builder()
        .register(Box::new(read_file::ReadFileTool))?
        .register(Box::new(list_files::ListFilesTool))?
        .register(Box::new(edit_file::EditFileTool))?
        .register(Box::new(write_file::WriteFileTool))?
        .build())
}

/// Deserialize tool input, naming the tool in the failure.
pub(crate) fn parse_input<T: DeserializeOwned>(
    tool_name: &str,
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| {
        ToolError::InvalidInput(format!("failed to parse input for {tool_name}: {e}"))
    })
}
