//! Tool dispatch: validate a parsed call against the registry and run it.

use std::sync::Arc;
use steward_core::error::ToolError;
use steward_core::tool::{ToolCall, ToolRegistry};
use tracing::{debug, warn};

/// Runs tool calls against an immutable registry.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a call, keeping the failure structured.
    ///
    /// Empty argument text means `{}`. Errors raised by the tool itself come
    /// back as `ToolError::ExecutionFailed`.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let tool = self.registry.lookup(&call.name)?;

        let raw = call.raw_arguments.trim();
        let arguments = if raw.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw)
                .map_err(|_| ToolError::InvalidArguments(call.raw_arguments.clone()))?
        };

        debug!(tool = %call.name, "Executing tool");
        tool.execute(arguments)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: call.name.clone(),
                reason: e.to_string(),
            })
    }

    /// Run a call and always produce conversation text.
    ///
    /// Success yields the tool's output unchanged; any failure yields its
    /// rendered error message.
    pub async fn execute(&self, call: &ToolCall) -> String {
        match self.dispatch(call).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                e.to_string()
            }
        }
    }
}
