//! Tool-call extraction from free-form model output.
//!
//! The model requests a tool by writing `tool: <name>(<arguments>)` somewhere
//! in its response. Extraction runs on the fully accumulated text, never on
//! individual fragments.

use steward_core::tool::ToolCall;

/// Literal that introduces a tool-call directive.
pub const TOOL_MARKER: &str = "tool: ";

/// Finds a tool call in a complete response.
///
/// Implementations must be pure: the same text always yields the same result.
pub trait ToolCallExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Option<ToolCall>;
}

/// Last-marker heuristic: the last `tool: `, then the first `(` and the last
/// `)` after it.
///
/// Not a balanced-parenthesis parser. Arguments that contain their own
/// parentheses followed by trailing text with a `)` will be cut wrongly.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerExtractor;

impl ToolCallExtractor for MarkerExtractor {
    fn extract(&self, text: &str) -> Option<ToolCall> {
        extract_tool_call(text)
    }
}

/// Extract the last tool-call directive from `text`, if any.
pub fn extract_tool_call(text: &str) -> Option<ToolCall> {
    let start = text.rfind(TOOL_MARKER)? + TOOL_MARKER.len();
    let candidate = text[start..].trim();

    let open = candidate.find('(')?;
    let close = candidate.rfind(')')?;
    if close < open {
        return None;
    }

    Some(ToolCall {
        name: candidate[..open].trim().to_string(),
        raw_arguments: candidate[open + 1..close].trim().to_string(),
        directive: candidate[..=close].to_string(),
    })
}
