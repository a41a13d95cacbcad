//! Agent-level events.
//!
//! The loop reports everything user-visible through `AgentStreamEvent`s so
//! the rendering side (the terminal, or a test) stays out of the control
//! flow.

use crate::stats::Stats;
use serde::{Deserialize, Serialize};

/// Events emitted by the agent loop, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// The loop is waiting for the next line of user input.
    AwaitingInput,

    /// Partial text from the model.
    Chunk { content: String },

    /// The model asked for a tool.
    ToolCall { name: String, directive: String },

    /// The tool finished; `output` is what goes back into the conversation.
    ToolResult { name: String, output: String },

    /// An inference call completed.
    Stats { stats: Stats },

    /// Something non-fatal went wrong; the loop carries on.
    Warning { message: String },

    /// The backend call failed; the loop goes back to waiting for input.
    Error { message: String },

    /// The conversation was cleared.
    Reset,
}

impl AgentStreamEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AwaitingInput => "awaiting_input",
            Self::Chunk { .. } => "chunk",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Stats { .. } => "stats",
            Self::Warning { .. } => "warning",
            Self::Error { .. } => "error",
            Self::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_chunk() {
        let event = AgentStreamEvent::Chunk {
            content: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"chunk""#));
        assert!(json.contains(r#""content":"Hello""#));
    }

    #[test]
    fn event_serialization_stats() {
        let event = AgentStreamEvent::Stats {
            stats: Stats::new(4, 2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"stats""#));
        assert!(json.contains(r#""token_count":4"#));
    }

    #[test]
    fn unit_variants_round_trip() {
        let json = serde_json::to_string(&AgentStreamEvent::Reset).unwrap();
        assert_eq!(json, r#"{"type":"reset"}"#);
        let back: AgentStreamEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AgentStreamEvent::Reset);
    }

    #[test]
    fn event_type_names() {
        assert_eq!(AgentStreamEvent::AwaitingInput.event_type(), "awaiting_input");
        assert_eq!(
            AgentStreamEvent::ToolCall {
                name: "read_file".into(),
                directive: "read_file({})".into()
            }
            .event_type(),
            "tool_call"
        );
        assert_eq!(
            AgentStreamEvent::Warning {
                message: "x".into()
            }
            .event_type(),
            "warning"
        );
    }
}
