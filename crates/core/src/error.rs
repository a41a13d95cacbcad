//! Error types for the Steward domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Connection or transport failure before or during a request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-success status.
    #[error("Backend request failed with status {status_code}: {message}")]
    ApiError { status_code: u16, message: String },

    /// A single stream record could not be decoded. Skippable.
    #[error("Malformed stream record: {0}")]
    Protocol(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Whether the consumer may drop this item and keep reading the stream.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Channel closed")]
    Closed,
}

/// Tool failures.
///
/// The first three variants render as the exact text the dispatcher feeds
/// back into the conversation. `InvalidInput` and `Io` are raised by tool
/// implementations and get wrapped into `ExecutionFailed`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Error: Tool '{0}' not found.")]
    NotFound(String),

    #[error("Error: Tool arguments are not valid JSON: {0}")]
    InvalidArguments(String),

    #[error("Error executing tool '{tool_name}': {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Duplicate tool name in registry: {0}")]
    DuplicateName(String),
}

impl ToolError {
    /// Build an `Io` error with a human-readable context prefix.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 404,
            message: "model 'llama9' not found".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("llama9"));
    }

    #[test]
    fn only_protocol_errors_are_recoverable() {
        assert!(ProviderError::Protocol("bad json".into()).is_recoverable());
        assert!(!ProviderError::Unavailable("refused".into()).is_recoverable());
        assert!(!ProviderError::StreamInterrupted("reset".into()).is_recoverable());
    }

    #[test]
    fn tool_errors_render_conversation_text() {
        assert_eq!(
            ToolError::NotFound("grep".into()).to_string(),
            "Error: Tool 'grep' not found."
        );
        assert_eq!(
            ToolError::InvalidArguments("{oops".into()).to_string(),
            "Error: Tool arguments are not valid JSON: {oops"
        );
        assert_eq!(
            ToolError::ExecutionFailed {
                tool_name: "read_file".into(),
                reason: "no such file".into(),
            }
            .to_string(),
            "Error executing tool 'read_file': no such file"
        );
    }

    #[test]
    fn io_error_includes_context() {
        let err = ToolError::io(
            "failed to read file 'a.txt'",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "failed to read file 'a.txt': not found");
    }
}
