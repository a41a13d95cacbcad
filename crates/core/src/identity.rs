//! Identity: which kind of assistant the session runs as.
//!
//! Each [`AgentKind`] carries a built-in system prompt that teaches the model
//! the `tool: <tool_name>({<json_args>})` directive format. A config-level
//! override replaces the built-in prompt entirely.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Built-in assistant personas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// General-purpose assistant
    #[default]
    Default,
    /// Programmer working on the local file tree
    Code,
    /// Technical explainer
    Explain,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Code => "code",
            Self::Explain => "explain",
        }
    }

    /// The built-in system prompt for this kind.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Code => concat!(
                "You are an expert programmer. You can use tools to interact with the file system. ",
                "When you want to use a tool, respond *only* in the format 'tool: <tool_name>({<json_args>})'. ",
                "For example: 'tool: read_file({\"path\":\"src/main.rs\"})'. ",
                "Do not add any other text before or after the tool call. ",
                "If you are not using a tool, respond normally.",
            ),
            Self::Explain => concat!(
                "You are a technical expert. You can use tools. ",
                "When you want to use a tool, respond *only* in the format 'tool: <tool_name>({<json_args>})'. ",
                "If you are not using a tool, respond normally.",
            ),
            Self::Default => concat!(
                "You are a helpful AI assistant. You can use tools. ",
                "When you want to use a tool, respond *only* in the format 'tool: <tool_name>({<json_args>})'. ",
                "If you are not using a tool, respond normally.",
            ),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "code" => Ok(Self::Code),
            "explain" => Ok(Self::Explain),
            other => Err(format!(
                "unknown agent kind '{other}' (expected default, code, or explain)"
            )),
        }
    }
}

/// The agent's identity for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Which persona this identity was built from
    pub kind: AgentKind,

    /// Base system prompt, before the tool catalogue is appended
    pub system_prompt: String,
}

impl Identity {
    /// Identity using the built-in prompt of `kind`.
    pub fn for_kind(kind: AgentKind) -> Self {
        Self {
            kind,
            system_prompt: kind.system_prompt().to_string(),
        }
    }

    /// Replace the system prompt when an override is configured.
    pub fn with_override(mut self, system_prompt_override: Option<&str>) -> Self {
        if let Some(prompt) = system_prompt_override
            && !prompt.trim().is_empty()
        {
            self.system_prompt = prompt.to_string();
        }
        self
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::for_kind(AgentKind::Default)
    }
}
