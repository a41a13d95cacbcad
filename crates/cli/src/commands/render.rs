//! Terminal rendering of agent events.

use steward_agent::AgentStreamEvent;

const BLUE: &str = "\u{1b}[94m";
const YELLOW: &str = "\u{1b}[93m";
const GREEN: &str = "\u{1b}[92m";
const GREY: &str = "\u{1b}[90m";
const RED: &str = "\u{1b}[91m";
const RESET: &str = "\u{1b}[0m";

/// Turns the event stream into transcript text.
///
/// Tracks whether an `AI:` line is open so streamed chunks land on one line
/// and everything else starts on a fresh one.
#[derive(Debug, Default)]
pub struct Renderer {
    reply_open: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, event: &AgentStreamEvent) -> String {
        match event {
            AgentStreamEvent::Chunk { content } => {
                if self.reply_open {
                    content.clone()
                } else {
                    self.reply_open = true;
                    format!("{YELLOW}AI{RESET}: {content}")
                }
            }
            AgentStreamEvent::AwaitingInput => {
                format!("{}{BLUE}You{RESET}: ", self.close_reply())
            }
            AgentStreamEvent::ToolCall { directive, .. } => {
                format!("{}{GREEN}tool{RESET}: {directive}\n", self.close_reply())
            }
            AgentStreamEvent::ToolResult { output, .. } => {
                format!("{}{GREEN}result{RESET}: {output}\n", self.close_reply())
            }
            AgentStreamEvent::Stats { stats } => {
                format!("{}{GREY}{stats}{RESET}\n", self.close_reply())
            }
            AgentStreamEvent::Warning { message } => {
                format!("{}{GREY}warning: {message}{RESET}\n", self.close_reply())
            }
            AgentStreamEvent::Error { message } => {
                format!("{}{RED}Error{RESET}: {message}\n", self.close_reply())
            }
            AgentStreamEvent::Reset => {
                format!("{}Conversation cleared.\n", self.close_reply())
            }
        }
    }

    fn close_reply(&mut self) -> &'static str {
        if std::mem::take(&mut self.reply_open) {
            "\n"
        } else {
            ""
        }
    }
}
