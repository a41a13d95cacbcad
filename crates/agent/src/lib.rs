//! The core agent loop for Steward.
//!
//! Each user turn runs through a small state machine:
//!
//! 1. **Await input** from the channel (`exit` or end-of-input stops here)
//! 2. **Run inference** on the rendered conversation and stream the reply
//! 3. **Extract** a `tool: name(args)` directive from the full reply
//! 4. **Dispatch** the tool, append its result, and go back to step 2
//!    without asking the user
//!
//! The loop goes back to step 1 when a reply carries no tool call or when
//! the consecutive tool-call limit is hit.

pub mod dispatcher;
pub mod extractor;
pub mod loop_runner;
pub mod stats;
pub mod stream_event;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dispatcher::ToolDispatcher;
pub use extractor::{MarkerExtractor, ToolCallExtractor, extract_tool_call};
pub use loop_runner::{AgentLoop, LoopState};
pub use stats::{Stats, StatsCalculator};
pub use stream_event::AgentStreamEvent;
