//! # Steward Core
//!
//! Domain types, traits, and error definitions for the Steward chat agent.
//! This crate does no I/O of its own: it defines the domain model that all
//! other crates implement against.
//!
//! Every collaborator of the agent loop (inference backend, input channel,
//! tool) is a trait here. Implementations live in their respective crates.

pub mod channel;
pub mod error;
pub mod identity;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelMessage};
pub use error::{ChannelError, ProviderError, ToolError};
pub use identity::{AgentKind, Identity};
pub use message::{Conversation, ConversationId, Role, Turn};
pub use provider::{Provider, ProviderRequest, StreamChunk};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolRegistryBuilder};
