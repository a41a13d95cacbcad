//! Channel trait: the abstraction over the user-input side of a session.
//!
//! A Channel produces the lines a user types. The terminal implementation
//! lives in `steward-channels`; tests feed an mpsc channel directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use crate::error::ChannelError;

/// One line of user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// The text content, as typed
    pub content: String,

    /// When the line was read
    pub received_at: DateTime<Utc>,
}

impl ChannelMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            received_at: Utc::now(),
        }
    }
}

/// Receiving half of a channel. The sender being dropped means end-of-input.
pub type InputReceiver = mpsc::Receiver<Result<ChannelMessage, ChannelError>>;

/// The core Channel trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// A human-readable name (e.g., "cli").
    fn name(&self) -> &str;

    /// Start reading input. Messages arrive on the returned receiver until
    /// the source is exhausted.
    async fn start(&self) -> Result<InputReceiver, ChannelError>;
}
