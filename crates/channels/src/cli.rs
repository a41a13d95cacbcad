//! CLI channel for interactive terminal chat.
//!
//! Reads lines from stdin (or any async reader) on a background task and
//! forwards them over an mpsc channel. EOF closes the channel, which the
//! agent loop treats as end-of-input. Bytes that are not valid UTF-8 are
//! replaced rather than rejected.

use async_trait::async_trait;
use std::sync::Mutex;
use steward_core::channel::{Channel, ChannelMessage, InputReceiver};
use steward_core::error::ChannelError;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Line-oriented input channel for terminal chat.
pub struct CliChannel {
    reader: Mutex<Option<BoxedReader>>,
}

impl CliChannel {
    /// Read from the process's stdin.
    pub fn new() -> Self {
        Self::from_reader(io::stdin())
    }

    /// Read from an arbitrary async reader.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            reader: Mutex::new(Some(Box::new(reader))),
        }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<InputReceiver, ChannelError> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| ChannelError::ConnectionLost("input reader lock poisoned".into()))?
            .take()
            .ok_or(ChannelError::Closed)?;

        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();

            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => {
                        debug!("CLI input reached EOF");
                        break; // EOF (Ctrl+D)
                    }
                    Ok(_) => {
                        let line = decode_line(&buf);
                        if tx.send(Ok(ChannelMessage::new(line))).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    match String::from_utf8_lossy(raw) {
        std::borrow::Cow::Borrowed(line) => line.to_string(),
        std::borrow::Cow::Owned(line) => {
            warn!("CLI input line was not valid UTF-8; invalid bytes replaced");
            line
        }
    }
}
