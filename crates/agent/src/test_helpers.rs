//! Shared test helpers for loop tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use steward_core::channel::{ChannelMessage, InputReceiver};
use steward_core::error::ProviderError;
use steward_core::provider::{ChunkReceiver, Provider, ProviderRequest, StreamChunk};
use tokio::sync::mpsc;

/// One scripted reply to a `stream` call.
pub enum Script {
    /// The call succeeds and the stream yields these items.
    Stream(Vec<Result<StreamChunk, ProviderError>>),
    /// The call itself fails.
    Fail(ProviderError),
}

impl Script {
    /// A clean stream of fragments, the last one marked done.
    pub fn text(fragments: &[&str]) -> Self {
        let mut items: Vec<Result<StreamChunk, ProviderError>> = fragments
            .iter()
            .map(|f| Ok(StreamChunk::text(*f)))
            .collect();
        if let Some(Ok(last)) = items.last_mut() {
            last.done = true;
        } else {
            items.push(Ok(StreamChunk::last("")));
        }
        Self::Stream(items)
    }
}

/// A mock provider that replays scripted streams in order and records every
/// request it receives.
///
/// Panics if more calls are made than scripts provided.
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider: no script for call #{call}"));

        match script {
            Script::Fail(e) => Err(e),
            Script::Stream(items) => {
                let (tx, rx) = mpsc::channel(items.len().max(1));
                for item in items {
                    tx.try_send(item).unwrap();
                }
                Ok(rx)
            }
        }
    }
}

/// An input channel that yields `lines` and then reports end-of-input.
pub fn scripted_input(lines: &[&str]) -> InputReceiver {
    let (tx, rx) = mpsc::channel(lines.len().max(1));
    for line in lines {
        tx.try_send(Ok(ChannelMessage::new(*line))).unwrap();
    }
    rx
}
