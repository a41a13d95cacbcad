//! The agent reasoning loop implementation.

use std::sync::Arc;
use steward_config::{AgentSettings, StatsScope};
use steward_core::channel::InputReceiver;
use steward_core::identity::Identity;
use steward_core::message::{Conversation, Turn};
use steward_core::provider::{Provider, ProviderRequest};
use steward_core::tool::{ToolCall, ToolRegistry};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::dispatcher::ToolDispatcher;
use crate::extractor::{MarkerExtractor, ToolCallExtractor};
use crate::stats::StatsCalculator;
use crate::stream_event::AgentStreamEvent;

/// Typing this (any case, surrounding whitespace ignored) ends the session.
pub const EXIT_COMMAND: &str = "exit";

/// Typing this clears the conversation and session statistics.
pub const RESET_COMMAND: &str = "/reset";

const TOOL_CATALOGUE_HEADER: &str = "You have the following tools available. Respond with 'tool: <tool_name>({<json_args>})' to use a tool.";

/// Where the loop is in its per-turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    AwaitUserInput,
    RunningInference,
    HasToolCall(ToolCall),
    Terminated,
}

/// The core agent loop that orchestrates LLM calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Agent identity
    identity: Identity,

    /// Runs tool calls against the registry
    dispatcher: ToolDispatcher,

    /// Finds tool calls in responses
    extractor: Box<dyn ToolCallExtractor>,

    /// Maximum consecutive tool calls before control returns to the user
    max_tool_chain: u32,

    /// Where the throughput clock starts
    stats_scope: StatsScope,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        identity: Identity,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            identity,
            dispatcher: ToolDispatcher::new(tools),
            extractor: Box::new(MarkerExtractor),
            max_tool_chain: AgentSettings::default().max_tool_chain,
            stats_scope: StatsScope::default(),
        }
    }

    /// Apply chain length and stats scope from configuration.
    pub fn with_settings(self, settings: &AgentSettings) -> Self {
        self.with_max_tool_chain(settings.max_tool_chain)
            .with_stats_scope(settings.stats_scope)
    }

    /// Set the maximum number of consecutive tool calls.
    pub fn with_max_tool_chain(mut self, max: u32) -> Self {
        self.max_tool_chain = max.max(1);
        self
    }

    pub fn with_stats_scope(mut self, scope: StatsScope) -> Self {
        self.stats_scope = scope;
        self
    }

    /// Swap the tool-call extraction strategy.
    pub fn with_extractor(mut self, extractor: Box<dyn ToolCallExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The identity prompt followed by the tool catalogue.
    pub fn system_prompt(&self) -> String {
        let registry = self.dispatcher.registry();
        if registry.is_empty() {
            return self.identity.system_prompt.clone();
        }

        let mut prompt = format!("{}\n{TOOL_CATALOGUE_HEADER}\n", self.identity.system_prompt);
        for def in registry.definitions() {
            prompt.push_str(&format!(
                "- {}: {}. Input schema: {}\n",
                def.name, def.description, def.parameters
            ));
        }
        prompt
    }

    /// Run a whole session: read input, infer, dispatch tools, repeat.
    ///
    /// Returns the final conversation once input ends or the user exits.
    /// Backend and tool failures never end the session; they surface as
    /// events and the loop recovers.
    pub async fn run(
        &self,
        input: &mut InputReceiver,
        events: &UnboundedSender<AgentStreamEvent>,
    ) -> Conversation {
        let mut conversation = Conversation::new();
        let mut stats = StatsCalculator::new(self.stats_scope);
        let system_prompt = self.system_prompt();
        let mut chain_length = 0u32;
        let mut state = LoopState::AwaitUserInput;

        info!(
            conversation_id = %conversation.id,
            model = %self.model,
            kind = %self.identity.kind,
            "Starting agent session"
        );

        loop {
            state = match state {
                LoopState::AwaitUserInput => {
                    chain_length = 0;
                    self.await_input(input, &mut conversation, &mut stats, events)
                        .await
                }
                LoopState::RunningInference => {
                    self.run_inference(&system_prompt, &mut conversation, &mut stats, events)
                        .await
                }
                LoopState::HasToolCall(call) => {
                    chain_length += 1;
                    if chain_length > self.max_tool_chain {
                        warn!(
                            limit = self.max_tool_chain,
                            tool = %call.name,
                            "Tool chain limit reached"
                        );
                        emit(
                            events,
                            AgentStreamEvent::Warning {
                                message: format!(
                                    "Tool chain limit of {} reached; not running {}",
                                    self.max_tool_chain, call.directive
                                ),
                            },
                        );
                        LoopState::AwaitUserInput
                    } else {
                        self.run_tool(call, &mut conversation, events).await
                    }
                }
                LoopState::Terminated => break,
            };
        }

        info!(
            conversation_id = %conversation.id,
            turns = conversation.len(),
            "Agent session ended"
        );
        conversation
    }

    async fn await_input(
        &self,
        input: &mut InputReceiver,
        conversation: &mut Conversation,
        stats: &mut StatsCalculator,
        events: &UnboundedSender<AgentStreamEvent>,
    ) -> LoopState {
        emit(events, AgentStreamEvent::AwaitingInput);

        let message = match input.recv().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                warn!(error = %e, "Input channel failed");
                emit(
                    events,
                    AgentStreamEvent::Error {
                        message: e.to_string(),
                    },
                );
                return LoopState::Terminated;
            }
            None => {
                debug!("Input ended");
                return LoopState::Terminated;
            }
        };

        let command = message.content.trim();
        if command.eq_ignore_ascii_case(EXIT_COMMAND) {
            return LoopState::Terminated;
        }
        if command.is_empty() {
            return LoopState::AwaitUserInput;
        }
        if command == RESET_COMMAND {
            conversation.reset();
            stats.reset();
            debug!(conversation_id = %conversation.id, "Conversation reset");
            emit(events, AgentStreamEvent::Reset);
            return LoopState::AwaitUserInput;
        }

        conversation.push(Turn::user(message.content));
        LoopState::RunningInference
    }

    async fn run_inference(
        &self,
        system_prompt: &str,
        conversation: &mut Conversation,
        stats: &mut StatsCalculator,
        events: &UnboundedSender<AgentStreamEvent>,
    ) -> LoopState {
        let request = ProviderRequest::new(
            self.model.as_str(),
            system_prompt,
            conversation.render_prompt(),
        );
        debug!(
            conversation_id = %conversation.id,
            turns = conversation.len(),
            provider = self.provider.name(),
            "Running inference"
        );

        stats.begin();
        let mut stream = match self.provider.stream(request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Inference request failed");
                emit(
                    events,
                    AgentStreamEvent::Error {
                        message: e.to_string(),
                    },
                );
                return LoopState::AwaitUserInput;
            }
        };

        let mut response = String::new();
        let mut completed = false;
        while let Some(item) = stream.recv().await {
            match item {
                Ok(chunk) => {
                    if !chunk.content.is_empty() {
                        stats.observe(&chunk.content);
                        response.push_str(&chunk.content);
                        emit(
                            events,
                            AgentStreamEvent::Chunk {
                                content: chunk.content,
                            },
                        );
                    }
                    if chunk.done {
                        completed = true;
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "Skipping stream record");
                    emit(
                        events,
                        AgentStreamEvent::Warning {
                            message: e.to_string(),
                        },
                    );
                }
                Err(e) => {
                    // The partial response is dropped, not committed.
                    warn!(error = %e, "Inference stream failed");
                    emit(
                        events,
                        AgentStreamEvent::Error {
                            message: e.to_string(),
                        },
                    );
                    return LoopState::AwaitUserInput;
                }
            }
        }
        if !completed {
            debug!("Stream ended without a done record; keeping accumulated text");
        }

        emit(
            events,
            AgentStreamEvent::Stats {
                stats: stats.finish(),
            },
        );

        let call = self.extractor.extract(&response);
        conversation.push(Turn::assistant(response));

        match call {
            Some(call) => LoopState::HasToolCall(call),
            None => LoopState::AwaitUserInput,
        }
    }

    async fn run_tool(
        &self,
        call: ToolCall,
        conversation: &mut Conversation,
        events: &UnboundedSender<AgentStreamEvent>,
    ) -> LoopState {
        emit(
            events,
            AgentStreamEvent::ToolCall {
                name: call.name.clone(),
                directive: call.directive.clone(),
            },
        );

        let output = self.dispatcher.execute(&call).await;

        emit(
            events,
            AgentStreamEvent::ToolResult {
                name: call.name,
                output: output.clone(),
            },
        );
        conversation.push(Turn::tool_result(call.directive, output));
        LoopState::RunningInference
    }
}

/// Send an event; a dropped receiver only means nobody is watching.
fn emit(events: &UnboundedSender<AgentStreamEvent>, event: AgentStreamEvent) {
    let _ = events.send(event);
}
