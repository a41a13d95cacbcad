//! `steward chat`: interactive tool-using chat.

use clap::Args;
use std::io::Write;
use std::sync::Arc;
use steward_agent::{AgentLoop, AgentStreamEvent};
use steward_channels::CliChannel;
use steward_config::{AppConfig, StatsScope};
use steward_core::channel::Channel;
use steward_core::identity::{AgentKind, Identity};
use steward_core::provider::Provider;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use super::render::Renderer;

#[derive(Args, Debug, Clone, Default)]
pub struct ChatArgs {
    /// Model to chat with (skips the selection prompt)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Assistant persona: default, code, or explain
    #[arg(short, long)]
    pub agent: Option<AgentKind>,

    /// Maximum consecutive tool calls before asking the user again
    #[arg(long)]
    pub max_tool_chain: Option<u32>,

    /// Measure throughput over the whole session instead of per reply
    #[arg(long)]
    pub session_stats: bool,
}

impl ChatArgs {
    /// Flags win over the config file and the environment.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.default_model = Some(model.clone());
        }
        if let Some(kind) = self.agent {
            config.agent.kind = kind;
        }
        if let Some(max) = self.max_tool_chain {
            config.agent.max_tool_chain = max;
        }
        if self.session_stats {
            config.agent.stats_scope = StatsScope::Session;
        }
    }
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    args.apply(&mut config);
    config.validate()?;

    let provider = steward_providers::build_from_config(&config);

    // Shared by the model prompt and the chat channel.
    let mut stdin = BufReader::new(tokio::io::stdin());
    let model = match config.default_model.clone() {
        Some(model) => model,
        None => select_model(provider.as_ref(), &mut stdin).await?,
    };

    let identity = Identity::for_kind(config.agent.kind)
        .with_override(config.agent.system_prompt_override.as_deref());
    let tools = Arc::new(steward_tools::default_registry()?);
    let agent = AgentLoop::new(provider, model, tools, identity).with_settings(&config.agent);

    info!(model = agent.model(), kind = %config.agent.kind, "Chat session starting");
    println!(
        "Chat with {} (type 'exit' or Ctrl+D to quit, '/reset' to start over)",
        agent.model()
    );

    let channel = CliChannel::from_reader(stdin);
    let mut input = channel
        .start()
        .await
        .map_err(|e| format!("Channel error: {e}"))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(rx));

    agent.run(&mut input, &tx).await;
    drop(tx);
    printer.await?;

    println!();
    println!("Goodbye!");
    Ok(())
}

async fn print_events(mut events: mpsc::UnboundedReceiver<AgentStreamEvent>) {
    let mut renderer = Renderer::new();
    let mut stdout = std::io::stdout();
    while let Some(event) = events.recv().await {
        let text = renderer.render(&event);
        if write!(stdout, "{text}").and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

/// Ask the backend for its models and let the user pick one by number.
async fn select_model<R>(
    provider: &dyn Provider,
    input: &mut R,
) -> Result<String, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    let models = provider
        .list_models()
        .await
        .map_err(|e| format!("Failed to list models: {e}"))?;
    if models.is_empty() {
        return Err("No models available. Pull one with `ollama pull <model>`.".into());
    }

    let mut stdout = std::io::stdout();
    choose_model(&models, input, &mut stdout).await
}

/// Print a numbered list and read choices until one is valid.
async fn choose_model<R, W>(
    models: &[String],
    input: &mut R,
    out: &mut W,
) -> Result<String, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Available models:")?;
    for (i, name) in models.iter().enumerate() {
        writeln!(out, "  {}. {name}", i + 1)?;
    }

    let mut line = String::new();
    loop {
        write!(out, "Select a model [1-{}]: ", models.len())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            return Err("No model selected".into());
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=models.len()).contains(&n) => return Ok(models[n - 1].clone()),
            _ => writeln!(out, "Invalid selection '{}'", line.trim())?,
        }
    }
}
