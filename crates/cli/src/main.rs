//! Steward CLI, the main entry point.
//!
//! Commands:
//! - `chat`    : Interactive tool-using chat (the default)
//! - `models`  : List models available on the backend
//! - `doctor`  : Diagnose config and backend health
//! - `config`  : Show the effective config or its path

use clap::{Parser, Subcommand};

mod commands;

use commands::chat::ChatArgs;

#[derive(Parser)]
#[command(
    name = "steward",
    about = "Steward: a tool-using terminal chat agent for Ollama",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chat options when no subcommand is given
    #[command(flatten)]
    chat: ChatArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent
    Chat(ChatArgs),

    /// List models available on the backend
    Models,

    /// Diagnose config and backend health
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the chat transcript.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => commands::chat::run(cli.chat).await?,
        Some(Commands::Chat(args)) => commands::chat::run(args).await?,
        Some(Commands::Models) => commands::models::run().await?,
        Some(Commands::Doctor) => commands::doctor::run().await?,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
