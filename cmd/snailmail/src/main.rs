//! Snail mail notifier CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, MelodyCommand, NotifyCommand, PlayCommand, RenderCommand};

/// Snail mail notifier CLI.
///
/// Plays and renders the receiver's notification melodies:
///   - Inspect the built-in and user-defined melodies
///   - Render a melody to raw 16-bit PCM
///   - Play a melody through the tick scheduler in real time
///   - Sound the melody bound to a mailbox event
///
/// Configuration is stored in ~/.snailmail/ and supports multiple profiles,
/// similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "snailmail")]
#[command(about = "Snail mail notifier melody tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.snailmail/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Profile name to use
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Output file (default: stdout, or <id>.pcm for audio)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Melody definition file (YAML or JSON, "-" for stdin)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Inspect melodies
    Melody(MelodyCommand),
    /// Render a melody to a PCM file
    Render(RenderCommand),
    /// Play a melody in real time
    Play(PlayCommand),
    /// Play the melody bound to an event
    Notify(NotifyCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Melody(cmd) => cmd.run(&cli).await,
        Commands::Render(cmd) => cmd.run(&cli).await,
        Commands::Play(cmd) => cmd.run(&cli).await,
        Commands::Notify(cmd) => cmd.run(&cli).await,
    }
}
