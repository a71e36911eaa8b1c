use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::config::{Config, DEFAULT_FILE, DEFAULT_PROMPT};
use hbnb::console;

#[derive(Parser)]
#[command(name = "hbnb")]
#[command(about = "Interactive console for the HBnB object store")]
struct Cli {
    /// JSON file the store is loaded from and saved to
    #[arg(short, long, env = "HBNB_FILE", default_value = DEFAULT_FILE)]
    file: PathBuf,

    /// Prompt shown in interactive mode
    #[arg(long, env = "HBNB_PROMPT", default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Run this command instead of reading stdin (repeatable)
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,
}

/// Initialize tracing on stderr so stdout carries only console output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "hbnb=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config {
        file: cli.file,
        prompt: cli.prompt,
        commands: cli.commands,
    };
    tracing::debug!(file = %config.file.display(), "Starting console");

    console::run(&config)?;
    Ok(())
}
