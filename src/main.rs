//! tg_send CLI - main entry point
//!
//! Sends one message to the configured recipient and exits.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tg_send::{commands, Config};

#[derive(Parser)]
#[command(name = "tg_send")]
#[command(about = "Send one Telegram message to a user or bot", long_about = None)]
#[command(version)]
struct Cli {
    /// Message text to send [default: hello]
    #[arg(allow_hyphen_values = true)]
    message: Option<String>,

    /// Anything after the message is ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    _rest: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries only the confirmation line
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tg_send=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.message)?;

    commands::send_message_run(&config).await?;
    Ok(())
}
