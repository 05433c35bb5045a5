mod assistant;
mod cli;
mod completion;
mod config;
mod gemini_client;
mod server;

use std::io;
use std::net::SocketAddr;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::chat::{AssistantKind, ChatContext};
use crate::config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Gemini model to use instead of GEMINI_MODEL
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve both assistants over HTTP (the default)
    Serve {
        /// Address to listen on instead of BIND_ADDR
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Chat with one assistant in the terminal
    Chat {
        /// Which assistant to talk to
        #[arg(short, long, value_enum, default_value_t = AssistantKind::Safety)]
        assistant: AssistantKind,

        /// Send a single message and exit
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// Running without a subcommand starts the server on the configured address.
fn command_or_serve(command: Option<Commands>) -> Commands {
    command.unwrap_or(Commands::Serve { bind: None })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    match command_or_serve(cli.command) {
        Commands::Chat { assistant, input } => {
            let interactive = input.is_none();
            let mut chat_context =
                ChatContext::new(Box::new(io::stdout()), input, interactive, assistant);
            chat_context.run(&config).await
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            info!("Starting assistant server");
            server::serve(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_serves() {
        let cli = Cli::try_parse_from(["safety-travel-assistant"]).unwrap();
        assert!(matches!(
            command_or_serve(cli.command),
            Commands::Serve { bind: None }
        ));
    }

    #[test]
    fn serve_accepts_a_bind_address() {
        let cli =
            Cli::try_parse_from(["safety-travel-assistant", "serve", "--bind", "0.0.0.0:8080"])
                .unwrap();
        match cli.command {
            Some(Commands::Serve { bind }) => {
                assert_eq!(bind, Some("0.0.0.0:8080".parse().unwrap()));
            }
            _ => panic!("expected the serve subcommand"),
        }
    }
}
