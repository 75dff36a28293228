#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::items_after_statements,
    clippy::map_unwrap_or,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::uninlined_format_args,
    clippy::unnecessary_wraps
)]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use menubot::channels;
use menubot::infra::ResetZone;
use menubot::Config;

/// `menubot` - menu-driven customer-service assistant.
#[derive(Parser, Debug)]
#[command(name = "menubot")]
#[command(version)]
#[command(about = "Menu-driven customer-service chat assistant.", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the assistant with the configured channel
    #[command(long_about = "\
Start the assistant with the configured channel.

Serves the liveness endpoint (GET /healthz), schedules the daily \
session reset, and answers inbound messages until the channel closes \
or Ctrl-C is pressed. When the PORT env var is set and no host is \
given (HOST / MENUBOT_GATEWAY_HOST / --host), the endpoint binds \
0.0.0.0 so a hosting platform's health check can reach it.

Examples:
  menubot run                      # use config defaults
  menubot run -p 8080              # liveness endpoint on port 8080
  menubot run --host 0.0.0.0       # bind to all interfaces")]
    Run {
        /// Liveness endpoint port; defaults to gateway.port
        #[arg(short, long)]
        port: Option<u16>,

        /// Liveness endpoint host; defaults to gateway.host
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with the assistant from this terminal
    #[command(long_about = "\
Chat with the assistant from this terminal.

Each line typed is one inbound message. Prefix a line with \
'@<sender> ' to send it as a different sender. The liveness endpoint \
is not started.

Examples:
  menubot chat
  menubot chat --sender 6281234567890")]
    Chat {
        /// Sender id for lines without an '@<sender>' prefix
        #[arg(long)]
        sender: Option<String>,
    },

    /// Show configuration and the next scheduled reset
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(config_dir) = &cli.config_dir {
        if config_dir.trim().is_empty() {
            bail!("--config-dir cannot be empty");
        }
        std::env::set_var("MENUBOT_CONFIG_DIR", config_dir);
    }

    // Initialize logging - respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let mut config = Config::load_or_init().await?;

    match cli.command {
        Commands::Run { port, host } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if config.gateway.enabled {
                info!(
                    "🚀 Starting menubot (liveness on {}:{})",
                    config.gateway.host, config.gateway.port
                );
            } else {
                info!("🚀 Starting menubot (liveness endpoint disabled)");
            }
            channels::start_channels(config).await
        }

        Commands::Chat { sender } => {
            if let Some(sender) = sender {
                if sender.trim().is_empty() {
                    bail!("--sender cannot be empty");
                }
                config.channels_config.cli_sender = sender.trim().to_string();
            }
            config.channels_config.cli = true;
            config.gateway.enabled = false;
            channels::start_channels(config).await
        }

        Commands::Status => {
            let zone = ResetZone::parse(config.reset.timezone.as_deref())?;

            println!("🤖 menubot Status");
            println!();
            println!("Version:     {}", env!("CARGO_PKG_VERSION"));
            println!("Config:      {}", config.config_path.display());
            println!();
            if config.gateway.enabled {
                println!(
                    "🌐 Liveness:   http://{}:{}/healthz",
                    config.gateway.host, config.gateway.port
                );
            } else {
                println!("🌐 Liveness:   disabled");
            }
            if config.reset.enabled {
                println!("🔄 Reset:      daily at midnight ({})", zone.label());
                println!("   Next:       {}", zone.next_midnight(Utc::now()));
            } else {
                println!("🔄 Reset:      disabled");
            }
            println!();
            println!("Channels:");
            println!(
                "  CLI:      {} (sender: {})",
                if config.channels_config.cli { "✅" } else { "❌" },
                config.channels_config.cli_sender
            );

            Ok(())
        }
    }
}
