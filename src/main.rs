//! playpen-slack - A Slack bot for administering a playpen network.
//!
//! This is the main entry point for the bot, which bridges a Slack channel
//! with a playpen cluster-orchestration network so operators can inspect and
//! drive the fleet from chat.
//!
//! # Overview
//!
//! The bot joins one configured channel, listens for messages addressed to it
//! by mention, and turns them into operations against the network
//! coordinator's REST API: listing and inspecting coordinators and servers,
//! provisioning and deprovisioning, promoting packages, sending console
//! input, freezing servers and reporting resource statistics. Every command
//! gets exactly one aggregate response, however many servers it touched.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! slack:
//!   app_token: "xapp-..."
//!   bot_token: "xoxb-..."
//!   channel: "playpen"
//!
//! fleet:
//!   url: "http://localhost:9000"
//! ```
//!
//! Any value can be overridden with `PLAYPEN_` prefixed environment
//! variables, using `__` as the section separator:
//!
//! ```bash
//! export PLAYPEN_SLACK__BOT_TOKEN="xoxb-from-env"
//! export PLAYPEN_FLEET__URL="http://coordinator:9000"
//! ```
//!
//! # Usage
//!
//! ```bash
//! playpen-slack --config config.yaml
//! ```
//!
//! # Bot Commands
//!
//! Once running, say `@playpen help` in the configured channel for the full
//! vocabulary: `help`, `list`, `show`, `provision`, `deprovision`,
//! `shutdown`, `promote`, `send`, `freeze`, `list-packages`, `list-plugins`,
//! `pass` and `stats`.
//!
//! # Architecture
//!
//! - [`bot`] - Main loop wiring Slack messages to command execution
//! - [`commands`] - Command parsing, handlers and response composition
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`fleet`] - Network coordinator API client and target resolution
//! - [`slack`] - Slack Web API client and Socket Mode listener
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod fleet;
mod slack;

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// See the [`config`] module for the expected format. Values can be
    /// overridden with `PLAYPEN_` prefixed environment variables.
    #[arg(short, long)]
    config: String,
}

/// Main entry point for the bot.
///
/// Initializes logging, loads the configuration, connects to Slack and runs
/// the message loop until the process is terminated. Configuration and
/// connection errors are logged and end the process cleanly instead of
/// panicking.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting playpen-slack {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from YAML file with environment variable overrides
    let config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    // Launch bot
    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
