//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the entry point for
//! processing bot commands. It owns the addressing rules (which channel, which
//! mention) and routes parsed commands to their handlers.
//!
//! # Architecture
//!
//! The Commander follows a two-phase processing model:
//!
//! 1. **Parsing Phase** - Filters out messages not addressed to the bot and
//!    parses the rest into structured [`Command`] enums
//! 2. **Execution Phase** - Routes parsed commands to specialized handlers
//!    that produce the response text
//!
//! # Flow
//!
//! ```text
//! Slack Message → parse() → Command → execute() → response String
//! ```

use log::debug;

use crate::commands::{
    CommandParseError, InboundMessage,
    actions::{
        handle_deprovision, handle_freeze, handle_help, handle_list, handle_list_packages,
        handle_list_plugins, handle_pass, handle_promote, handle_provision, handle_send,
        handle_show, handle_shutdown, handle_stats,
    },
    command::{Command, format_command_error},
    report::format_greeting,
};
use crate::fleet::FleetService;

/// Command orchestrator for parsing and executing bot commands.
///
/// The Commander is responsible for:
/// - Deciding whether a message addresses the bot at all
/// - Parsing message tokens into structured commands
/// - Routing commands to the appropriate handlers
/// - Converting parse errors into user-facing messages
///
/// # Addressing
///
/// A message is for the bot only when all three hold:
/// - it was posted in the bot's configured channel
/// - its first token is the bot's mention (`<@U...>`, case-insensitive)
/// - it was not sent by the bot itself
///
/// Everything else is silently ignored ([`CommandParseError::NotForBot`]).
pub struct Commander {
    /// Channel id the bot listens in
    channel: String,
    /// The bot's own user id, used to skip its own messages
    bot_user_id: String,
    /// Mention token addressing the bot
    mention: String,
}

impl Commander {
    /// Creates a new Commander bound to a channel and bot identity.
    pub fn new(channel: &str, bot_user_id: &str) -> Self {
        Commander {
            channel: channel.to_string(),
            bot_user_id: bot_user_id.to_string(),
            mention: format!("<@{}>", bot_user_id),
        }
    }

    /// Parses an inbound message into a structured command.
    ///
    /// Addressing failures are silent: a message in another channel, without
    /// the leading mention, or sent by the bot itself returns
    /// [`CommandParseError::NotForBot`] and must not be answered. A message
    /// that addresses the bot but does not parse returns
    /// [`CommandParseError::InvalidCommand`] with the text to send back; a
    /// bare mention gets the greeting.
    pub fn parse(&self, message: &InboundMessage) -> Result<Command, CommandParseError> {
        if message.channel != self.channel {
            return Err(CommandParseError::NotForBot);
        }
        if message.sender == self.bot_user_id {
            return Err(CommandParseError::NotForBot);
        }

        // Single-space tokenization, no quoting. Trailing whitespace would
        // leave an empty token behind, so strip it first.
        let tokens: Vec<&str> = message.text.trim_end().split(' ').collect();
        if !tokens[0].eq_ignore_ascii_case(&self.mention) {
            return Err(CommandParseError::NotForBot);
        }

        debug!("parsing message from {}: {}", message.sender, message.text);

        if tokens.len() < 2 {
            return Err(CommandParseError::InvalidCommand(format_greeting()));
        }

        Command::parse(&tokens[1..])
            .map_err(|error| CommandParseError::InvalidCommand(format_command_error(&error)))
    }

    /// Executes a parsed command and returns the response text.
    ///
    /// Every command produces exactly one response, however many targets it
    /// touched.
    pub async fn execute<F: FleetService>(&self, command: &Command, fleet: &F) -> String {
        match command {
            Command::Help => handle_help(),
            Command::List => handle_list(fleet).await,
            Command::Show { server_pattern } => handle_show(fleet, server_pattern).await,
            Command::Provision(request) => handle_provision(fleet, request.clone()).await,
            Command::Deprovision {
                coordinator_pattern,
                server_pattern,
                force,
            } => handle_deprovision(fleet, coordinator_pattern, server_pattern, *force).await,
            Command::Shutdown { coordinator } => handle_shutdown(fleet, coordinator).await,
            Command::Promote {
                package_id,
                version,
            } => handle_promote(fleet, package_id, version).await,
            Command::Send {
                coordinator_pattern,
                server_pattern,
                input,
            } => handle_send(fleet, coordinator_pattern, server_pattern, input).await,
            Command::Freeze {
                coordinator_pattern,
                server_pattern,
            } => handle_freeze(fleet, coordinator_pattern, server_pattern).await,
            Command::ListPackages => handle_list_packages(fleet).await,
            Command::ListPlugins => handle_list_plugins(fleet).await,
            Command::Pass { args } => handle_pass(fleet, args).await,
            Command::Stats => handle_stats(fleet).await,
        }
    }
}
