//! Bot command parsing and response composition.
//!
//! This module provides the complete command processing pipeline for the
//! bot, turning Slack messages addressed to it into fleet operations and one
//! aggregate response per command.
//!
//! # Overview
//!
//! The commands module handles the entire lifecycle of bot commands:
//! 1. **Addressing** - Deciding whether a message is for the bot at all
//! 2. **Parsing** - Converting message tokens into structured [`command::Command`] enums
//! 3. **Validation** - Checking the command name, arity and argument shapes
//! 4. **Execution** - Routing commands to specialized handlers
//! 5. **Composition** - Rendering one response message per command
//!
//! # Architecture
//!
//! ```text
//! Slack Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + execute()
//! └─────────────┘
//!      │
//!      ├── parse() ──────→ command::Command
//!      │
//!      └── execute() ────→ actions::handle_* ──→ response String
//! ```
//!
//! # Command Structure
//!
//! All commands follow the format: `@playpen <subcommand> [args...]`, where
//! `@playpen` is the bot's Slack mention. Tokens are split on single spaces;
//! there is no quoting.
//!
//! ## Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display the command vocabulary |
//! | `list` | None | List active coordinators and their active servers |
//! | `show` | `<server-regex>` | Show details for matching servers |
//! | `provision` | `<package-id> [pairs...]` | Provision a new server |
//! | `deprovision` | `<coord-regex> <server-regex> [force]` | Deprovision matching servers |
//! | `shutdown` | `<coordinator>` | Shut down one coordinator |
//! | `promote` | `<package-id> <version>` | Promote a package version |
//! | `send` | `<coord-regex> <server-regex> <input>` | Send console input |
//! | `freeze` | `<coord-regex> <server-regex>` | Freeze matching servers |
//! | `list-packages` | None | List known packages |
//! | `list-plugins` | None | List loaded plugins |
//! | `pass` | `<command> [args...]` | Pass a command to the plugin system |
//! | `stats` | None | Report resource statistics |
//!
//! # Error Handling
//!
//! The module distinguishes between two error categories:
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): messages in the
//!   wrong channel, without the bot's mention, or sent by the bot itself.
//!   These never generate a response.
//!
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): a message that
//!   addressed the bot but did not parse. These carry the message to send
//!   back.
//!
//! # Module Organization
//!
//! - [`commander`] - Addressing, parsing and command routing
//! - [`command`] - Command enum, grammar table and parsing logic
//! - [`actions`] - Individual command handler implementations
//! - [`report`] - Response composition utilities

mod actions;
pub mod command;
mod commander;
pub mod report;

pub use crate::commands::commander::Commander;

/// A chat message as the transport layer hands it to the commander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Channel the message was posted in
    pub channel: String,
    /// User id of the sender
    pub sender: String,
    /// Raw message text
    pub text: String,
}

/// Errors that can occur during command parsing.
///
/// Distinguishes errors that should produce a user-facing message from those
/// that must be ignored silently.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Message is not addressed to this bot (silent error)
    NotForBot,
    /// Invalid command with the error message to send back
    InvalidCommand(String),
}
