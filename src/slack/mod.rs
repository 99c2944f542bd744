//! Slack integration.
//!
//! Two halves: the Web API client for posting messages and resolving the
//! bot's identity, and the Socket Mode listener that delivers channel
//! messages over a websocket. The bot holds no public HTTP endpoint; Socket
//! Mode is the only inbound path.
//!
//! # Modules
//!
//! - `client` - Slack Web API client ([`SlackClient`])
//! - `socket` - Socket Mode websocket session and envelope handling

mod client;
mod socket;

pub use crate::slack::client::SlackClient;

/// A chat message received from Slack, reduced to what the bot cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackMessage {
    /// Channel id the message was posted in
    pub channel: String,
    /// User id of the sender
    pub sender: String,
    /// Raw message text
    pub text: String,
}
