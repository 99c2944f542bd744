//! Main bot orchestration.
//!
//! The [`Bot`] wires the three layers together: the Slack transport delivers
//! messages into a channel, the commander parses and routes them, and the
//! fleet requester carries the operations to the network coordinator.
//!
//! # Message Flow
//!
//! ```text
//! Socket Mode ──→ mpsc channel ──→ handle_message()
//!                                     │
//!                                     ├── Commander::parse()
//!                                     ├── Commander::execute() ──→ FleetRequester
//!                                     └── SlackClient::send_text()
//! ```
//!
//! Messages are handled strictly one at a time: the receive loop does not
//! pull the next message until the current command has finished and its
//! response is sent. Fleet operations are not transactional, so two commands
//! mutating the same servers must never interleave.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::mpsc;

use crate::commands::report::format_startup_announcement;
use crate::commands::{CommandParseError, Commander, InboundMessage};
use crate::config::Config;
use crate::fleet::FleetRequester;
use crate::slack::{SlackClient, SlackMessage};

/// The bot: Slack transport, command routing and fleet access.
pub struct Bot {
    /// Slack Web API client, shared with the listener task
    slack: Arc<SlackClient>,
    /// HTTP client for the network coordinator
    fleet: FleetRequester,
    /// Command parser and router
    commander: Commander,
}

impl Bot {
    /// Creates a new Bot instance from the loaded configuration.
    ///
    /// Connects to the Slack Web API up front; a bad token or a missing
    /// channel surfaces here rather than after the bot looks healthy.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let slack = Arc::new(
            SlackClient::connect(
                &config.slack.api_url,
                &config.slack.app_token,
                &config.slack.bot_token,
                &config.slack.channel,
            )
            .await?,
        );

        let fleet = FleetRequester::new(&config.fleet.url);
        let commander = Commander::new(slack.channel_id(), slack.bot_user_id());

        Ok(Bot {
            slack,
            fleet,
            commander,
        })
    }

    /// Starts the bot and processes messages until the transport is gone.
    ///
    /// The Socket Mode listener runs in its own task and feeds the channel;
    /// this method consumes the channel sequentially, one command at a time.
    pub async fn start(self) {
        let (sender, mut receiver) = mpsc::channel::<SlackMessage>(32);

        let slack = Arc::clone(&self.slack);
        tokio::spawn(async move {
            slack.listen(sender).await;
        });

        // Announce ourselves so the channel knows the bot restarted
        if let Err(err) = self.slack.send_text(&format_startup_announcement()).await {
            error!("failed to send startup announcement: {:#}", err);
        }

        info!("bot is listening");

        while let Some(message) = receiver.recv().await {
            self.handle_message(message).await;
        }
    }

    /// Handles one inbound message end to end.
    ///
    /// Messages not addressed to the bot are dropped silently; everything
    /// else gets exactly one response, either the command's report or the
    /// parse error text.
    async fn handle_message(&self, message: SlackMessage) {
        let inbound = InboundMessage {
            channel: message.channel,
            sender: message.sender,
            text: message.text,
        };

        let response = match self.commander.parse(&inbound) {
            Ok(command) => self.commander.execute(&command, &self.fleet).await,
            Err(CommandParseError::InvalidCommand(text)) => text,
            Err(CommandParseError::NotForBot) => return,
        };

        if let Err(err) = self.slack.send_text(&response).await {
            error!("failed to send response: {:#}", err);
        }
    }
}
