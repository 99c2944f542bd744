//! Slack Web API client.
//!
//! Wraps the handful of Web API calls the bot needs: `auth.test` to learn its
//! own user id, `conversations.list` to resolve the configured channel name,
//! `chat.postMessage` to respond, and `apps.connections.open` to obtain a
//! Socket Mode websocket url.

use std::time::Duration;

use anyhow::{Context, Error, anyhow, bail};
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc::Sender;

use crate::slack::SlackMessage;
use crate::slack::socket;

/// Delay before reopening the Socket Mode connection after it drops.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Deserialize, Debug)]
struct AuthTestResponse {
    ok: bool,
    user_id: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenSocketResponse {
    ok: bool,
    url: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ConversationsListResponse {
    ok: bool,
    #[serde(default)]
    channels: Vec<Channel>,
    error: Option<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize, Debug)]
struct Channel {
    id: String,
    name: String,
}

#[derive(Deserialize, Debug)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

/// Slack Web API client bound to one workspace and one channel.
#[derive(Debug)]
pub struct SlackClient {
    /// HTTP client
    http: Client,
    /// Base url of the Slack Web API
    api_base: String,
    /// App-level token, used only for Socket Mode
    app_token: String,
    /// Bot token, used for everything else
    bot_token: String,
    /// The bot's own user id, resolved at connect time
    bot_user_id: String,
    /// Id of the channel the bot operates in
    channel_id: String,
}

impl SlackClient {
    /// Connects to the Slack Web API, resolving the bot's identity and the
    /// configured channel.
    ///
    /// # Errors
    ///
    /// Fails when a token is rejected or when no channel with the configured
    /// name is visible to the bot.
    pub async fn connect(
        api_base: &str,
        app_token: &str,
        bot_token: &str,
        channel: &str,
    ) -> Result<Self, Error> {
        let mut client = SlackClient {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            app_token: app_token.to_string(),
            bot_token: bot_token.to_string(),
            bot_user_id: String::new(),
            channel_id: String::new(),
        };

        client.bot_user_id = client.resolve_bot_user_id().await?;
        client.channel_id = client.resolve_channel_id(channel).await?;

        info!(
            "connected to slack as {} in channel {} ({})",
            client.bot_user_id, channel, client.channel_id
        );

        Ok(client)
    }

    /// The bot's own user id.
    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    /// Id of the channel the bot operates in.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Posts a text message to the bot's channel.
    pub async fn send_text(&self, text: &str) -> Result<(), Error> {
        debug!("posting message to {}", self.channel_id);

        let response: PostMessageResponse = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&json!({
                "channel": self.channel_id,
                "text": text,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode slack chat.postMessage response")?;

        if !response.ok {
            bail!(
                "slack chat.postMessage failed: {}",
                response.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        Ok(())
    }

    /// Listens for channel messages over Socket Mode, forever.
    ///
    /// Each dropped or refused connection is logged and reopened after
    /// [`RECONNECT_DELAY`]; received messages go out through `sender`. Returns
    /// only when the receiving side is gone.
    pub async fn listen(&self, sender: Sender<SlackMessage>) {
        loop {
            match self.open_socket_url().await {
                Ok(url) => {
                    if let Err(error) = socket::run_session(&url, &sender).await {
                        error!("slack socket session ended: {:#}", error);
                    }
                }
                Err(error) => error!("failed to open slack socket connection: {:#}", error),
            }

            if sender.is_closed() {
                return;
            }

            debug!("reconnecting slack socket in {:?}", RECONNECT_DELAY);
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Requests a fresh Socket Mode websocket url.
    async fn open_socket_url(&self) -> Result<String, Error> {
        let response: OpenSocketResponse = self
            .http
            .post(format!("{}/apps.connections.open", self.api_base))
            .bearer_auth(&self.app_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode slack apps.connections.open response")?;

        if !response.ok {
            bail!(
                "slack apps.connections.open failed: {}",
                response.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        response
            .url
            .ok_or_else(|| anyhow!("slack apps.connections.open did not return a url"))
    }

    async fn resolve_bot_user_id(&self) -> Result<String, Error> {
        let response: AuthTestResponse = self
            .http
            .post(format!("{}/auth.test", self.api_base))
            .bearer_auth(&self.bot_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode slack auth.test response")?;

        if !response.ok {
            bail!(
                "slack auth.test failed: {}",
                response.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        response
            .user_id
            .ok_or_else(|| anyhow!("slack auth.test did not return a user id"))
    }

    /// Resolves a channel name to its id, following pagination cursors.
    async fn resolve_channel_id(&self, channel: &str) -> Result<String, Error> {
        let mut cursor = String::new();

        loop {
            let response: ConversationsListResponse = self
                .http
                .get(format!("{}/conversations.list", self.api_base))
                .bearer_auth(&self.bot_token)
                .query(&[("limit", "1000"), ("cursor", cursor.as_str())])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
                .context("failed to decode slack conversations.list response")?;

            if !response.ok {
                bail!(
                    "slack conversations.list failed: {}",
                    response.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }

            if let Some(found) = response
                .channels
                .iter()
                .find(|candidate| candidate.name == channel)
            {
                return Ok(found.id.clone());
            }

            cursor = response
                .response_metadata
                .map(|metadata| metadata.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                bail!("channel '{}' not found in this workspace", channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Mock, Server, ServerGuard};

    async fn mock_auth_test(server: &mut ServerGuard) -> Mock {
        server
            .mock("POST", "/auth.test")
            .with_status(200)
            .with_body(r#"{"ok": true, "user_id": "U42"}"#)
            .create_async()
            .await
    }

    async fn mock_conversations_list(server: &mut ServerGuard) -> Mock {
        server
            .mock("GET", "/conversations.list")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"ok": true, "channels": [
                    {"id": "C1", "name": "general"},
                    {"id": "C2", "name": "playpen"}
                ]}"#,
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_connect_resolves_identity_and_channel() {
        let mut server = Server::new_async().await;
        let auth = mock_auth_test(&mut server).await;
        let list = mock_conversations_list(&mut server).await;

        let client = SlackClient::connect(&server.url(), "xapp-1", "xoxb-1", "playpen")
            .await
            .unwrap();

        assert_eq!(client.bot_user_id(), "U42");
        assert_eq!(client.channel_id(), "C2");
        auth.assert_async().await;
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_fails_when_channel_missing() {
        let mut server = Server::new_async().await;
        mock_auth_test(&mut server).await;
        server
            .mock("GET", "/conversations.list")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": true, "channels": [{"id": "C1", "name": "general"}]}"#)
            .create_async()
            .await;

        let result = SlackClient::connect(&server.url(), "xapp-1", "xoxb-1", "playpen").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_connect_fails_on_rejected_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth.test")
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "invalid_auth"}"#)
            .create_async()
            .await;

        let result = SlackClient::connect(&server.url(), "xapp-1", "bad", "playpen").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid_auth"));
    }

    #[tokio::test]
    async fn test_send_text_posts_to_channel() {
        let mut server = Server::new_async().await;
        mock_auth_test(&mut server).await;
        mock_conversations_list(&mut server).await;
        let post = server
            .mock("POST", "/chat.postMessage")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "channel": "C2",
                "text": "hello",
            })))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = SlackClient::connect(&server.url(), "xapp-1", "xoxb-1", "playpen")
            .await
            .unwrap();
        client.send_text("hello").await.unwrap();

        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_text_surfaces_api_error() {
        let mut server = Server::new_async().await;
        mock_auth_test(&mut server).await;
        mock_conversations_list(&mut server).await;
        server
            .mock("POST", "/chat.postMessage")
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "channel_not_found"}"#)
            .create_async()
            .await;

        let client = SlackClient::connect(&server.url(), "xapp-1", "xoxb-1", "playpen")
            .await
            .unwrap();
        let result = client.send_text("hello").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("channel_not_found"));
    }

    #[tokio::test]
    async fn test_open_socket_url() {
        let mut server = Server::new_async().await;
        mock_auth_test(&mut server).await;
        mock_conversations_list(&mut server).await;
        server
            .mock("POST", "/apps.connections.open")
            .with_status(200)
            .with_body(r#"{"ok": true, "url": "wss://example.com/socket"}"#)
            .create_async()
            .await;

        let client = SlackClient::connect(&server.url(), "xapp-1", "xoxb-1", "playpen")
            .await
            .unwrap();
        let url = client.open_socket_url().await.unwrap();

        assert_eq!(url, "wss://example.com/socket");
    }
}
