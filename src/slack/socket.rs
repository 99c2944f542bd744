//! Socket Mode websocket session.
//!
//! Slack pushes events as json envelopes over a websocket. Every envelope
//! carrying an id must be acknowledged promptly or Slack redelivers it and
//! eventually drops the connection. The session here acks first and asks
//! questions later; filtering happens after the ack.
//!
//! A `disconnect` envelope is Slack asking us to reconnect (the urls are
//! short-lived), so it ends the session without an error.

use anyhow::{Context, Error};
use futures::{SinkExt, StreamExt};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::slack::SlackMessage;

#[derive(Deserialize, Debug)]
struct Envelope {
    #[serde(rename = "type")]
    envelope_type: String,
    #[serde(default)]
    envelope_id: Option<String>,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct EventCallback {
    event: EventPayload,
}

#[derive(Deserialize, Debug)]
struct EventPayload {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

/// What a parsed text frame asks the session to do.
#[derive(Debug, PartialEq, Eq)]
enum SocketEvent {
    /// An envelope to acknowledge, possibly carrying a chat message
    Event {
        envelope_id: String,
        message: Option<SlackMessage>,
    },
    /// Slack wants us to reconnect
    Disconnect,
    /// Hello frames, unacknowledgeable envelopes, unparseable frames
    Ignore,
}

/// Runs one websocket session until the connection ends.
///
/// Returns `Ok` on an orderly close or disconnect request and `Err` on a
/// transport failure; the caller reconnects in both cases.
pub(super) async fn run_session(url: &str, sender: &Sender<SlackMessage>) -> Result<(), Error> {
    let (stream, _response) = connect_async(url)
        .await
        .context("failed to connect slack socket mode websocket")?;
    let (mut sink, mut source) = stream.split();

    debug!("slack socket session opened");

    while let Some(frame) = source.next().await {
        let frame = frame.context("failed reading slack websocket frame")?;
        match frame {
            WsMessage::Text(text) => match parse_frame(&text) {
                SocketEvent::Event {
                    envelope_id,
                    message,
                } => {
                    // Ack before handling, Slack redelivers unacked envelopes
                    let ack = json!({ "envelope_id": envelope_id }).to_string();
                    sink.send(WsMessage::Text(ack.into()))
                        .await
                        .context("failed to send slack socket ack")?;

                    if let Some(message) = message {
                        if sender.send(message).await.is_err() {
                            // Receiver gone, the bot is shutting down
                            return Ok(());
                        }
                    }
                }
                SocketEvent::Disconnect => {
                    debug!("slack requested a socket reconnect");
                    return Ok(());
                }
                SocketEvent::Ignore => {}
            },
            WsMessage::Ping(payload) => {
                sink.send(WsMessage::Pong(payload))
                    .await
                    .context("failed to send slack socket pong")?;
            }
            WsMessage::Close(_) => return Ok(()),
            _ => {}
        }
    }

    Ok(())
}

/// Parses one text frame into a session action.
///
/// Only `events_api` envelopes carrying a plain channel message (a `message`
/// event without a subtype) produce a [`SlackMessage`]; everything else is
/// acked and dropped. Bot-authored and edited messages always carry a
/// subtype, so the filter also keeps the bot from hearing itself twice.
fn parse_frame(text: &str) -> SocketEvent {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!("unparseable slack socket frame: {}", error);
            return SocketEvent::Ignore;
        }
    };

    if envelope.envelope_type == "disconnect" {
        return SocketEvent::Disconnect;
    }

    let Some(envelope_id) = envelope.envelope_id else {
        // hello and other unacknowledgeable frames
        return SocketEvent::Ignore;
    };

    let message = if envelope.envelope_type == "events_api" {
        extract_message(&envelope.payload)
    } else {
        None
    };

    SocketEvent::Event {
        envelope_id,
        message,
    }
}

fn extract_message(payload: &serde_json::Value) -> Option<SlackMessage> {
    let callback: EventCallback = serde_json::from_value(payload.clone()).ok()?;
    let event = callback.event;

    if event.event_type != "message" || event.subtype.is_some() {
        return None;
    }

    Some(SlackMessage {
        channel: event.channel?,
        sender: event.user?,
        text: event.text?,
    })
}
