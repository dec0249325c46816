//! Supabase Realtime change feed over the Phoenix websocket protocol.
//!
//! One socket joins two channels, one per table. Row changes arrive as
//! `postgres_changes` frames and are forwarded as [`ChangeEvent`]s. The
//! socket task sends a heartbeat every 25 seconds and leaves both channels
//! when the feed is closed.

use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::backend::{ChangeEvent, LiveFeed};
use crate::models::{CaseLog, Session, SessionId};
use crate::{Error, Result};

/// Interval between Phoenix heartbeats
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

const PROTOCOL_VERSION: &str = "1.0.0";
const SESSIONS_TABLE: &str = "sessions";
const GENERAL_TABLE: &str = "general";
const SESSIONS_TOPIC: &str = "realtime:sessions_channel";
const GENERAL_TOPIC: &str = "realtime:general_channel";

/// Channels joined on connect: (topic, table)
const CHANNELS: [(&str, &str); 2] = [
    (SESSIONS_TOPIC, SESSIONS_TABLE),
    (GENERAL_TOPIC, GENERAL_TABLE),
];

/// What one incoming frame means to the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Change(ChangeEvent),
    JoinRejected { topic: String, reason: String },
    ChannelClosed(String),
    Ignored,
}

#[derive(Debug, Deserialize)]
struct IncomingFrame {
    topic: String,
    event: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    kind: String,
    table: String,
    #[serde(default)]
    record: Value,
    #[serde(default)]
    old_record: Value,
}

#[derive(Debug, Deserialize)]
struct GeneralRow {
    id: String,
    #[serde(default)]
    content: Option<CaseLog>,
}

#[derive(Debug, Deserialize)]
struct DeletedRow {
    id: SessionId,
}

/// Websocket endpoint for a project URL (`https` becomes `wss`).
#[must_use]
pub fn realtime_url(project_url: &str, anon_key: &str) -> String {
    let base = project_url.trim().trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!(
        "{base}/realtime/v1/websocket?apikey={}&vsn={PROTOCOL_VERSION}",
        urlencoding::encode(anon_key)
    )
}

/// Open the socket, join both channels, and start the socket task.
pub async fn connect(project_url: &str, anon_key: &str) -> Result<LiveFeed> {
    let url = realtime_url(project_url, anon_key);
    let (mut socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    tracing::info!("Realtime socket connected");

    for (index, (topic, table)) in CHANNELS.iter().enumerate() {
        let reference = (index + 1).to_string();
        socket
            .send(Message::text(join_message(topic, table, anon_key, &reference)))
            .await?;
        tracing::debug!("Joining {} for table {}", topic, table);
    }

    let (sender, receiver) = mpsc::unbounded_channel();
    let (shutdown, shutdown_signal) = oneshot::channel();
    let task = tokio::spawn(run_socket(socket, sender, shutdown_signal, CHANNELS.len() + 1));

    Ok(LiveFeed::new(receiver, shutdown, task))
}

async fn run_socket<S>(
    socket: S,
    events: mpsc::UnboundedSender<ChangeEvent>,
    mut shutdown: oneshot::Receiver<()>,
    first_reference: usize,
) where
    S: Stream<Item = std::result::Result<Message, WsError>>
        + Sink<Message, Error = WsError>
        + Unpin,
{
    let (mut outgoing, mut incoming) = socket.split();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await;
    let mut reference = first_reference;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                for (topic, _) in CHANNELS {
                    reference += 1;
                    let leave = Message::text(leave_message(topic, &reference.to_string()));
                    if let Err(error) = outgoing.send(leave).await {
                        tracing::debug!("Failed to leave {}: {}", topic, error);
                    }
                }
                let _ = outgoing.close().await;
                tracing::info!("Realtime socket closed");
                break;
            }
            _ = heartbeat.tick() => {
                reference += 1;
                let beat = Message::text(heartbeat_message(&reference.to_string()));
                if let Err(error) = outgoing.send(beat).await {
                    tracing::warn!("Realtime heartbeat failed: {}", error);
                    break;
                }
            }
            frame = incoming.next() => match frame {
                Some(Ok(Message::Text(text))) => match parse_frame(text.as_str()) {
                    Ok(Frame::Change(event)) => {
                        tracing::debug!("Realtime change: {:?}", event);
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(Frame::JoinRejected { topic, reason }) => {
                        tracing::warn!("Realtime join for {} rejected: {}", topic, reason);
                    }
                    Ok(Frame::ChannelClosed(topic)) => {
                        tracing::warn!("Realtime channel {} closed by server", topic);
                    }
                    Ok(Frame::Ignored) => {}
                    Err(error) => tracing::debug!("Skipping realtime frame: {}", error),
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::warn!("Realtime socket closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!("Realtime socket error: {}", error);
                    break;
                }
            },
        }
    }
}

fn join_message(topic: &str, table: &str, anon_key: &str, reference: &str) -> String {
    json!({
        "topic": topic,
        "event": "phx_join",
        "payload": {
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": table }
                ]
            },
            "access_token": anon_key
        },
        "ref": reference,
        "join_ref": reference
    })
    .to_string()
}

fn heartbeat_message(reference: &str) -> String {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": reference
    })
    .to_string()
}

fn leave_message(topic: &str, reference: &str) -> String {
    json!({
        "topic": topic,
        "event": "phx_leave",
        "payload": {},
        "ref": reference
    })
    .to_string()
}

/// Interpret one text frame from the socket.
pub(crate) fn parse_frame(text: &str) -> Result<Frame> {
    let frame: IncomingFrame = serde_json::from_str(text)?;
    match frame.event.as_str() {
        "postgres_changes" => parse_change(frame.payload),
        "phx_reply" => {
            let status = frame.payload["status"].as_str().unwrap_or_default();
            if status == "error" {
                let reason = frame.payload["response"]["reason"]
                    .as_str()
                    .map_or_else(|| frame.payload["response"].to_string(), str::to_string);
                return Ok(Frame::JoinRejected {
                    topic: frame.topic,
                    reason,
                });
            }
            Ok(Frame::Ignored)
        }
        "phx_close" | "phx_error" => Ok(Frame::ChannelClosed(frame.topic)),
        _ => Ok(Frame::Ignored),
    }
}

fn parse_change(mut payload: Value) -> Result<Frame> {
    let data = payload
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| Error::Realtime("change frame without data".to_string()))?;
    let data: ChangeData = serde_json::from_value(data)?;
    let event = match (data.table.as_str(), data.kind.as_str()) {
        (SESSIONS_TABLE, "INSERT") => {
            ChangeEvent::SessionInserted(serde_json::from_value::<Session>(data.record)?)
        }
        (SESSIONS_TABLE, "UPDATE") => {
            ChangeEvent::SessionUpdated(serde_json::from_value::<Session>(data.record)?)
        }
        (SESSIONS_TABLE, "DELETE") => {
            let row: DeletedRow = serde_json::from_value(data.old_record)?;
            ChangeEvent::SessionDeleted(row.id)
        }
        (GENERAL_TABLE, "INSERT" | "UPDATE") => {
            let row: GeneralRow = serde_json::from_value(data.record)?;
            ChangeEvent::CaseLogChanged {
                key: row.id,
                log: row.content.unwrap_or_default(),
            }
        }
        (GENERAL_TABLE, "DELETE") => return Ok(Frame::Ignored),
        (table, kind) => {
            return Err(Error::Realtime(format!(
                "unexpected {kind} change on table '{table}'"
            )));
        }
    };
    Ok(Frame::Change(event))
}
