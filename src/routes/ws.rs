//! WebSocket handler: raid frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client frames -> parse + dispatch by syscall prefix
//! - Frames published on subscribed topics -> forward to client
//!
//! Handler functions validate, mutate the store, and return an `Outcome`.
//! The dispatch layer owns all outbound concerns: replying to the sender and
//! publishing on topics.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade -> send `session:connected` with `client_id`
//! 2. Client subscribes to topics (`topic:subscribe`)
//! 3. Client sends `boss:*` frames -> dispatch -> handler returns Outcome
//! 4. Close -> release every subscription held by the connection

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::frame::{Data, ErrorCode, Frame, Status};
use crate::message::{CHANNELS_TOPIC, Publication, RaidMessage};
use crate::services::{channel, snapshot, update};
use crate::state::AppState;
use crate::store::RaidStore;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. Handlers never send frames directly.
enum Outcome {
    /// Publish on a topic. The sender gets no reply and sees the frame only
    /// if it is subscribed.
    Publish(Publication),
    /// Send done+data to sender only.
    Reply(Data),
    /// Send empty done to sender only.
    Done,
    /// Malformed request: no mutation, no publication, no reply.
    Drop,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),
    #[error("unknown {prefix} op: {op}")]
    UnknownOp { prefix: &'static str, op: String },
    #[error("topic required")]
    TopicRequired,
}

impl ErrorCode for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPrefix(_) => "E_UNKNOWN_PREFIX",
            Self::UnknownOp { .. } => "E_UNKNOWN_OP",
            Self::TopicRequired => "E_TOPIC_REQUIRED",
        }
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for frames published on subscribed topics.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(state.config.ws_client_buffer);

    let welcome = Frame::request("session:connected", Data::new()).with_data("client_id", client_id.to_string());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        dispatch_frame(&state, &mut socket, client_id, &client_tx, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    let released = state.broker.unsubscribe_all(client_id).await;
    info!(%client_id, released, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

async fn dispatch_frame(
    state: &AppState,
    socket: &mut WebSocket,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Frame>,
    text: &str,
) {
    let sender_frames = process_inbound_text(state, client_id, client_tx, text).await;
    for frame in sender_frames {
        let _ = send_frame(socket, &frame).await;
    }
}

/// Parse and process one inbound text frame and return frames for the sender.
async fn process_inbound_text(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Frame>,
    text: &str,
) -> Vec<Frame> {
    let mut req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    req.from = Some(client_id.to_string());
    debug!(%client_id, id = %req.id, syscall = %req.syscall, "ws: recv frame");

    let result = match req.prefix() {
        "boss" => handle_boss(state, &req),
        "topic" => handle_topic(state, client_id, client_tx, &req).await,
        prefix => Err(DispatchError::UnknownPrefix(prefix.to_string())),
    };

    match result {
        Ok(Outcome::Publish(publication)) => {
            let frame = Frame::request(&req.syscall, publication.data)
                .with_topic(&publication.topic)
                .with_from(client_id.to_string());
            let delivered = state.broker.publish(&publication.topic, &frame).await;
            debug!(%client_id, syscall = %req.syscall, topic = %publication.topic, delivered, "ws: published");
            vec![]
        }
        Ok(Outcome::Reply(data)) => vec![req.done_with(data)],
        Ok(Outcome::Done) => vec![req.done()],
        Ok(Outcome::Drop) => {
            debug!(%client_id, syscall = %req.syscall, "ws: request dropped");
            vec![]
        }
        Err(e) => vec![req.error_from(&e)],
    }
}

// =============================================================================
// BOSS HANDLERS
// =============================================================================

fn handle_boss(state: &AppState, req: &Frame) -> Result<Outcome, DispatchError> {
    let store = &state.store;
    let apply: fn(&RaidStore, &Data) -> Option<Publication> = match req.op() {
        "check" => update::check_state,
        "color" => update::card_color,
        "memo" => update::card_memo,
        "channel.status" => update::channel_status,
        "channel.memo" => update::channel_memo,
        "dragon.color" => update::dragon_color,
        "hydra.time" => update::hydra_time,
        "hydra.spawn-settings" => update::hydra_spawn_settings,
        "channel.create" => {
            let Some(channel_id) = channel_id(req) else {
                return Ok(Outcome::Drop);
            };
            channel::create_channel(store, &channel_id);
            return Ok(channel_list(state));
        }
        "channel.delete" => {
            let Some(channel_id) = channel_id(req) else {
                return Ok(Outcome::Drop);
            };
            channel::delete_channel(store, &channel_id, state.config.purge_spawn_settings_on_delete);
            return Ok(channel_list(state));
        }
        "channel.list" => return Ok(channel_list(state)),
        "sync" => return Ok(Outcome::Reply(snapshot::sync_payload(store))),
        op => return Err(DispatchError::UnknownOp { prefix: "boss", op: op.to_string() }),
    };

    Ok(apply(store, &req.data).map_or(Outcome::Drop, Outcome::Publish))
}

fn channel_list(state: &AppState) -> Outcome {
    Outcome::Publish(Publication { topic: CHANNELS_TOPIC.to_string(), data: channel::channel_list(&state.store) })
}

fn channel_id(req: &Frame) -> Option<String> {
    RaidMessage::from_data(&req.data).ok()?.channel_id
}

// =============================================================================
// TOPIC HANDLERS
// =============================================================================

async fn handle_topic(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Frame>,
    req: &Frame,
) -> Result<Outcome, DispatchError> {
    let op = req.op();
    if op != "subscribe" && op != "unsubscribe" {
        return Err(DispatchError::UnknownOp { prefix: "topic", op: op.to_string() });
    }
    let Some(topic) = req
        .data
        .get("topic")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
    else {
        return Err(DispatchError::TopicRequired);
    };

    if op == "subscribe" {
        state.broker.subscribe(topic, client_id, client_tx.clone()).await;
    } else {
        state.broker.unsubscribe(topic, client_id).await;
    }
    Ok(Outcome::Done)
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let code = frame
            .data
            .get("code")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        let message = frame
            .data
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else {
        debug!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
